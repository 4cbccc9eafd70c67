//! Structured progress events.

use std::path::PathBuf;

use crate::media::PostType;

/// One progress event emitted by a pipeline.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    Info(String),
    Warning(String),
    Error(String),

    /// Profile metadata pass started.
    DiscoveryStarted { username: String },

    /// Profile metadata pass finished.
    Discovered { username: String, total_posts: usize },

    /// Aggregate profile metadata document written.
    MetadataSaved { count: usize, path: PathBuf },

    /// One profile post finished downloading.
    PostCompleted {
        index: usize,
        total: usize,
        title: String,
        post_type: PostType,
    },

    /// One profile post skipped (already on disk or in the archive).
    PostSkipped {
        index: usize,
        total: usize,
        title: String,
    },

    /// One profile post failed; the loop continues.
    PostFailed {
        index: usize,
        total: usize,
        id: String,
        error: String,
    },

    /// One batch URL finished downloading.
    UrlCompleted {
        username: String,
        id: String,
        title: String,
    },

    /// One batch URL skipped (already on disk).
    UrlSkipped { username: String, id: String },

    /// One batch URL failed; siblings are unaffected.
    UrlFailed { url: String, error: String },

    /// Profile run summary.
    ProfileSummary {
        username: String,
        downloaded: usize,
        enqueued: usize,
        content_type: String,
        output_dir: PathBuf,
    },

    /// Batch run summary.
    BatchSummary {
        completed: usize,
        skipped: usize,
        failed: usize,
        total: usize,
    },
}

/// Sink for progress events.
///
/// Injected into the pipelines so rendering stays decoupled and testable.
pub trait Reporter: Send + Sync {
    fn event(&self, event: ProgressEvent);
}
