//! Download request description and format selection.

use std::path::PathBuf;

use crate::config::Fidelity;
use crate::media::PostType;

/// One intent to fetch a post; consumed by the extraction engine exactly once.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    /// Engine output path template.
    pub output_template: String,

    /// Format-selection expression.
    pub format: String,

    /// Retry counts forwarded to the engine; no retries happen above it.
    pub retries: u32,
    pub fragment_retries: u32,

    /// Archive file for engine-native skip-if-present.
    pub archive_file: Option<PathBuf>,

    /// Byte-rate cap hint (e.g. "500K").
    pub throttle_rate: Option<String>,

    /// Forward sleep-interval hints to the engine.
    pub sleep_hints: bool,
}

impl DownloadRequest {
    pub fn new(output_template: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            output_template: output_template.into(),
            format: format.into(),
            retries: 3,
            fragment_retries: 3,
            archive_file: None,
            throttle_rate: None,
            sleep_hints: true,
        }
    }
}

/// Format-selection expression for a fidelity and (optionally known) post type.
///
/// Watermarked requests take the platform's generic download stream. Clean
/// requests prefer an explicit mp4 video + m4a audio combination with
/// fallbacks; audio-only posts target the best audio stream specifically.
pub fn format_expression(fidelity: Fidelity, post_type: Option<PostType>) -> &'static str {
    match fidelity {
        Fidelity::Watermarked => "download/best",
        Fidelity::Clean => match post_type {
            Some(PostType::AudioOnly) => "bestaudio/best",
            Some(PostType::Video) | None => {
                "bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best"
            }
            Some(PostType::Images) | Some(PostType::Unknown) => "best",
        },
    }
}
