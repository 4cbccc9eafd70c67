//! Download outcomes and run summaries.

/// Outcome of one single-URL download task.
///
/// Failures are data, not errors; one task's failure never aborts siblings.
#[derive(Debug, Clone)]
pub enum UrlOutcome {
    Completed {
        username: String,
        id: String,
        title: String,
    },
    Skipped {
        username: String,
        id: String,
    },
    Failed {
        url: String,
        error: String,
    },
}

/// Aggregate counts for one batch run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub completed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub total: usize,
}

impl BatchSummary {
    pub fn absorb(&mut self, outcome: &UrlOutcome) {
        self.total += 1;
        match outcome {
            UrlOutcome::Completed { .. } => self.completed += 1,
            UrlOutcome::Skipped { .. } => self.skipped += 1,
            UrlOutcome::Failed { .. } => self.failed += 1,
        }
    }
}

/// Aggregate counts for one profile run.
#[derive(Debug, Clone)]
pub struct ProfileSummary {
    pub username: String,
    /// Posts found by the discovery pass.
    pub posts_found: usize,
    /// Posts the content filter enqueued for download.
    pub posts_enqueued: usize,
    /// Posts downloaded or already present on disk.
    pub posts_downloaded: usize,
    /// Aggregate metadata document written.
    pub metadata_saved: bool,
    /// The engine hit the user-supplied download cap; an expected stop.
    pub stopped_at_limit: bool,
}

impl ProfileSummary {
    pub fn new(username: &str) -> Self {
        Self {
            username: username.to_string(),
            posts_found: 0,
            posts_enqueued: 0,
            posts_downloaded: 0,
            metadata_saved: false,
            stopped_at_limit: false,
        }
    }
}
