//! Batch orchestrator for links-file runs.

use std::path::Path;

use futures::{stream, StreamExt};

use crate::config::Config;
use crate::download::rate::RateLimiter;
use crate::download::single::download_from_url;
use crate::download::state::BatchSummary;
use crate::error::{Error, Result};
use crate::extractor::Extractor;
use crate::fs::ErrorLog;
use crate::output::{ProgressEvent, Reporter};

/// Read post URLs from a links file, one per line.
///
/// Blank lines and anything that is not an http(s) URL are dropped, so the
/// file tolerates comments and stray notes.
pub fn read_links(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Cannot read {}: {}", path.display(), e)))?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with("http://") || line.starts_with("https://"))
        .map(String::from)
        .collect())
}

/// Download every URL with bounded concurrency.
///
/// Per-URL failures are absorbed into the summary; the run itself only
/// fails when there is nothing to download.
pub async fn run_batch(
    extractor: &dyn Extractor,
    config: &Config,
    reporter: &dyn Reporter,
    error_log: &ErrorLog,
    limiter: &RateLimiter,
    urls: &[String],
) -> Result<BatchSummary> {
    if urls.is_empty() {
        return Err(Error::Config("No links to download".to_string()));
    }

    let workers = config.options.workers.max(1);
    tracing::info!("Starting batch: {} links, {} workers", urls.len(), workers);

    let outcomes = stream::iter(urls.iter())
        .map(|url| download_from_url(extractor, config, reporter, error_log, limiter, url))
        .buffer_unordered(workers)
        .collect::<Vec<_>>()
        .await;

    let mut summary = BatchSummary::default();
    for outcome in &outcomes {
        summary.absorb(outcome);
    }

    reporter.event(ProgressEvent::BatchSummary {
        completed: summary.completed,
        skipped: summary.skipped,
        failed: summary.failed,
        total: summary.total,
    });

    Ok(summary)
}
