//! yt-dlp subprocess driver.

use std::path::PathBuf;
use std::process::Output;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::{Error, Result};
use crate::extractor::headers::header_args;
use crate::extractor::options::DownloadRequest;
use crate::media::Post;

/// Exit status yt-dlp uses for a `--max-downloads` stop.
const MAX_DOWNLOADS_EXIT_CODE: i32 = 101;

/// Extraction/download engine boundary.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Metadata-only pass: extract every post reachable from a URL.
    async fn extract_metadata(&self, url: &str, max_entries: Option<usize>) -> Result<Vec<Post>>;

    /// Download one post and return its extracted metadata.
    async fn download(&self, url: &str, request: &DownloadRequest) -> Result<Post>;
}

/// yt-dlp CLI implementation of the engine boundary.
pub struct YtDlp {
    binary: PathBuf,
}

impl YtDlp {
    /// Locate yt-dlp in common installation paths, falling back to PATH.
    pub fn locate() -> Self {
        let candidates = [
            "/opt/homebrew/bin/yt-dlp",
            "/usr/local/bin/yt-dlp",
            "/usr/bin/yt-dlp",
        ];

        for path in candidates {
            if std::path::Path::new(path).exists() {
                return Self {
                    binary: PathBuf::from(path),
                };
            }
        }

        Self {
            binary: PathBuf::from("yt-dlp"),
        }
    }

    #[cfg(test)]
    fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Arguments for a metadata-only extraction pass.
    fn metadata_args(url: &str, max_entries: Option<usize>) -> Vec<String> {
        let mut args = vec![
            "--dump-json".to_string(),
            "--no-check-certificates".to_string(),
            "--no-warnings".to_string(),
            "--ignore-errors".to_string(),
        ];

        if let Some(max) = max_entries {
            args.push("--playlist-end".to_string());
            args.push(max.to_string());
        }

        args.extend(header_args());
        args.push(url.to_string());
        args
    }

    /// Arguments for a download request.
    fn download_args(url: &str, request: &DownloadRequest) -> Vec<String> {
        let mut args = vec![
            "-o".to_string(),
            request.output_template.clone(),
            "-f".to_string(),
            request.format.clone(),
            "--no-check-certificates".to_string(),
            "--no-warnings".to_string(),
            "--retries".to_string(),
            request.retries.to_string(),
            "--fragment-retries".to_string(),
            request.fragment_retries.to_string(),
            "--skip-unavailable-fragments".to_string(),
            // Download and still emit the info JSON on stdout
            "--no-simulate".to_string(),
            "--dump-json".to_string(),
        ];

        if request.sleep_hints {
            args.extend([
                "--sleep-interval".to_string(),
                "1".to_string(),
                "--max-sleep-interval".to_string(),
                "3".to_string(),
                "--sleep-requests".to_string(),
                "1".to_string(),
            ]);
        }

        if let Some(rate) = &request.throttle_rate {
            args.push("--limit-rate".to_string());
            args.push(rate.clone());
        }

        if let Some(archive) = &request.archive_file {
            args.push("--download-archive".to_string());
            args.push(archive.display().to_string());
        }

        args.extend(header_args());
        args.push(url.to_string());
        args
    }

    async fn run(&self, args: Vec<String>) -> Result<Output> {
        let output = Command::new(&self.binary)
            .args(&args)
            .output()
            .await
            .map_err(|e| Error::Extractor(format!("Failed to run {}: {}", self.binary.display(), e)))?;
        Ok(output)
    }
}

/// Keep only meaningful lines from the engine's stderr.
///
/// "No video formats found" is the engine's way of reporting image carousels
/// during a metadata pass; it is benign noise, not a failure.
fn surface_stderr(stderr: &[u8]) -> String {
    String::from_utf8_lossy(stderr)
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter(|line| !line.contains("No video formats found"))
        .take(3)
        .collect::<Vec<_>>()
        .join(" | ")
}

#[async_trait]
impl Extractor for YtDlp {
    async fn extract_metadata(&self, url: &str, max_entries: Option<usize>) -> Result<Vec<Post>> {
        let output = self.run(Self::metadata_args(url, max_entries)).await?;

        if output.status.code() == Some(MAX_DOWNLOADS_EXIT_CODE) {
            return Err(Error::MaxDownloadsReached);
        }

        // One JSON document per entry, one per line; entries that failed to
        // extract produce stderr noise instead of a line and are dropped.
        let stdout = String::from_utf8_lossy(&output.stdout);
        let mut posts = Vec::new();
        for line in stdout.lines().filter(|l| !l.trim().is_empty()) {
            match serde_json::from_str::<Post>(line) {
                Ok(post) => posts.push(post),
                Err(e) => tracing::debug!("Dropping unparseable entry: {}", e),
            }
        }

        if posts.is_empty() && !output.status.success() {
            return Err(Error::Extractor(surface_stderr(&output.stderr)));
        }

        Ok(posts)
    }

    async fn download(&self, url: &str, request: &DownloadRequest) -> Result<Post> {
        let output = self.run(Self::download_args(url, request)).await?;

        if output.status.code() == Some(MAX_DOWNLOADS_EXIT_CODE) {
            return Err(Error::MaxDownloadsReached);
        }

        if !output.status.success() {
            return Err(Error::Download(surface_stderr(&output.stderr)));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        match stdout.lines().find(|l| l.trim_start().starts_with('{')) {
            // An archived post produces no JSON; report it as already present
            None => Ok(Post::default()),
            Some(line) => Ok(serde_json::from_str(line)?),
        }
    }
}
