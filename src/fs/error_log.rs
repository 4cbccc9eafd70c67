//! Process-wide append-only error log.

use std::path::PathBuf;

use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use crate::error::Result;

/// Append-only failure log, one line per failed download.
///
/// Batch mode appends from multiple workers concurrently; each entry is a
/// single write call so lines never interleave.
#[derive(Debug, Clone)]
pub struct ErrorLog {
    path: PathBuf,
}

impl ErrorLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Conventional location of the error log.
    pub fn default_path() -> PathBuf {
        PathBuf::from("logs").join("errors.txt")
    }

    /// Append one failure entry: `{url} - {error}`.
    pub async fn record(&self, url: &str, error: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .await?;

        file.write_all(format!("{} - {}\n", url, error).as_bytes())
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_record_appends_lines() {
        let tmp = tempdir().unwrap();
        let log = ErrorLog::new(tmp.path().join("logs").join("errors.txt"));

        log.record("https://example.com/a", "timed out").await.unwrap();
        log.record("https://example.com/b", "404").await.unwrap();

        let content = std::fs::read_to_string(tmp.path().join("logs").join("errors.txt")).unwrap();
        assert_eq!(
            content,
            "https://example.com/a - timed out\nhttps://example.com/b - 404\n"
        );
    }
}
