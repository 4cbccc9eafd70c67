//! Single-URL download task.

use std::path::Path;

use crate::config::Config;
use crate::download::rate::RateLimiter;
use crate::download::state::UrlOutcome;
use crate::error::{Error, Result};
use crate::extractor::{format_expression, DownloadRequest, Extractor};
use crate::fs::{existing_media_file, owner_dir, ErrorLog};
use crate::media::{Post, PostMetadata};
use crate::output::{ProgressEvent, Reporter};

/// Parse the owner username and post id out of a post URL.
///
/// Accepts the canonical `/@user/video/{id}` and `/@user/photo/{id}` forms;
/// the id is the last path segment, the owner is the `@`-prefixed segment.
pub fn parse_post_url(raw: &str) -> Result<(String, String)> {
    let parsed = url::Url::parse(raw)?;

    let segments: Vec<&str> = parsed
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    let username = segments
        .iter()
        .find_map(|seg| seg.strip_prefix('@'))
        .filter(|u| !u.is_empty())
        .ok_or_else(|| Error::InvalidUrl(raw.to_string()))?;

    let id = segments
        .last()
        .filter(|id| !id.is_empty() && !id.starts_with('@'))
        .ok_or_else(|| Error::InvalidUrl(raw.to_string()))?;

    Ok((username.to_string(), id.to_string()))
}

/// Download one post URL into `{output_dir}/{username}/`.
///
/// Never returns an error: every failure is folded into
/// [`UrlOutcome::Failed`] and appended to the error log, so one bad URL
/// cannot take down a batch.
pub async fn download_from_url(
    extractor: &dyn Extractor,
    config: &Config,
    reporter: &dyn Reporter,
    error_log: &ErrorLog,
    limiter: &RateLimiter,
    url: &str,
) -> UrlOutcome {
    match try_download(extractor, config, reporter, limiter, url).await {
        Ok(outcome) => outcome,
        Err(e) => {
            let error = e.to_string();
            reporter.event(ProgressEvent::UrlFailed {
                url: url.to_string(),
                error: error.clone(),
            });
            if let Err(log_err) = error_log.record(url, &error).await {
                tracing::warn!("Failed to append to error log: {}", log_err);
            }
            UrlOutcome::Failed {
                url: url.to_string(),
                error,
            }
        }
    }
}

async fn try_download(
    extractor: &dyn Extractor,
    config: &Config,
    reporter: &dyn Reporter,
    limiter: &RateLimiter,
    url: &str,
) -> Result<UrlOutcome> {
    let (username, id) = parse_post_url(url)?;
    let dir = owner_dir(&config.options.output_dir, &username)?;

    if config.options.skip_existing {
        if let Some(path) = existing_media_file(&dir, &id) {
            tracing::debug!("Already on disk: {}", path.display());
            reporter.event(ProgressEvent::UrlSkipped {
                username: username.clone(),
                id: id.clone(),
            });
            return Ok(UrlOutcome::Skipped { username, id });
        }
    }

    limiter.wait().await;

    let mut request = DownloadRequest::new(
        dir.join(format!("{}.%(ext)s", id)).display().to_string(),
        format_expression(config.fidelity(), None),
    );
    request.throttle_rate = config.effective_throttle_rate().map(String::from);
    request.sleep_hints = config.rate_limit.enabled;

    let post = extractor.download(url, &request).await?;

    if config.options.save_metadata && !post.id.is_empty() {
        save_post_metadata(&dir, &post)?;
    }

    let title = post.short_title();
    reporter.event(ProgressEvent::UrlCompleted {
        username: username.clone(),
        id: id.clone(),
        title: title.clone(),
    });

    Ok(UrlOutcome::Completed {
        username,
        id,
        title,
    })
}

fn save_post_metadata(dir: &Path, post: &Post) -> Result<()> {
    let meta_dir = dir.join("metadata");
    crate::fs::ensure_dir(&meta_dir)?;
    PostMetadata::from_post(post).write(&meta_dir.join(format!("{}.json", post.id)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::download::testing::{video_post, MockExtractor, RecordingReporter};
    use tempfile::tempdir;

    #[test]
    fn test_parse_post_url() {
        let (user, id) =
            parse_post_url("https://www.tiktok.com/@someuser/video/7301234567890123456").unwrap();
        assert_eq!(user, "someuser");
        assert_eq!(id, "7301234567890123456");

        let (user, id) =
            parse_post_url("https://www.tiktok.com/@other.user_1/photo/42?lang=en").unwrap();
        assert_eq!(user, "other.user_1");
        assert_eq!(id, "42");
    }

    #[test]
    fn test_parse_post_url_rejects_malformed() {
        assert!(matches!(
            parse_post_url("https://www.tiktok.com/trending"),
            Err(Error::InvalidUrl(_))
        ));
        assert!(matches!(
            parse_post_url("https://www.tiktok.com/@onlyuser"),
            Err(Error::InvalidUrl(_))
        ));
        assert!(parse_post_url("not a url").is_err());
    }

    #[tokio::test]
    async fn test_download_completes() {
        let tmp = tempdir().unwrap();
        let mut config = Config::default();
        config.options.output_dir = tmp.path().to_path_buf();

        let extractor = MockExtractor::with_posts(vec![video_post("7301")]);
        let reporter = RecordingReporter::default();
        let error_log = ErrorLog::new(tmp.path().join("errors.txt"));

        let outcome = download_from_url(
            &extractor,
            &config,
            &reporter,
            &error_log,
            &RateLimiter::disabled(),
            "https://www.tiktok.com/@someuser/video/7301",
        )
        .await;

        assert!(matches!(outcome, UrlOutcome::Completed { ref id, .. } if id == "7301"));
        assert_eq!(extractor.download_count(), 1);
        assert!(tmp.path().join("someuser").is_dir());
    }

    #[tokio::test]
    async fn test_skip_existing_short_circuits() {
        let tmp = tempdir().unwrap();
        let mut config = Config::default();
        config.options.output_dir = tmp.path().to_path_buf();
        config.options.skip_existing = true;

        let dir = tmp.path().join("someuser");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("7301.mp4"), b"x").unwrap();

        let extractor = MockExtractor::with_posts(vec![video_post("7301")]);
        let reporter = RecordingReporter::default();
        let error_log = ErrorLog::new(tmp.path().join("errors.txt"));

        let outcome = download_from_url(
            &extractor,
            &config,
            &reporter,
            &error_log,
            &RateLimiter::disabled(),
            "https://www.tiktok.com/@someuser/video/7301",
        )
        .await;

        assert!(matches!(outcome, UrlOutcome::Skipped { .. }));
        assert_eq!(extractor.download_count(), 0);
    }

    #[tokio::test]
    async fn test_failure_is_logged_not_raised() {
        let tmp = tempdir().unwrap();
        let mut config = Config::default();
        config.options.output_dir = tmp.path().to_path_buf();

        let extractor = MockExtractor::failing_on(vec!["7301"]);
        let reporter = RecordingReporter::default();
        let error_log = ErrorLog::new(tmp.path().join("errors.txt"));

        let url = "https://www.tiktok.com/@someuser/video/7301";
        let outcome = download_from_url(
            &extractor,
            &config,
            &reporter,
            &error_log,
            &RateLimiter::disabled(),
            url,
        )
        .await;

        assert!(matches!(outcome, UrlOutcome::Failed { .. }));

        let logged = std::fs::read_to_string(tmp.path().join("errors.txt")).unwrap();
        assert!(logged.starts_with(url));
        assert!(logged.ends_with('\n'));
    }

    #[tokio::test]
    async fn test_save_metadata_writes_json() {
        let tmp = tempdir().unwrap();
        let mut config = Config::default();
        config.options.output_dir = tmp.path().to_path_buf();
        config.options.save_metadata = true;

        let extractor = MockExtractor::with_posts(vec![video_post("7301")]);
        let reporter = RecordingReporter::default();
        let error_log = ErrorLog::new(tmp.path().join("errors.txt"));

        download_from_url(
            &extractor,
            &config,
            &reporter,
            &error_log,
            &RateLimiter::disabled(),
            "https://www.tiktok.com/@someuser/video/7301",
        )
        .await;

        let meta = tmp.path().join("someuser").join("metadata").join("7301.json");
        let content = std::fs::read_to_string(meta).unwrap();
        assert!(content.contains("\"id\": \"7301\""));
    }
}
