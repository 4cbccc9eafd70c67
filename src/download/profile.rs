//! Profile download pipeline.
//!
//! Three phases: discovery (one metadata pass over the profile), aggregate
//! metadata capture, then a sequential dispatch loop over the filtered posts.

use std::path::Path;

use reqwest::Client;

use crate::config::{Config, ContentFilter};
use crate::download::archive::Archive;
use crate::download::image::{fetch_image, image_client};
use crate::download::rate::RateLimiter;
use crate::download::state::ProfileSummary;
use crate::error::{Error, Result};
use crate::extractor::{format_expression, DownloadRequest, Extractor};
use crate::fs::{existing_media_file, image_filename, ErrorLog, ProfileDirs};
use crate::media::{Post, PostRecord, PostType, ProfileMetadata};
use crate::output::{ProgressEvent, Reporter};

/// Posts the content filter lets through, in discovery order.
fn partition_posts(posts: &[Post], filter: ContentFilter) -> Vec<&Post> {
    posts
        .iter()
        .filter(|post| filter.selects(post.post_type()))
        .collect()
}

/// Canonical URL of a post, reconstructed when the engine omitted it.
fn post_url(post: &Post, username: &str) -> String {
    match post.url() {
        Some(url) => url.to_string(),
        None => format!("https://www.tiktok.com/@{}/video/{}", username, post.id),
    }
}

/// Download a profile's posts according to the active content filter.
///
/// Individual post failures are reported and skipped; only discovery
/// failures and filesystem errors abort the run.
pub async fn download_profile(
    extractor: &dyn Extractor,
    config: &Config,
    reporter: &dyn Reporter,
    error_log: &ErrorLog,
    limiter: &RateLimiter,
    username: &str,
) -> Result<ProfileSummary> {
    let mut summary = ProfileSummary::new(username);
    let filter = config.options.content_type;
    let profile_url = format!("https://www.tiktok.com/@{}", username);

    reporter.event(ProgressEvent::DiscoveryStarted {
        username: username.to_string(),
    });

    let posts = match extractor
        .extract_metadata(&profile_url, config.options.max_downloads)
        .await
    {
        Ok(posts) => posts,
        // An expected early stop, not a failure
        Err(Error::MaxDownloadsReached) => {
            summary.stopped_at_limit = true;
            tracing::info!("Download limit reached during discovery");
            emit_summary(reporter, config, &summary);
            return Ok(summary);
        }
        Err(e) => return Err(e),
    };

    if posts.is_empty() {
        return Err(Error::ProfileEmpty(username.to_string()));
    }

    summary.posts_found = posts.len();
    reporter.event(ProgressEvent::Discovered {
        username: username.to_string(),
        total_posts: posts.len(),
    });

    let dirs = ProfileDirs::create(&config.options.output_dir, username, filter)?;

    if filter.writes_profile_metadata() {
        let records: Vec<PostRecord> = posts.iter().map(PostRecord::from_post).collect();
        let path = dirs.metadata_path(username);
        ProfileMetadata::new(username, records).write(&path)?;
        summary.metadata_saved = true;
        reporter.event(ProgressEvent::MetadataSaved {
            count: posts.len(),
            path,
        });
    }

    if filter.is_metadata_only() {
        emit_summary(reporter, config, &summary);
        return Ok(summary);
    }

    let selected = partition_posts(&posts, filter);
    summary.posts_enqueued = selected.len();

    let mut archive = if config.options.use_archive {
        Some(Archive::load(dirs.archive_path())?)
    } else {
        None
    };

    let total = selected.len();
    let mut http_client: Option<Client> = None;
    // The very first dispatch goes out immediately; delays only separate
    // consecutive network hits.
    let mut dispatched_any = false;

    for (index, post) in selected.into_iter().enumerate() {
        let index = index + 1;
        let post_type = post.post_type();
        let target = dirs.target_for(post_type);

        if config.options.skip_existing {
            if let Some(path) = existing_media_file(target, &post.id) {
                tracing::debug!("Already on disk: {}", path.display());
                reporter.event(ProgressEvent::PostSkipped {
                    index,
                    total,
                    title: post.short_title(),
                });
                summary.posts_downloaded += 1;
                continue;
            }
        }

        // The engine consults the archive itself for posts it downloads;
        // image fetches bypass the engine, so check it here.
        if post_type == PostType::Images {
            if let Some(archive) = &archive {
                if archive.contains(&post.id) {
                    reporter.event(ProgressEvent::PostSkipped {
                        index,
                        total,
                        title: post.short_title(),
                    });
                    summary.posts_downloaded += 1;
                    continue;
                }
            }
        }

        // A carousel without a thumbnail has nothing to fetch; warn and
        // move on without touching the network or the error log.
        let thumbnail_url = if post_type == PostType::Images {
            match post.first_thumbnail_url() {
                Some(url) => Some(url),
                None => {
                    reporter.event(ProgressEvent::Warning(format!(
                        "Post {} has no thumbnail to fetch, skipping",
                        post.id
                    )));
                    continue;
                }
            }
        } else {
            None
        };

        if dispatched_any {
            limiter.wait().await;
        }
        dispatched_any = true;

        let result = match thumbnail_url {
            Some(url) => fetch_carousel_image(&mut http_client, post, url, target, index).await,
            None => {
                dispatch_to_engine(
                    extractor,
                    config,
                    &dirs,
                    archive.as_ref(),
                    post,
                    post_type,
                    username,
                )
                .await
            }
        };

        match result {
            Ok(()) => {
                // The engine appends its own archive entry for the posts it
                // downloads; image fetches bypass it and are recorded here.
                if post_type == PostType::Images {
                    if let Some(archive) = &mut archive {
                        archive.record(&post.id)?;
                    }
                }
                summary.posts_downloaded += 1;
                reporter.event(ProgressEvent::PostCompleted {
                    index,
                    total,
                    title: post.short_title(),
                    post_type,
                });
            }
            Err(Error::MaxDownloadsReached) => {
                summary.stopped_at_limit = true;
                tracing::info!("Download limit reached, stopping");
                break;
            }
            Err(e) => {
                let error = e.to_string();
                reporter.event(ProgressEvent::PostFailed {
                    index,
                    total,
                    id: post.id.clone(),
                    error: error.clone(),
                });
                if let Err(log_err) = error_log.record(&post_url(post, username), &error).await {
                    tracing::warn!("Failed to append to error log: {}", log_err);
                }
            }
        }
    }

    emit_summary(reporter, config, &summary);
    Ok(summary)
}

async fn dispatch_to_engine(
    extractor: &dyn Extractor,
    config: &Config,
    dirs: &ProfileDirs,
    archive: Option<&Archive>,
    post: &Post,
    post_type: PostType,
    username: &str,
) -> Result<()> {
    let template = dirs
        .target_for(post_type)
        .join("%(autonumber)04d_%(title)s_[%(id)s].%(ext)s")
        .display()
        .to_string();

    let mut request = DownloadRequest::new(
        template,
        format_expression(config.fidelity(), Some(post_type)),
    );
    request.archive_file = archive.map(|a| a.path().to_path_buf());
    request.throttle_rate = config.effective_throttle_rate().map(String::from);
    request.sleep_hints = config.rate_limit.enabled;

    extractor.download(&post_url(post, username), &request).await?;
    Ok(())
}

async fn fetch_carousel_image(
    client: &mut Option<Client>,
    post: &Post,
    url: &str,
    target: &Path,
    index: usize,
) -> Result<()> {
    if client.is_none() {
        *client = Some(image_client()?);
    }
    let client = client.as_ref().ok_or_else(|| Error::Download("no HTTP client".into()))?;

    let dest = target.join(image_filename(index, &post.short_title(), &post.id));
    fetch_image(client, url, &dest).await
}

fn emit_summary(reporter: &dyn Reporter, config: &Config, summary: &ProfileSummary) {
    reporter.event(ProgressEvent::ProfileSummary {
        username: summary.username.clone(),
        downloaded: summary.posts_downloaded,
        enqueued: summary.posts_enqueued,
        content_type: config.options.content_type.to_string(),
        output_dir: config.options.output_dir.clone(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::download::testing::{
        audio_post, image_post, video_post, MockExtractor, RecordingReporter,
    };
    use tempfile::tempdir;

    fn test_config(dir: &std::path::Path, filter: ContentFilter) -> Config {
        let mut config = Config::default();
        config.options.output_dir = dir.to_path_buf();
        config.options.content_type = filter;
        config
    }

    fn mixed_posts() -> Vec<Post> {
        vec![video_post("7301"), audio_post("7302"), image_post("7303")]
    }

    #[test]
    fn test_partition_follows_filter() {
        let posts = mixed_posts();

        let all = partition_posts(&posts, ContentFilter::All);
        assert_eq!(all.len(), 3);

        let videos = partition_posts(&posts, ContentFilter::VideoOnly);
        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].id, "7301");

        let audio = partition_posts(&posts, ContentFilter::AudioOnly);
        assert_eq!(audio.len(), 1);
        assert_eq!(audio[0].id, "7302");

        assert!(partition_posts(&posts, ContentFilter::MetadataOnly).is_empty());
    }

    #[test]
    fn test_post_url_reconstruction() {
        let post = video_post("7301");
        assert_eq!(
            post_url(&post, "someuser"),
            "https://www.tiktok.com/@someuser/video/7301"
        );

        let post = Post {
            id: "7301".to_string(),
            webpage_url: Some("https://www.tiktok.com/@x/video/7301".to_string()),
            ..Default::default()
        };
        assert_eq!(post_url(&post, "someuser"), "https://www.tiktok.com/@x/video/7301");
    }

    #[tokio::test]
    async fn test_empty_profile_is_an_error() {
        let tmp = tempdir().unwrap();
        let config = test_config(tmp.path(), ContentFilter::VideoOnly);
        let extractor = MockExtractor::with_posts(vec![]);
        let reporter = RecordingReporter::default();
        let error_log = ErrorLog::new(tmp.path().join("errors.txt"));

        let result = download_profile(
            &extractor,
            &config,
            &reporter,
            &error_log,
            &RateLimiter::disabled(),
            "someuser",
        )
        .await;

        assert!(matches!(result, Err(Error::ProfileEmpty(_))));
    }

    #[tokio::test]
    async fn test_video_only_dispatches_only_videos() {
        let tmp = tempdir().unwrap();
        let config = test_config(tmp.path(), ContentFilter::VideoOnly);
        let extractor = MockExtractor::with_posts(mixed_posts());
        let reporter = RecordingReporter::default();
        let error_log = ErrorLog::new(tmp.path().join("errors.txt"));

        let summary = download_profile(
            &extractor,
            &config,
            &reporter,
            &error_log,
            &RateLimiter::disabled(),
            "someuser",
        )
        .await
        .unwrap();

        assert_eq!(summary.posts_found, 3);
        assert_eq!(summary.posts_enqueued, 1);
        assert_eq!(summary.posts_downloaded, 1);
        assert!(!summary.metadata_saved);
        assert_eq!(extractor.download_count(), 1);

        // Default filter only creates the videos subdir
        let root = tmp.path().join("someuser");
        assert!(root.join("videos").is_dir());
        assert!(!root.join("audio").exists());
    }

    #[tokio::test]
    async fn test_metadata_only_writes_document_without_dispatching() {
        let tmp = tempdir().unwrap();
        let config = test_config(tmp.path(), ContentFilter::MetadataOnly);
        let extractor = MockExtractor::with_posts(mixed_posts());
        let reporter = RecordingReporter::default();
        let error_log = ErrorLog::new(tmp.path().join("errors.txt"));

        let summary = download_profile(
            &extractor,
            &config,
            &reporter,
            &error_log,
            &RateLimiter::disabled(),
            "someuser",
        )
        .await
        .unwrap();

        assert!(summary.metadata_saved);
        assert_eq!(summary.posts_enqueued, 0);
        assert_eq!(extractor.download_count(), 0);

        let path = tmp.path().join("someuser").join("someuser_metadata.json");
        let doc: crate::media::ProfileMetadata =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(doc.total_posts, 3);
        assert_eq!(doc.profile_username, "someuser");
        // Every discovered post is recorded regardless of filter
        assert_eq!(doc.posts.len(), 3);
    }

    #[tokio::test]
    async fn test_skip_existing_counts_as_downloaded() {
        let tmp = tempdir().unwrap();
        let mut config = test_config(tmp.path(), ContentFilter::VideoOnly);
        config.options.skip_existing = true;

        let videos = tmp.path().join("someuser").join("videos");
        std::fs::create_dir_all(&videos).unwrap();
        std::fs::write(videos.join("0001_title_[7301].mp4"), b"x").unwrap();

        let extractor = MockExtractor::with_posts(mixed_posts());
        let reporter = RecordingReporter::default();
        let error_log = ErrorLog::new(tmp.path().join("errors.txt"));

        let summary = download_profile(
            &extractor,
            &config,
            &reporter,
            &error_log,
            &RateLimiter::disabled(),
            "someuser",
        )
        .await
        .unwrap();

        assert_eq!(summary.posts_downloaded, 1);
        assert_eq!(extractor.download_count(), 0);
    }

    #[tokio::test]
    async fn test_archived_image_post_is_skipped_locally() {
        let tmp = tempdir().unwrap();
        let config = test_config(tmp.path(), ContentFilter::ImagesOnly);

        let root = tmp.path().join("someuser");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join("archive.txt"), "tiktok 7303\n").unwrap();

        let extractor = MockExtractor::with_posts(mixed_posts());
        let reporter = RecordingReporter::default();
        let error_log = ErrorLog::new(tmp.path().join("errors.txt"));

        let summary = download_profile(
            &extractor,
            &config,
            &reporter,
            &error_log,
            &RateLimiter::disabled(),
            "someuser",
        )
        .await
        .unwrap();

        // The only image post was archived, so nothing hit the network
        assert_eq!(summary.posts_enqueued, 1);
        assert_eq!(summary.posts_downloaded, 1);
        assert_eq!(extractor.download_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_thumbnail_warns_without_error_log() {
        let tmp = tempdir().unwrap();
        let config = test_config(tmp.path(), ContentFilter::ImagesOnly);

        // Classified as a carousel, but the thumbnail descriptor has no URL
        let mut post = image_post("7303");
        post.thumbnails = vec![crate::media::Thumbnail::default()];

        let extractor = MockExtractor::with_posts(vec![post]);
        let reporter = RecordingReporter::default();
        let error_log = ErrorLog::new(tmp.path().join("errors.txt"));

        let summary = download_profile(
            &extractor,
            &config,
            &reporter,
            &error_log,
            &RateLimiter::disabled(),
            "someuser",
        )
        .await
        .unwrap();

        assert_eq!(summary.posts_enqueued, 1);
        assert_eq!(summary.posts_downloaded, 0);
        assert_eq!(extractor.download_count(), 0);

        let events = reporter.events.lock().unwrap();
        assert!(events.iter().any(|e| matches!(e, ProgressEvent::Warning(_))));
        assert!(!events.iter().any(|e| matches!(e, ProgressEvent::PostFailed { .. })));

        // Only a warning: nothing lands in the error log
        assert!(!tmp.path().join("errors.txt").exists());
    }

    #[tokio::test]
    async fn test_one_failure_does_not_stop_the_loop() {
        let tmp = tempdir().unwrap();
        let config = test_config(tmp.path(), ContentFilter::VideoOnly);

        let extractor = MockExtractor::with_posts(vec![video_post("7301"), video_post("7302")])
            .failing_ids(vec!["7301"]);
        let reporter = RecordingReporter::default();
        let error_log = ErrorLog::new(tmp.path().join("errors.txt"));

        let summary = download_profile(
            &extractor,
            &config,
            &reporter,
            &error_log,
            &RateLimiter::disabled(),
            "someuser",
        )
        .await
        .unwrap();

        assert_eq!(summary.posts_enqueued, 2);
        assert_eq!(summary.posts_downloaded, 1);
        assert_eq!(extractor.download_count(), 2);

        let logged = std::fs::read_to_string(tmp.path().join("errors.txt")).unwrap();
        assert!(logged.contains("7301"));
    }

    #[tokio::test]
    async fn test_max_downloads_signal_during_discovery_is_success() {
        let tmp = tempdir().unwrap();
        let config = test_config(tmp.path(), ContentFilter::VideoOnly);

        let extractor =
            MockExtractor::with_posts(vec![video_post("7301")]).limit_during_discovery();
        let reporter = RecordingReporter::default();
        let error_log = ErrorLog::new(tmp.path().join("errors.txt"));

        let summary = download_profile(
            &extractor,
            &config,
            &reporter,
            &error_log,
            &RateLimiter::disabled(),
            "someuser",
        )
        .await
        .unwrap();

        assert!(summary.stopped_at_limit);
        assert_eq!(summary.posts_found, 0);
        assert_eq!(summary.posts_downloaded, 0);
        assert_eq!(extractor.download_count(), 0);

        // The run still closes with a summary report
        let events = reporter.events.lock().unwrap();
        assert!(events
            .iter()
            .any(|e| matches!(e, ProgressEvent::ProfileSummary { .. })));
    }

    #[tokio::test]
    async fn test_max_downloads_signal_stops_early() {
        let tmp = tempdir().unwrap();
        let config = test_config(tmp.path(), ContentFilter::VideoOnly);

        let extractor = MockExtractor::with_posts(vec![video_post("7301"), video_post("7302")])
            .limit_after(1);
        let reporter = RecordingReporter::default();
        let error_log = ErrorLog::new(tmp.path().join("errors.txt"));

        let summary = download_profile(
            &extractor,
            &config,
            &reporter,
            &error_log,
            &RateLimiter::disabled(),
            "someuser",
        )
        .await
        .unwrap();

        assert!(summary.stopped_at_limit);
        assert_eq!(summary.posts_downloaded, 1);
    }

    #[tokio::test]
    async fn test_archive_path_forwarded_to_engine() {
        let tmp = tempdir().unwrap();
        let config = test_config(tmp.path(), ContentFilter::VideoOnly);
        let extractor = MockExtractor::with_posts(vec![video_post("7301")]);
        let reporter = RecordingReporter::default();
        let error_log = ErrorLog::new(tmp.path().join("errors.txt"));

        download_profile(
            &extractor,
            &config,
            &reporter,
            &error_log,
            &RateLimiter::disabled(),
            "someuser",
        )
        .await
        .unwrap();

        let request = extractor.last_request().unwrap();
        assert_eq!(
            request.archive_file.as_deref(),
            Some(tmp.path().join("someuser").join("archive.txt").as_path())
        );
        assert!(request
            .output_template
            .ends_with("%(autonumber)04d_%(title)s_[%(id)s].%(ext)s"));
    }

    #[tokio::test]
    async fn test_no_archive_disables_tracking() {
        let tmp = tempdir().unwrap();
        let mut config = test_config(tmp.path(), ContentFilter::VideoOnly);
        config.options.use_archive = false;

        let extractor = MockExtractor::with_posts(vec![video_post("7301")]);
        let reporter = RecordingReporter::default();
        let error_log = ErrorLog::new(tmp.path().join("errors.txt"));

        download_profile(
            &extractor,
            &config,
            &reporter,
            &error_log,
            &RateLimiter::disabled(),
            "someuser",
        )
        .await
        .unwrap();

        assert!(extractor.last_request().unwrap().archive_file.is_none());
    }
}
