//! Command-line argument definitions using clap.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::{Config, ContentFilter};

/// TikTok content downloader CLI.
#[derive(Parser, Debug)]
#[command(
    name = "rapidok",
    version,
    about = "Download TikTok videos, images, and audio from URLs or entire user profiles",
    long_about = "A CLI tool to download TikTok content.\n\n\
                  Supports batch downloading from a file of post URLs and enumerating \
                  entire user profiles with content-type filtering, archive tracking, \
                  and anti-detection rate limiting."
)]
pub struct Args {
    /// Path to a .txt file with TikTok URLs for batch download.
    #[arg(long, conflicts_with = "profile")]
    pub links: Option<PathBuf>,

    /// TikTok username to download an entire profile from.
    #[arg(long)]
    pub profile: Option<String>,

    /// Download videos without watermarks (default).
    #[arg(long, conflicts_with = "watermark")]
    pub no_watermark: bool,

    /// Download videos with watermarks.
    #[arg(long)]
    pub watermark: bool,

    /// Number of concurrent downloads in batch mode (recommended max: 5).
    #[arg(long)]
    pub workers: Option<usize>,

    /// Output directory.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Maximum posts to download (profile mode only).
    #[arg(long)]
    pub max_downloads: Option<usize>,

    /// Disable archive tracking (profile mode).
    #[arg(long)]
    pub no_archive: bool,

    /// Skip downloading files that already exist.
    #[arg(long)]
    pub skip_existing: bool,

    /// Save detailed metadata for each downloaded item.
    #[arg(long)]
    pub save_metadata: bool,

    /// Base delay between downloads in seconds; random jitter is applied.
    #[arg(long)]
    pub delay: Option<f64>,

    /// Minimum delay between downloads (must be paired with --max-delay).
    #[arg(long)]
    pub min_delay: Option<f64>,

    /// Maximum delay between downloads (must be paired with --min-delay).
    #[arg(long)]
    pub max_delay: Option<f64>,

    /// Limit download speed (e.g. 500K, 1M, 2M bytes/sec).
    #[arg(long)]
    pub throttle_rate: Option<String>,

    /// Disable all rate limiting (risk of IP blocking).
    #[arg(long)]
    pub no_rate_limit: bool,

    /// Type of content to download from a profile.
    #[arg(long, value_enum)]
    pub content_type: Option<ContentFilterArg>,

    /// Path to configuration file.
    #[arg(short, long, default_value = "rapidok.toml")]
    pub config: PathBuf,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

/// CLI content filter argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ContentFilterArg {
    /// Every post regardless of type.
    All,
    /// Video posts only (default).
    VideoOnly,
    /// Pure audio posts only.
    AudioOnly,
    /// Image carousels only.
    ImagesOnly,
    /// Capture metadata without downloading media.
    MetadataOnly,
}

impl From<ContentFilterArg> for ContentFilter {
    fn from(arg: ContentFilterArg) -> Self {
        match arg {
            ContentFilterArg::All => ContentFilter::All,
            ContentFilterArg::VideoOnly => ContentFilter::VideoOnly,
            ContentFilterArg::AudioOnly => ContentFilter::AudioOnly,
            ContentFilterArg::ImagesOnly => ContentFilter::ImagesOnly,
            ContentFilterArg::MetadataOnly => ContentFilter::MetadataOnly,
        }
    }
}

/// Selected run mode after argument resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// Batch download from a links file.
    Links(PathBuf),
    /// Full profile download for a username.
    Profile(String),
}

impl Args {
    /// Resolve the run mode; defaults to reading `links.txt`.
    pub fn run_mode(&self) -> RunMode {
        if let Some(username) = &self.profile {
            RunMode::Profile(username.clone())
        } else {
            RunMode::Links(
                self.links
                    .clone()
                    .unwrap_or_else(|| PathBuf::from("links.txt")),
            )
        }
    }

    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(&self, config: &mut Config) {
        if let Some(workers) = self.workers {
            config.options.workers = workers;
        }

        if let Some(dir) = &self.output_dir {
            config.options.output_dir = dir.clone();
        }

        if let Some(max) = self.max_downloads {
            config.options.max_downloads = Some(max);
        }

        if let Some(filter) = self.content_type {
            config.options.content_type = filter.into();
        }

        if let Some(delay) = self.delay {
            config.rate_limit.delay = delay;
        }

        if let Some(min) = self.min_delay {
            config.rate_limit.min_delay = Some(min);
        }

        if let Some(max) = self.max_delay {
            config.rate_limit.max_delay = Some(max);
        }

        if let Some(rate) = &self.throttle_rate {
            config.rate_limit.throttle_rate = Some(rate.clone());
        }

        // Boolean flags (only override when set)
        if self.watermark {
            config.options.watermark = true;
        }

        if self.no_watermark {
            config.options.watermark = false;
        }

        if self.no_archive {
            config.options.use_archive = false;
        }

        if self.skip_existing {
            config.options.skip_existing = true;
        }

        if self.save_metadata {
            config.options.save_metadata = true;
        }

        if self.no_rate_limit {
            config.rate_limit.enabled = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_default_mode_reads_links_txt() {
        let args = Args::parse_from(["rapidok"]);
        assert_eq!(args.run_mode(), RunMode::Links(PathBuf::from("links.txt")));
    }

    #[test]
    fn test_profile_mode() {
        let args = Args::parse_from(["rapidok", "--profile", "someuser"]);
        assert_eq!(args.run_mode(), RunMode::Profile("someuser".to_string()));
    }

    #[test]
    fn test_links_and_profile_conflict() {
        let result =
            Args::try_parse_from(["rapidok", "--links", "urls.txt", "--profile", "someuser"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_watermark_flags_conflict() {
        let result = Args::try_parse_from(["rapidok", "--watermark", "--no-watermark"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_merge_overrides_config() {
        let args = Args::parse_from([
            "rapidok",
            "--workers",
            "4",
            "--no-archive",
            "--content-type",
            "images-only",
            "--delay",
            "5.0",
            "--no-rate-limit",
        ]);

        let mut config = Config::default();
        args.merge_into_config(&mut config);

        assert_eq!(config.options.workers, 4);
        assert!(!config.options.use_archive);
        assert_eq!(config.options.content_type, ContentFilter::ImagesOnly);
        assert_eq!(config.rate_limit.delay, 5.0);
        assert!(!config.rate_limit.enabled);
    }
}
