//! rapidok - A TikTok content downloader
//!
//! This library provides functionality for downloading TikTok videos, image
//! carousels, and audio posts, either from individual post URLs or by
//! enumerating entire user profiles.
//!
//! # Features
//!
//! - Batch downloads from a links file with bounded concurrency
//! - Full profile downloads with content-type filtering
//! - Post classification (video / audio / image carousel)
//! - Watermark-free format selection
//! - Per-profile archive tracking to avoid re-downloads
//! - Randomized rate limiting and bandwidth throttling
//! - Metadata capture as JSON documents
//!
//! # Example
//!
//! ```no_run
//! use rapidok::{download_profile, Config, ConsoleReporter, ErrorLog, RateLimiter, YtDlp};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let engine = YtDlp::locate();
//!     let reporter = ConsoleReporter::new();
//!     let error_log = ErrorLog::new(ErrorLog::default_path());
//!     let limiter = RateLimiter::from_config(&config.rate_limit)?;
//!
//!     let summary = download_profile(
//!         &engine, &config, &reporter, &error_log, &limiter, "someuser",
//!     )
//!     .await?;
//!     println!("Downloaded {} posts", summary.posts_downloaded);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod extractor;
pub mod fs;
pub mod media;
pub mod output;

// Re-exports for convenience
pub use config::{Config, ContentFilter, Fidelity};
pub use download::{
    download_from_url, download_profile, run_batch, BatchSummary, ProfileSummary, RateLimiter,
    UrlOutcome,
};
pub use error::{Error, Result};
pub use extractor::{Extractor, YtDlp};
pub use fs::ErrorLog;
pub use media::{Post, PostType};
pub use output::{ConsoleReporter, Reporter};
