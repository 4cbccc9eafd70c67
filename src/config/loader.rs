//! Configuration structures and loading logic.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::filter::{ContentFilter, Fidelity};
use crate::error::Result;

/// Main configuration structure.
///
/// Loaded from an optional `rapidok.toml`; CLI arguments are merged on top
/// afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub options: OptionsConfig,

    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

/// Download options configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsConfig {
    /// Base directory for downloads.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Concurrent downloads in batch mode.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Maximum posts to process in profile mode.
    #[serde(default)]
    pub max_downloads: Option<usize>,

    /// Track completed post ids in a per-profile archive file.
    #[serde(default = "default_true")]
    pub use_archive: bool,

    /// Skip posts whose media file already exists on disk.
    #[serde(default)]
    pub skip_existing: bool,

    /// Persist per-item metadata JSON next to downloads.
    #[serde(default)]
    pub save_metadata: bool,

    /// Download the platform's watermarked streams.
    #[serde(default)]
    pub watermark: bool,

    /// Content filter for profile mode.
    #[serde(default)]
    pub content_type: ContentFilter,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            workers: default_workers(),
            max_downloads: None,
            use_archive: true,
            skip_existing: false,
            save_metadata: false,
            watermark: false,
            content_type: ContentFilter::default(),
        }
    }
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Master switch; disabling removes every inter-request delay.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Base delay in seconds; ±50% jitter is applied around it.
    #[serde(default = "default_delay")]
    pub delay: f64,

    /// Explicit window override; must be supplied together with `max_delay`.
    #[serde(default)]
    pub min_delay: Option<f64>,

    /// Explicit window override; must be supplied together with `min_delay`.
    #[serde(default)]
    pub max_delay: Option<f64>,

    /// Byte-rate cap hint forwarded to the extraction engine (e.g. "500K").
    #[serde(default)]
    pub throttle_rate: Option<String>,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            delay: default_delay(),
            min_delay: None,
            max_delay: None,
            throttle_rate: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Requested download fidelity.
    pub fn fidelity(&self) -> Fidelity {
        if self.options.watermark {
            Fidelity::Watermarked
        } else {
            Fidelity::Clean
        }
    }

    /// Throttle rate hint, honored only while rate limiting is enabled.
    pub fn effective_throttle_rate(&self) -> Option<&str> {
        if self.rate_limit.enabled {
            self.rate_limit.throttle_rate.as_deref()
        } else {
            None
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("downloads")
}

fn default_workers() -> usize {
    2
}

fn default_delay() -> f64 {
    2.0
}

fn default_true() -> bool {
    true
}
