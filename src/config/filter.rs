//! Content filter and fidelity definitions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::media::PostType;

/// User-selected content filter, supplied once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentFilter {
    /// Download every post regardless of type.
    All,
    /// Download only video posts (default).
    #[default]
    VideoOnly,
    /// Download only pure audio posts.
    AudioOnly,
    /// Download only image carousels.
    ImagesOnly,
    /// Capture metadata without downloading any media.
    MetadataOnly,
}

impl ContentFilter {
    /// Whether a post of this type should be downloaded under this filter.
    ///
    /// `MetadataOnly` selects nothing; metadata is still captured upstream
    /// regardless of this result.
    pub fn selects(&self, post_type: PostType) -> bool {
        match self {
            ContentFilter::All => true,
            ContentFilter::VideoOnly => post_type == PostType::Video,
            ContentFilter::AudioOnly => post_type == PostType::AudioOnly,
            ContentFilter::ImagesOnly => post_type == PostType::Images,
            ContentFilter::MetadataOnly => false,
        }
    }

    /// Whether a profile run with this filter writes the aggregate
    /// metadata document.
    pub fn writes_profile_metadata(&self) -> bool {
        matches!(self, ContentFilter::All | ContentFilter::MetadataOnly)
    }

    pub fn is_metadata_only(&self) -> bool {
        matches!(self, ContentFilter::MetadataOnly)
    }
}

impl fmt::Display for ContentFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentFilter::All => write!(f, "all"),
            ContentFilter::VideoOnly => write!(f, "video-only"),
            ContentFilter::AudioOnly => write!(f, "audio-only"),
            ContentFilter::ImagesOnly => write!(f, "images-only"),
            ContentFilter::MetadataOnly => write!(f, "metadata-only"),
        }
    }
}

impl FromStr for ContentFilter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(ContentFilter::All),
            "video-only" => Ok(ContentFilter::VideoOnly),
            "audio-only" => Ok(ContentFilter::AudioOnly),
            "images-only" => Ok(ContentFilter::ImagesOnly),
            "metadata-only" => Ok(ContentFilter::MetadataOnly),
            _ => Err(format!("Unknown content filter: {}", s)),
        }
    }
}

/// Desired download fidelity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fidelity {
    /// Watermark-free streams preferred (default).
    #[default]
    Clean,
    /// The platform's generic watermarked download stream.
    Watermarked,
}
