//! Post representation and type classification.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Classified type of a TikTok post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostType {
    Video,
    AudioOnly,
    Images,
    Unknown,
}

impl PostType {
    /// Get the per-profile subfolder name for this post type.
    pub fn folder_name(&self) -> &'static str {
        match self {
            PostType::Video => "videos",
            PostType::AudioOnly => "audio",
            PostType::Images | PostType::Unknown => "images",
        }
    }
}

impl fmt::Display for PostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostType::Video => write!(f, "video"),
            PostType::AudioOnly => write!(f, "audio_only"),
            PostType::Images => write!(f, "images"),
            PostType::Unknown => write!(f, "unknown"),
        }
    }
}

/// One format descriptor from the extraction engine.
///
/// A codec tag of `"none"` is the engine's convention for "no stream of this
/// kind" and is treated the same as an absent tag.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormatDescriptor {
    #[serde(default)]
    pub format_id: Option<String>,

    #[serde(default)]
    pub ext: Option<String>,

    #[serde(default)]
    pub vcodec: Option<String>,

    #[serde(default)]
    pub acodec: Option<String>,
}

impl FormatDescriptor {
    /// Whether this format carries a real video stream.
    pub fn has_video(&self) -> bool {
        is_real_codec(self.vcodec.as_deref())
    }

    /// Whether this format carries a real audio stream.
    pub fn has_audio(&self) -> bool {
        is_real_codec(self.acodec.as_deref())
    }
}

fn is_real_codec(tag: Option<&str>) -> bool {
    matches!(tag, Some(c) if !c.is_empty() && c != "none")
}

/// One thumbnail descriptor from the extraction engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Thumbnail {
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub width: Option<u32>,

    #[serde(default)]
    pub height: Option<u32>,
}

/// One post as extracted by the engine.
///
/// Deserialized straight from the engine's JSON entry; every optional field
/// defaults at this boundary so untyped data never reaches the classifier.
/// Never mutated after extraction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Post {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub duration: Option<f64>,

    #[serde(default)]
    pub view_count: Option<u64>,

    #[serde(default)]
    pub like_count: Option<u64>,

    #[serde(default)]
    pub comment_count: Option<u64>,

    #[serde(default)]
    pub timestamp: Option<i64>,

    #[serde(default)]
    pub upload_date: Option<String>,

    #[serde(default)]
    pub uploader: Option<String>,

    #[serde(default)]
    pub uploader_id: Option<String>,

    #[serde(default)]
    pub webpage_url: Option<String>,

    #[serde(default)]
    pub ext: Option<String>,

    #[serde(default)]
    pub format: Option<String>,

    #[serde(default)]
    pub width: Option<u32>,

    #[serde(default)]
    pub height: Option<u32>,

    #[serde(default)]
    pub filesize: Option<u64>,

    #[serde(default)]
    pub formats: Vec<FormatDescriptor>,

    #[serde(default)]
    pub thumbnails: Vec<Thumbnail>,
}

impl Post {
    /// Classify this post from its format and thumbnail descriptors.
    ///
    /// Priority order: a real video codec wins; a real audio codec plus
    /// thumbnails means an image carousel (slideshows expose only an audio
    /// track through the engine, the thumbnails are the content); a real
    /// audio codec alone is a pure audio post; anything else is unknown.
    pub fn post_type(&self) -> PostType {
        if self.formats.is_empty() {
            return PostType::Unknown;
        }

        let has_video = self.formats.iter().any(FormatDescriptor::has_video);
        let has_audio = self.formats.iter().any(FormatDescriptor::has_audio);

        if has_video {
            PostType::Video
        } else if has_audio && !self.thumbnails.is_empty() {
            PostType::Images
        } else if has_audio {
            PostType::AudioOnly
        } else {
            PostType::Unknown
        }
    }

    /// Title truncated for display, or a placeholder.
    pub fn short_title(&self) -> String {
        let title = self.title.as_deref().unwrap_or("Untitled");
        title.chars().take(50).collect()
    }

    /// Canonical URL of this post, if the engine reported one.
    pub fn url(&self) -> Option<&str> {
        self.webpage_url.as_deref()
    }

    /// URL of the first (usually highest quality) thumbnail.
    pub fn first_thumbnail_url(&self) -> Option<&str> {
        self.thumbnails.first().and_then(|t| t.url.as_deref())
    }

    /// Derived "WxH" resolution string, when the width is known.
    pub fn resolution(&self) -> Option<String> {
        self.width
            .map(|w| format!("{}x{}", w, self.height.unwrap_or(0)))
    }
}
