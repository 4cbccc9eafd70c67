//! Persisted metadata records.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::media::post::{Post, PostType, Thumbnail};

/// Per-post record inside a profile metadata document.
///
/// A fixed subset of the engine's entry; recorded for every discovered post
/// regardless of the content filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRecord {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration: Option<f64>,
    pub view_count: Option<u64>,
    pub like_count: Option<u64>,
    pub comment_count: Option<u64>,
    pub timestamp: Option<i64>,
    pub upload_date: Option<String>,
    pub uploader: Option<String>,
    pub uploader_id: Option<String>,
    pub webpage_url: Option<String>,
    pub post_type: PostType,
    pub thumbnails: Vec<Thumbnail>,
}

impl PostRecord {
    pub fn from_post(post: &Post) -> Self {
        Self {
            id: post.id.clone(),
            title: post.title.clone(),
            description: post.description.clone(),
            duration: post.duration,
            view_count: post.view_count,
            like_count: post.like_count,
            comment_count: post.comment_count,
            timestamp: post.timestamp,
            upload_date: post.upload_date.clone(),
            uploader: post.uploader.clone(),
            uploader_id: post.uploader_id.clone(),
            webpage_url: post.webpage_url.clone(),
            post_type: post.post_type(),
            thumbnails: post.thumbnails.clone(),
        }
    }
}

/// Aggregate metadata document for one profile run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileMetadata {
    pub profile_username: String,
    /// ISO-8601 timestamp of the extraction pass.
    pub extraction_date: String,
    pub total_posts: usize,
    pub posts: Vec<PostRecord>,
}

impl ProfileMetadata {
    pub fn new(username: &str, posts: Vec<PostRecord>) -> Self {
        Self {
            profile_username: username.to_string(),
            extraction_date: chrono::Local::now().to_rfc3339(),
            total_posts: posts.len(),
            posts,
        }
    }

    /// Write the document as indented JSON.
    pub fn write(&self, path: &Path) -> Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// Metadata subset persisted next to a single downloaded item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostMetadata {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration: Option<f64>,
    pub view_count: Option<u64>,
    pub like_count: Option<u64>,
    pub comment_count: Option<u64>,
    pub upload_date: Option<String>,
    pub uploader: Option<String>,
    pub uploader_id: Option<String>,
    pub webpage_url: Option<String>,
    pub ext: Option<String>,
    pub format: Option<String>,
    /// Derived "WxH" string, present only when the width is known.
    pub resolution: Option<String>,
    pub filesize: Option<u64>,
}

impl PostMetadata {
    pub fn from_post(post: &Post) -> Self {
        Self {
            id: post.id.clone(),
            title: post.title.clone(),
            description: post.description.clone(),
            duration: post.duration,
            view_count: post.view_count,
            like_count: post.like_count,
            comment_count: post.comment_count,
            upload_date: post.upload_date.clone(),
            uploader: post.uploader.clone(),
            uploader_id: post.uploader_id.clone(),
            webpage_url: post.webpage_url.clone(),
            ext: post.ext.clone(),
            format: post.format.clone(),
            resolution: post.resolution(),
            filesize: post.filesize,
        }
    }

    /// Write the record as indented JSON.
    pub fn write(&self, path: &Path) -> Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}
