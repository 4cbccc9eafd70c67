//! Path and directory management.

use std::path::{Path, PathBuf};

use crate::config::ContentFilter;
use crate::error::Result;
use crate::media::PostType;

/// Per-profile directory layout.
///
/// Only the subdirectories the active content filter can route into are
/// created.
#[derive(Debug, Clone)]
pub struct ProfileDirs {
    pub root: PathBuf,
    pub videos: PathBuf,
    pub audio: PathBuf,
    pub images: PathBuf,
}

impl ProfileDirs {
    /// Create the directory layout for a profile run.
    pub fn create(output_dir: &Path, username: &str, filter: ContentFilter) -> Result<Self> {
        let root = output_dir.join(username);
        std::fs::create_dir_all(&root)?;

        let dirs = Self {
            videos: root.join("videos"),
            audio: root.join("audio"),
            images: root.join("images"),
            root,
        };

        if matches!(filter, ContentFilter::All | ContentFilter::VideoOnly) {
            std::fs::create_dir_all(&dirs.videos)?;
        }
        if matches!(filter, ContentFilter::All | ContentFilter::AudioOnly) {
            std::fs::create_dir_all(&dirs.audio)?;
        }
        if matches!(filter, ContentFilter::All | ContentFilter::ImagesOnly) {
            std::fs::create_dir_all(&dirs.images)?;
        }

        Ok(dirs)
    }

    /// Target directory for a post of the given type.
    pub fn target_for(&self, post_type: PostType) -> &Path {
        match post_type {
            PostType::Video => &self.videos,
            PostType::AudioOnly => &self.audio,
            PostType::Images | PostType::Unknown => &self.images,
        }
    }

    /// Path of the aggregate metadata document for this profile.
    pub fn metadata_path(&self, username: &str) -> PathBuf {
        self.root.join(format!("{}_metadata.json", username))
    }

    /// Path of the archive file for this profile.
    pub fn archive_path(&self) -> PathBuf {
        self.root.join("archive.txt")
    }
}

/// Create and return the per-owner directory used in single-URL mode.
pub fn owner_dir(output_dir: &Path, username: &str) -> Result<PathBuf> {
    let dir = output_dir.join(username);
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
