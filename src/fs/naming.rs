//! Filename generation and the skip-existing predicate.

use std::path::{Path, PathBuf};

/// Extensions the downloader can produce for a post.
pub const MEDIA_EXTENSIONS: &[&str] = &["mp4", "webm", "mkv", "m4a", "mp3", "jpg", "jpeg"];

/// Sanitize a post title for use in a filename.
///
/// Keeps only alphanumerics, spaces, `-` and `_`, truncated to 50 characters.
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .take(50)
        .collect::<String>()
        .trim()
        .to_string()
}

/// Build the destination filename for a carousel image.
pub fn image_filename(index: usize, title: &str, post_id: &str) -> String {
    format!("{:04}_{}_{}.jpg", index, sanitize_title(title), post_id)
}

/// Find an existing media file for a post id in a directory.
///
/// One predicate for every download path. Matches the naming schemes the
/// downloader produces: `{id}.ext` (single-URL mode), `..._[{id}].ext`
/// (profile output template) and `..._{id}.ext` (carousel images), across
/// the known media extensions.
pub fn existing_media_file(dir: &Path, post_id: &str) -> Option<PathBuf> {
    let entries = std::fs::read_dir(dir).ok()?;

    let bracketed = format!("[{}]", post_id);
    let suffixed = format!("_{}", post_id);

    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let ext = match path.extension().and_then(|e| e.to_str()) {
            Some(e) => e.to_ascii_lowercase(),
            None => continue,
        };
        if !MEDIA_EXTENSIONS.contains(&ext.as_str()) {
            continue;
        }

        let stem = match path.file_stem().and_then(|s| s.to_str()) {
            Some(s) => s,
            None => continue,
        };

        if stem == post_id || stem.ends_with(&bracketed) || stem.ends_with(&suffixed) {
            return Some(path);
        }
    }

    None
}
