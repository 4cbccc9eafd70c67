//! Per-profile archive of completed post ids.

use std::collections::HashSet;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Append-only record of completed downloads for one profile.
///
/// Persisted as a flat text file, one `tiktok {id}` line per post, in the
/// format the extraction engine reads natively for its own skip-if-present
/// check. An id present here is never fetched again while tracking is on.
#[derive(Debug)]
pub struct Archive {
    path: PathBuf,
    ids: HashSet<String>,
}

impl Archive {
    /// Load an archive, tolerating a missing file.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let ids = match std::fs::read_to_string(&path) {
            Ok(content) => content
                .lines()
                .filter_map(|line| line.split_whitespace().last())
                .map(String::from)
                .collect(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashSet::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self { path, ids })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Record a completed id; appends one line in a single write call.
    pub fn record(&mut self, id: &str) -> Result<()> {
        if !self.ids.insert(id.to_string()) {
            return Ok(());
        }

        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;
        file.write_all(format!("tiktok {}\n", id).as_bytes())?;
        Ok(())
    }
}
