//! File system layout, naming, and the error log.

pub mod error_log;
pub mod naming;
pub mod paths;

pub use error_log::ErrorLog;
pub use naming::{existing_media_file, image_filename, sanitize_title};
pub use paths::{ensure_dir, owner_dir, ProfileDirs};
