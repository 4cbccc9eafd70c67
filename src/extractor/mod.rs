//! The extraction/download engine boundary.
//!
//! yt-dlp does the actual protocol work; this module wraps it behind the
//! [`Extractor`] trait so the pipelines stay testable without a network or
//! the binary on PATH.

pub mod headers;
pub mod options;
pub mod ytdlp;

pub use headers::{random_user_agent, USER_AGENTS};
pub use options::{format_expression, DownloadRequest};
pub use ytdlp::{Extractor, YtDlp};
