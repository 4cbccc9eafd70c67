//! Download pipelines: single URLs, whole profiles, and batched links files.

pub mod archive;
pub mod batch;
pub mod image;
pub mod profile;
pub mod rate;
pub mod single;
pub mod state;

pub use archive::Archive;
pub use batch::{read_links, run_batch};
pub use profile::download_profile;
pub use rate::{RateLimiter, RateWindow};
pub use single::{download_from_url, parse_post_url};
pub use state::{BatchSummary, ProfileSummary, UrlOutcome};
