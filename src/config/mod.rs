//! Configuration handling.

pub mod filter;
pub mod loader;
pub mod validation;

pub use filter::{ContentFilter, Fidelity};
pub use loader::{Config, OptionsConfig, RateLimitConfig};
pub use validation::{sanitize_username, validate_config};
