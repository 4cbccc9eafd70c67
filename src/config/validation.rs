//! Configuration validation logic.

use regex::Regex;

use crate::config::loader::Config;
use crate::error::{Error, Result};

/// Maximum username length accepted by the platform.
const MAX_USERNAME_LENGTH: usize = 24;

/// Validate the merged configuration before any network activity.
pub fn validate_config(config: &Config) -> Result<()> {
    if config.options.workers == 0 {
        return Err(Error::ConfigValidation {
            field: "workers".to_string(),
            message: "At least one worker is required".to_string(),
        });
    }

    validate_delays(&config.rate_limit)?;

    if let Some(rate) = &config.rate_limit.throttle_rate {
        validate_throttle_rate(rate)?;
    }

    Ok(())
}

/// Validate the delay window settings.
///
/// `min_delay` and `max_delay` are an all-or-nothing pair; supplying only one
/// is a configuration error, as is an inverted or negative window.
pub fn validate_delays(rate_limit: &crate::config::RateLimitConfig) -> Result<()> {
    if rate_limit.delay < 0.0 {
        return Err(Error::ConfigValidation {
            field: "delay".to_string(),
            message: "Delay cannot be negative".to_string(),
        });
    }

    match (rate_limit.min_delay, rate_limit.max_delay) {
        (Some(min), Some(max)) => {
            if min < 0.0 || max < 0.0 {
                return Err(Error::ConfigValidation {
                    field: "min_delay/max_delay".to_string(),
                    message: "Delays cannot be negative".to_string(),
                });
            }
            if min > max {
                return Err(Error::ConfigValidation {
                    field: "min_delay/max_delay".to_string(),
                    message: format!("min_delay ({}) exceeds max_delay ({})", min, max),
                });
            }
            Ok(())
        }
        (None, None) => Ok(()),
        _ => Err(Error::ConfigValidation {
            field: "min_delay/max_delay".to_string(),
            message: "--min-delay and --max-delay must be used together".to_string(),
        }),
    }
}

/// Validate a throttle rate expression such as `500K`, `1M` or `2.5M`.
pub fn validate_throttle_rate(rate: &str) -> Result<()> {
    let pattern = Regex::new(r"^\d+(\.\d+)?[KkMmGg]?$").unwrap();

    if !pattern.is_match(rate) {
        return Err(Error::ConfigValidation {
            field: "throttle_rate".to_string(),
            message: format!(
                "Invalid rate '{}'. Use a number with an optional K/M/G suffix (e.g. 500K, 1M).",
                rate
            ),
        });
    }

    Ok(())
}

/// Normalize a profile username: strip whitespace and any leading `@`.
pub fn sanitize_username(username: &str) -> Result<String> {
    let clean = username.trim().trim_start_matches('@');

    if clean.is_empty() {
        return Err(Error::ConfigValidation {
            field: "profile".to_string(),
            message: "Username cannot be empty".to_string(),
        });
    }

    if clean.len() > MAX_USERNAME_LENGTH {
        return Err(Error::ConfigValidation {
            field: "profile".to_string(),
            message: format!(
                "Username '{}' is too long (maximum {} characters)",
                clean, MAX_USERNAME_LENGTH
            ),
        });
    }

    // Platform usernames: letters, digits, underscores, periods
    let pattern = Regex::new(r"^[A-Za-z0-9_.]+$").unwrap();
    if !pattern.is_match(clean) {
        return Err(Error::ConfigValidation {
            field: "profile".to_string(),
            message: format!(
                "Username '{}' contains invalid characters. Only alphanumerics, underscores, and periods allowed.",
                username
            ),
        });
    }

    Ok(clean.to_string())
}
