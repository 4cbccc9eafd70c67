//! Randomized inter-request delays.

use std::time::Duration;

use rand::Rng;
use tokio::time::sleep;

use crate::config::RateLimitConfig;
use crate::error::{Error, Result};

/// Delay window in seconds; one value is drawn uniformly per wait.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateWindow {
    pub min: f64,
    pub max: f64,
}

impl RateWindow {
    /// Derive a window from a base delay with ±50% jitter.
    pub fn from_base(delay: f64) -> Self {
        Self {
            min: delay * 0.5,
            max: delay * 1.5,
        }
    }

    /// Resolve the window from configuration.
    ///
    /// Explicit min/max overrides are all-or-nothing; otherwise the base
    /// delay is jittered.
    pub fn from_config(rate_limit: &RateLimitConfig) -> Result<Self> {
        match (rate_limit.min_delay, rate_limit.max_delay) {
            (Some(min), Some(max)) if min < 0.0 || max < 0.0 => Err(Error::ConfigValidation {
                field: "min_delay/max_delay".to_string(),
                message: "Delays cannot be negative".to_string(),
            }),
            (Some(min), Some(max)) if min <= max => Ok(Self { min, max }),
            (Some(min), Some(max)) => Err(Error::ConfigValidation {
                field: "min_delay/max_delay".to_string(),
                message: format!("min_delay ({}) exceeds max_delay ({})", min, max),
            }),
            (None, None) if rate_limit.delay < 0.0 => Err(Error::ConfigValidation {
                field: "delay".to_string(),
                message: "Delay cannot be negative".to_string(),
            }),
            (None, None) => Ok(Self::from_base(rate_limit.delay)),
            _ => Err(Error::ConfigValidation {
                field: "min_delay/max_delay".to_string(),
                message: "--min-delay and --max-delay must be used together".to_string(),
            }),
        }
    }
}

/// Blocking delay applied before network-triggering operations.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    window: RateWindow,
    enabled: bool,
}

impl RateLimiter {
    pub fn new(window: RateWindow, enabled: bool) -> Self {
        Self { window, enabled }
    }

    pub fn from_config(rate_limit: &RateLimitConfig) -> Result<Self> {
        Ok(Self::new(
            RateWindow::from_config(rate_limit)?,
            rate_limit.enabled,
        ))
    }

    /// A limiter that never waits.
    pub fn disabled() -> Self {
        Self::new(RateWindow { min: 0.0, max: 0.0 }, false)
    }

    pub fn window(&self) -> RateWindow {
        self.window
    }

    /// Sleep for one uniform draw from the window; no-op when disabled.
    pub async fn wait(&self) {
        if !self.enabled {
            return;
        }

        let secs = {
            let mut rng = rand::thread_rng();
            rng.gen_range(self.window.min..=self.window.max)
        };

        tracing::debug!("Rate limit delay: {:.2}s", secs);
        sleep(Duration::from_secs_f64(secs)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_from_base_is_plus_minus_half() {
        let window = RateWindow::from_base(2.0);
        assert_eq!(window, RateWindow { min: 1.0, max: 3.0 });

        let window = RateWindow::from_base(0.0);
        assert_eq!(window, RateWindow { min: 0.0, max: 0.0 });
    }

    #[test]
    fn test_explicit_overrides_win() {
        let mut rate_limit = RateLimitConfig::default();
        rate_limit.delay = 10.0;
        rate_limit.min_delay = Some(0.5);
        rate_limit.max_delay = Some(1.5);

        let window = RateWindow::from_config(&rate_limit).unwrap();
        assert_eq!(window, RateWindow { min: 0.5, max: 1.5 });
    }

    #[test]
    fn test_one_sided_override_is_an_error() {
        let mut rate_limit = RateLimitConfig::default();
        rate_limit.max_delay = Some(3.0);
        assert!(RateWindow::from_config(&rate_limit).is_err());
    }

    #[test]
    fn test_negative_delays_are_errors() {
        let mut rate_limit = RateLimitConfig::default();
        rate_limit.delay = -1.0;
        assert!(matches!(
            RateWindow::from_config(&rate_limit),
            Err(Error::ConfigValidation { .. })
        ));

        let mut rate_limit = RateLimitConfig::default();
        rate_limit.min_delay = Some(-1.0);
        rate_limit.max_delay = Some(2.0);
        assert!(RateWindow::from_config(&rate_limit).is_err());
    }

    #[tokio::test]
    async fn test_disabled_limiter_returns_immediately() {
        let limiter = RateLimiter::new(RateWindow { min: 60.0, max: 120.0 }, false);

        let start = std::time::Instant::now();
        limiter.wait().await;
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_enabled_limiter_sleeps_within_window() {
        let limiter = RateLimiter::new(
            RateWindow {
                min: 0.01,
                max: 0.05,
            },
            true,
        );

        let start = std::time::Instant::now();
        limiter.wait().await;
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(10));
        assert!(elapsed < Duration::from_secs(1));
    }
}
