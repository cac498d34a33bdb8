//! Configuration structures for the batch runner
//!
//! Both configs validate eagerly: an invalid value fails construction with a
//! descriptive [`ApiError::Config`] instead of surfacing mid-batch. Defaults
//! mirror the service's documented client guidance (3 retries, doubling
//! backoff from 1s, 10 workers, 10s timeout).

use std::num::NonZeroUsize;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{ApiError, Result};

/// Default maximum retry attempts per request
pub const DEFAULT_MAX_RETRIES: u32 = 3;
/// Default exponential backoff multiplier
pub const DEFAULT_BACKOFF_FACTOR: f64 = 2.0;
/// Default delay before the first retry
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_secs(1);
/// Default number of concurrent workers when none is configured.
///
/// This is a fixed, documented constant - it is never derived from the
/// machine's core count, so batch behaviour does not vary by platform.
pub const DEFAULT_MAX_WORKERS: usize = 10;
/// Default per-call timeout when a request carries none
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Retry/backoff behaviour for a single request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum attempts per request, including the first (must be > 0)
    pub max_retries: u32,
    /// Exponential backoff multiplier (must be > 0)
    pub backoff_factor: f64,
    /// Delay before the first retry (must be > 0)
    pub initial_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_factor: DEFAULT_BACKOFF_FACTOR,
            initial_delay: DEFAULT_INITIAL_DELAY,
        }
    }
}

impl RetryConfig {
    /// Create a validated retry configuration
    ///
    /// # Errors
    /// Returns `ApiError::Config` when `max_retries` is zero, the backoff
    /// factor is not a positive finite number, or the initial delay is zero.
    pub fn new(max_retries: u32, backoff_factor: f64, initial_delay: Duration) -> Result<Self> {
        let config = Self { max_retries, backoff_factor, initial_delay };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_retries == 0 {
            return Err(ApiError::Config("max_retries must be greater than 0".to_string()));
        }
        if !(self.backoff_factor.is_finite() && self.backoff_factor > 0.0) {
            return Err(ApiError::Config(format!(
                "backoff_factor must be a positive finite number, got {}",
                self.backoff_factor
            )));
        }
        if self.initial_delay.is_zero() {
            return Err(ApiError::Config("initial_delay must be greater than 0".to_string()));
        }
        Ok(())
    }
}

/// Worker-pool sizing and timeout defaults for one batch run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Upper bound on concurrent workers; `None` uses
    /// [`DEFAULT_MAX_WORKERS`]
    pub max_workers: Option<NonZeroUsize>,
    /// Timeout applied to requests that carry none of their own (must be > 0)
    pub default_timeout: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { max_workers: None, default_timeout: DEFAULT_TIMEOUT }
    }
}

impl BatchConfig {
    /// Create a validated batch configuration
    ///
    /// # Errors
    /// Returns `ApiError::Config` when `max_workers` is zero or the default
    /// timeout is zero.
    pub fn new(max_workers: Option<usize>, default_timeout: Duration) -> Result<Self> {
        let max_workers = match max_workers {
            Some(n) => Some(
                NonZeroUsize::new(n)
                    .ok_or_else(|| ApiError::Config("max_workers must be greater than 0".to_string()))?,
            ),
            None => None,
        };
        let config = Self { max_workers, default_timeout };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.default_timeout.is_zero() {
            return Err(ApiError::Config("default_timeout must be greater than 0".to_string()));
        }
        Ok(())
    }

    /// Effective worker-pool size for this configuration
    pub fn worker_count(&self) -> usize {
        self.max_workers.map_or(DEFAULT_MAX_WORKERS, NonZeroUsize::get)
    }
}
