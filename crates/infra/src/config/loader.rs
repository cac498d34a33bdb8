//! Configuration loader
//!
//! Loads runtime configuration from environment variables. Every variable
//! is optional; an absent variable falls back to the library default, while
//! a present-but-invalid value fails loading with a descriptive error
//! rather than being silently ignored.
//!
//! ## Environment Variables
//! - `COHORA_MAX_RETRIES`: Maximum attempts per request (integer > 0)
//! - `COHORA_BACKOFF_FACTOR`: Exponential backoff multiplier (float > 0)
//! - `COHORA_INITIAL_DELAY_SECS`: Delay before the first retry (float > 0)
//! - `COHORA_MAX_WORKERS`: Concurrent worker bound (integer > 0)
//! - `COHORA_DEFAULT_TIMEOUT_SECS`: Per-call timeout default (float > 0)

use std::str::FromStr;
use std::time::Duration;

use cohora_domain::{ApiError, BatchConfig, Result, RetryConfig};
use tracing::debug;

/// Retry and batch configuration resolved from the process environment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuntimeConfig {
    pub retry: RetryConfig,
    pub batch: BatchConfig,
}

/// Load configuration from the process environment.
///
/// # Errors
/// Returns `ApiError::Config` when a variable is present but does not
/// parse, or when the parsed values fail validation.
pub fn load_from_env() -> Result<RuntimeConfig> {
    load_with(|name| std::env::var(name).ok())
}

/// Load configuration through an injectable variable lookup.
///
/// `lookup` returns the raw value for a variable name, or `None` when it
/// is unset. Production code passes the process environment; tests pass a
/// map.
pub fn load_with<F>(lookup: F) -> Result<RuntimeConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = RetryConfig::default();
    let max_retries =
        parse_var(&lookup, "COHORA_MAX_RETRIES")?.unwrap_or(defaults.max_retries);
    let backoff_factor =
        parse_var(&lookup, "COHORA_BACKOFF_FACTOR")?.unwrap_or(defaults.backoff_factor);
    let initial_delay = parse_var::<f64, _>(&lookup, "COHORA_INITIAL_DELAY_SECS")?
        .map(secs_to_duration("COHORA_INITIAL_DELAY_SECS"))
        .transpose()?
        .unwrap_or(defaults.initial_delay);
    let retry = RetryConfig::new(max_retries, backoff_factor, initial_delay)?;

    let max_workers = parse_var::<usize, _>(&lookup, "COHORA_MAX_WORKERS")?;
    let default_timeout = parse_var::<f64, _>(&lookup, "COHORA_DEFAULT_TIMEOUT_SECS")?
        .map(secs_to_duration("COHORA_DEFAULT_TIMEOUT_SECS"))
        .transpose()?
        .unwrap_or(BatchConfig::default().default_timeout);
    let batch = BatchConfig::new(max_workers, default_timeout)?;

    debug!(?retry, ?batch, "configuration resolved from environment");
    Ok(RuntimeConfig { retry, batch })
}

fn parse_var<T, F>(lookup: &F, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ApiError::Config(format!("invalid {name} {raw:?}: {e}"))),
    }
}

fn secs_to_duration(name: &'static str) -> impl Fn(f64) -> Result<Duration> {
    move |secs| {
        Duration::try_from_secs_f64(secs)
            .map_err(|e| ApiError::Config(format!("invalid {name}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use cohora_domain::config::{DEFAULT_MAX_RETRIES, DEFAULT_MAX_WORKERS, DEFAULT_TIMEOUT};

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_empty_environment_yields_defaults() {
        let config = load_with(env(&[])).expect("defaults are valid");
        assert_eq!(config.retry, RetryConfig::default());
        assert_eq!(config.retry.max_retries, DEFAULT_MAX_RETRIES);
        assert_eq!(config.batch.worker_count(), DEFAULT_MAX_WORKERS);
        assert_eq!(config.batch.default_timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = load_with(env(&[
            ("COHORA_MAX_RETRIES", "5"),
            ("COHORA_BACKOFF_FACTOR", "1.5"),
            ("COHORA_INITIAL_DELAY_SECS", "0.25"),
            ("COHORA_MAX_WORKERS", "4"),
            ("COHORA_DEFAULT_TIMEOUT_SECS", "30"),
        ]))
        .expect("valid overrides");

        assert_eq!(config.retry.max_retries, 5);
        assert_eq!(config.retry.backoff_factor, 1.5);
        assert_eq!(config.retry.initial_delay, Duration::from_millis(250));
        assert_eq!(config.batch.worker_count(), 4);
        assert_eq!(config.batch.default_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_unparseable_value_is_an_error_not_a_default() {
        let result = load_with(env(&[("COHORA_MAX_RETRIES", "many")]));
        match result {
            Err(ApiError::Config(message)) => {
                assert!(message.contains("COHORA_MAX_RETRIES"));
                assert!(message.contains("many"));
            }
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn test_parsed_values_still_go_through_validation() {
        assert!(load_with(env(&[("COHORA_MAX_RETRIES", "0")])).is_err());
        assert!(load_with(env(&[("COHORA_BACKOFF_FACTOR", "-2.0")])).is_err());
        assert!(load_with(env(&[("COHORA_MAX_WORKERS", "0")])).is_err());
        assert!(load_with(env(&[("COHORA_DEFAULT_TIMEOUT_SECS", "0")])).is_err());
    }

    #[test]
    fn test_negative_delay_is_rejected() {
        let result = load_with(env(&[("COHORA_INITIAL_DELAY_SECS", "-1")]));
        assert!(matches!(result, Err(ApiError::Config(_))));
    }

    #[test]
    fn test_whitespace_is_tolerated() {
        let config = load_with(env(&[("COHORA_MAX_WORKERS", " 8 ")])).expect("trimmed value");
        assert_eq!(config.batch.worker_count(), 8);
    }
}
