//! Retry policy: pure backoff decisions, no sleeping
//!
//! The policy only computes decisions; the executor owns the actual
//! suspension. That keeps the delay schedule testable without real time
//! passing.

use std::time::Duration;

use cohora_domain::RetryConfig;

use super::classify::AttemptOutcome;

/// Decision returned by the retry policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Retry the request after the given backoff delay
    RetryAfter(Duration),
    /// Do not retry; the current outcome is terminal
    Stop,
}

/// Exponential backoff policy driven by a validated [`RetryConfig`]
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    /// Create a policy from an already-validated configuration
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Decide whether to retry after the given attempt.
    ///
    /// `attempt` is 1-based (1 = first attempt). Success and fatal outcomes
    /// stop immediately regardless of the attempt count; retryable outcomes
    /// stop once `attempt >= max_retries`, otherwise the delay is
    /// `initial_delay * backoff_factor^(attempt - 1)`.
    pub fn decide(&self, attempt: u32, outcome: &AttemptOutcome) -> RetryDecision {
        match outcome {
            AttemptOutcome::Success(_) | AttemptOutcome::Fatal(_) => RetryDecision::Stop,
            AttemptOutcome::Retryable(_) => {
                if attempt >= self.config.max_retries {
                    RetryDecision::Stop
                } else {
                    RetryDecision::RetryAfter(self.backoff_delay(attempt))
                }
            }
        }
    }

    /// Backoff delay before the attempt following `attempt` (1-based)
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let secs = self.config.initial_delay.as_secs_f64() * self.config.backoff_factor.powi(exponent);
        // powi can overflow to infinity for extreme configs; saturate rather
        // than panic in from_secs_f64
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    }

    /// Maximum number of attempts this policy allows
    pub fn max_retries(&self) -> u32 {
        self.config.max_retries
    }
}
