//! Error taxonomy for the audience API client
//!
//! Classifies every failure the batch runner can surface. Retryability is a
//! property of the category, not of individual call sites, so the retry
//! policy and the tests agree on one source of truth.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Categories of API errors for retry decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCategory {
    /// Rate limiting (HTTP 429) - retryable with backoff
    RateLimit,
    /// Server errors (HTTP 5xx) - retryable
    Server,
    /// Transport/connection errors (timeout, refused, DNS) - retryable
    Transport,
    /// Client errors (4xx other than 429, malformed requests) - non-retryable
    Client,
    /// Configuration errors - raised at construction, never mid-batch
    Config,
    /// A retryable failure that ran out of attempts - terminal
    Exhausted,
}

/// Errors surfaced by the batch runner and its collaborators
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Client error: {0}")]
    Client(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Retries exhausted after {attempts} attempts: {source}")]
    Exhausted {
        attempts: u32,
        #[source]
        source: Box<ApiError>,
    },
}

impl ApiError {
    /// Get the error category for this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::RateLimited(_) => ErrorCategory::RateLimit,
            Self::Server(_) => ErrorCategory::Server,
            Self::Transport(_) | Self::Timeout(_) => ErrorCategory::Transport,
            Self::Client(_) => ErrorCategory::Client,
            Self::Config(_) => ErrorCategory::Config,
            Self::Exhausted { .. } => ErrorCategory::Exhausted,
        }
    }

    /// Check whether another attempt could succeed for this error
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::RateLimit | ErrorCategory::Server | ErrorCategory::Transport
        )
    }
}

/// Result type alias for Cohora operations
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert_eq!(ApiError::RateLimited("test".to_string()).category(), ErrorCategory::RateLimit);
        assert_eq!(ApiError::Server("test".to_string()).category(), ErrorCategory::Server);
        assert_eq!(ApiError::Transport("test".to_string()).category(), ErrorCategory::Transport);
        assert_eq!(
            ApiError::Timeout(Duration::from_secs(10)).category(),
            ErrorCategory::Transport
        );
        assert_eq!(ApiError::Client("test".to_string()).category(), ErrorCategory::Client);
        assert_eq!(ApiError::Config("test".to_string()).category(), ErrorCategory::Config);
    }

    #[test]
    fn test_retryability_follows_category() {
        assert!(ApiError::RateLimited("test".to_string()).is_retryable());
        assert!(ApiError::Server("test".to_string()).is_retryable());
        assert!(ApiError::Transport("test".to_string()).is_retryable());
        assert!(ApiError::Timeout(Duration::from_secs(1)).is_retryable());
        assert!(!ApiError::Client("test".to_string()).is_retryable());
        assert!(!ApiError::Config("test".to_string()).is_retryable());
    }

    #[test]
    fn test_exhausted_carries_last_reason() {
        let err = ApiError::Exhausted {
            attempts: 3,
            source: Box::new(ApiError::RateLimited("429 from /cohorts".to_string())),
        };
        assert_eq!(err.category(), ErrorCategory::Exhausted);
        assert!(!err.is_retryable());
        let message = err.to_string();
        assert!(message.contains("3 attempts"));
        assert!(message.contains("429 from /cohorts"));
    }
}
