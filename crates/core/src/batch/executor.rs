//! Single-request executor: one descriptor, driven to a terminal outcome
//!
//! Owns the retry loop. A retryable failure never escapes before the policy
//! says stop; what comes out is either a response, the fatal error itself,
//! or an exhaustion error carrying the last observed reason.

use std::sync::Arc;
use std::time::Duration;

use cohora_domain::{ApiError, BatchRequest, HttpResponse, Result, RetryConfig};
use tracing::{debug, warn};

use super::classify::{classify_response, classify_transport_error, AttemptOutcome};
use super::ports::Transport;
use super::retry::{RetryDecision, RetryPolicy};

/// Executes one request at a time, applying the retry policy between attempts
pub struct RequestExecutor {
    transport: Arc<dyn Transport>,
    policy: RetryPolicy,
    default_timeout: Duration,
}

impl RequestExecutor {
    /// Create an executor over the given transport
    pub fn new(
        transport: Arc<dyn Transport>,
        retry_config: RetryConfig,
        default_timeout: Duration,
    ) -> Self {
        Self { transport, policy: RetryPolicy::new(retry_config), default_timeout }
    }

    /// Drive `request` to a terminal outcome within `1..=max_retries`
    /// attempts.
    ///
    /// HTTP 429 is retried with plain exponential backoff; a `Retry-After`
    /// header, if present, is not consulted. No shared state is touched
    /// here - suspension between attempts blocks only the calling worker.
    pub async fn execute(&self, request: &BatchRequest) -> Result<HttpResponse> {
        let timeout = request.timeout.unwrap_or(self.default_timeout);
        let mut attempt: u32 = 1;

        loop {
            debug!(
                method = %request.method,
                attempt,
                max_retries = self.policy.max_retries(),
                "sending request"
            );

            let outcome = match self.transport.send(request, timeout).await {
                Ok(response) => classify_response(response),
                Err(error) => classify_transport_error(error),
            };

            match self.policy.decide(attempt, &outcome) {
                RetryDecision::RetryAfter(delay) => {
                    warn!(method = %request.method, attempt, ?delay, "attempt failed, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                RetryDecision::Stop => {
                    return match outcome {
                        AttemptOutcome::Success(response) => Ok(response),
                        AttemptOutcome::Fatal(error) => Err(error),
                        AttemptOutcome::Retryable(error) => {
                            Err(ApiError::Exhausted { attempts: attempt, source: Box::new(error) })
                        }
                    };
                }
            }
        }
    }
}
