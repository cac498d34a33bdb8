//! Classify attempt results into retryable and fatal outcomes
//!
//! HTTP 429 and 5xx are transient (the backend sheds load or hiccups);
//! other non-2xx statuses mean the request itself is wrong and repeating it
//! cannot help. Transport failures never produced a status and are always
//! worth another attempt, except malformed requests.

use cohora_domain::{ApiError, HttpResponse};

use super::ports::TransportError;

/// Result of one attempt, tagged with how the retry policy should treat it
#[derive(Debug)]
pub enum AttemptOutcome {
    /// 2xx response; terminal
    Success(HttpResponse),
    /// Transient failure; the policy may schedule another attempt
    Retryable(ApiError),
    /// Non-transient failure; terminal regardless of remaining attempts
    Fatal(ApiError),
}

impl AttemptOutcome {
    /// True when the policy is allowed to schedule another attempt
    pub fn is_retryable(&self) -> bool {
        matches!(self, AttemptOutcome::Retryable(_))
    }
}

/// Classify a completed HTTP exchange by status code
pub fn classify_response(response: HttpResponse) -> AttemptOutcome {
    match response.status {
        200..=299 => AttemptOutcome::Success(response),
        429 => AttemptOutcome::Retryable(ApiError::RateLimited(status_message(&response))),
        500..=599 => AttemptOutcome::Retryable(ApiError::Server(status_message(&response))),
        _ => AttemptOutcome::Fatal(ApiError::Client(status_message(&response))),
    }
}

/// Classify a failure that never produced a status code
pub fn classify_transport_error(error: TransportError) -> AttemptOutcome {
    match error {
        TransportError::Malformed(message) => {
            AttemptOutcome::Fatal(ApiError::Client(format!("malformed request: {message}")))
        }
        TransportError::Connection(message) => {
            AttemptOutcome::Retryable(ApiError::Transport(message))
        }
        TransportError::Timeout(elapsed) => AttemptOutcome::Retryable(ApiError::Timeout(elapsed)),
    }
}

fn status_message(response: &HttpResponse) -> String {
    if response.body.is_empty() {
        format!("HTTP {}", response.status)
    } else {
        format!("HTTP {}: {}", response.status, response.body)
    }
}
