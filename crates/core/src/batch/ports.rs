//! Port interface for the HTTP transport
//!
//! The runner and executor depend only on this trait, never on a concrete
//! HTTP stack. `cohora-infra` provides the reqwest-backed adapter; tests use
//! in-memory stubs.

use std::time::Duration;

use async_trait::async_trait;
use cohora_domain::{BatchRequest, HttpResponse};
use thiserror::Error;

/// Failure below the HTTP layer: the request never produced a status code.
///
/// Non-2xx statuses are *not* transport errors - the transport returns them
/// as ordinary [`HttpResponse`] values and classification happens in
/// [`classify`](super::classify).
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request could not be constructed (invalid URL, bad header)
    #[error("malformed request: {0}")]
    Malformed(String),

    /// Connection-level failure (refused, reset, DNS)
    #[error("connection failure: {0}")]
    Connection(String),

    /// No response within the per-call deadline
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// Capability to perform one HTTP call
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform the call described by `request`, bounded by `timeout`.
    ///
    /// Returns the response for any status code the server produced, or a
    /// [`TransportError`] when no status code was obtained.
    async fn send(
        &self,
        request: &BatchRequest,
        timeout: Duration,
    ) -> Result<HttpResponse, TransportError>;
}
