//! Value types exchanged with the batch runner
//!
//! A [`BatchRequest`] describes one outbound HTTP call and is immutable once
//! built; the runner hands it back unchanged next to its outcome so callers
//! can correlate results. Bodies are opaque strings - schema concerns belong
//! to the domain-model layer, not here.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// HTTP methods supported by the audience API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
    Put,
}

impl Method {
    /// Uppercase wire representation of the method
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Put => "PUT",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable description of one outbound HTTP call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRequest {
    /// HTTP method for the call
    pub method: Method,
    /// Absolute URL including any query parameters
    pub url: String,
    /// Extra headers merged over the transport's defaults
    pub headers: Vec<(String, String)>,
    /// Opaque request body, typically JSON produced by a domain model
    pub body: Option<String>,
    /// Per-call timeout; falls back to the batch default when `None`
    pub timeout: Option<Duration>,
}

impl BatchRequest {
    /// Create a request with the given method and URL
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self { method, url: url.into(), headers: Vec::new(), body: None, timeout: None }
    }

    /// Shorthand for a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    /// Shorthand for a POST request with a body
    pub fn post(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(Method::Post, url).with_body(body)
    }

    /// Shorthand for a PATCH request with a body
    pub fn patch(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(Method::Patch, url).with_body(body)
    }

    /// Shorthand for a DELETE request
    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::Delete, url)
    }

    /// Attach a body to the request
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Add a header to the request
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Override the per-call timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Status and opaque body of a completed HTTP call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw response body
    pub body: String,
}

impl HttpResponse {
    /// True for 2xx status codes
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Point-in-time snapshot of batch progress
///
/// Handed to progress callbacks after every terminal outcome. `completed`
/// is monotonically non-decreasing for the lifetime of one batch run and
/// never exceeds `total`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Progress {
    /// Number of descriptors submitted to the batch
    pub total: usize,
    /// Number of descriptors that reached a terminal outcome
    pub completed: usize,
    /// Number of terminal outcomes that were failures
    pub errors: usize,
    /// Elapsed time since the batch started
    pub elapsed: Duration,
    /// Projected seconds per 1,000 requests; `None` until the first
    /// completion so the division is never attempted at zero
    pub average_per_thousand_seconds: Option<f64>,
}
