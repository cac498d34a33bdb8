//! reqwest-backed implementation of the core `Transport` port
//!
//! One [`HttpTransport`] wraps one connection pool and is shared across all
//! batch workers. It performs exactly one HTTP exchange per call - retry
//! scheduling lives in the core executor, never here.

use std::time::Duration;

use async_trait::async_trait;
use cohora_core::{Transport, TransportError};
use cohora_domain::{ApiError, BatchRequest, HttpResponse, Method};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Client as ReqwestClient;
use tracing::debug;

use super::redact::{redact_message, redact_url};

/// HTTP transport over a shared reqwest connection pool
#[derive(Clone)]
pub struct HttpTransport {
    client: ReqwestClient,
}

impl HttpTransport {
    /// Start building a new transport
    pub fn builder() -> HttpTransportBuilder {
        HttpTransportBuilder::default()
    }

    /// Convenience constructor with default configuration
    pub fn new() -> Result<Self, ApiError> {
        Self::builder().build()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        request: &BatchRequest,
        timeout: Duration,
    ) -> Result<HttpResponse, TransportError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
            Method::Put => reqwest::Method::PUT,
        };

        let mut builder = self.client.request(method, &request.url).timeout(timeout);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        debug!(method = %request.method, url = %redact_url(&request.url), "dispatching request");

        let response = builder.send().await.map_err(|err| map_error(err, timeout))?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|err| map_error(err, timeout))?;

        debug!(method = %request.method, url = %redact_url(&request.url), status, "received response");
        Ok(HttpResponse { status, body })
    }
}

/// Map a reqwest failure onto the transport error taxonomy.
///
/// Error text is redacted because reqwest embeds the full URL, query
/// string included, in its messages.
fn map_error(err: reqwest::Error, timeout: Duration) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(timeout)
    } else if err.is_builder() {
        TransportError::Malformed(redact_message(&err.to_string()))
    } else {
        TransportError::Connection(redact_message(&err.to_string()))
    }
}

/// Builder for [`HttpTransport`]
#[derive(Debug)]
pub struct HttpTransportBuilder {
    user_agent: Option<String>,
    default_headers: HeaderMap,
}

impl Default for HttpTransportBuilder {
    fn default() -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Self { user_agent: None, default_headers }
    }
}

impl HttpTransportBuilder {
    /// Set the User-Agent header sent with every request
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Add a default header sent with every request.
    ///
    /// Per-request headers with the same name take precedence.
    ///
    /// # Errors
    /// Returns `ApiError::Config` when the name or value is not a valid
    /// HTTP header.
    pub fn default_header(mut self, name: &str, value: &str) -> Result<Self, ApiError> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ApiError::Config(format!("invalid header name {name:?}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| ApiError::Config(format!("invalid header value: {e}")))?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// Build the transport.
    ///
    /// # Errors
    /// Returns `ApiError::Config` when the underlying client cannot be
    /// constructed (for example, when no TLS backend is available).
    pub fn build(self) -> Result<HttpTransport, ApiError> {
        let mut builder = ReqwestClient::builder().default_headers(self.default_headers);
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(HttpTransport { client })
    }
}
