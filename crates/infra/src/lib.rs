//! # Cohora Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - The reqwest-backed [`http::HttpTransport`] adapter
//! - Credential redaction for anything that reaches logs or errors
//! - Environment-based configuration loading
//!
//! ## Architecture
//! - Implements the `Transport` trait defined in `cohora-core`
//! - Contains all "impure" code (network I/O, process environment)

pub mod config;
pub mod http;

pub use config::loader::{load_from_env, load_with, RuntimeConfig};
pub use http::redact::{redact_message, redact_url};
pub use http::transport::{HttpTransport, HttpTransportBuilder};
