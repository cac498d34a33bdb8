//! # Cohora Domain
//!
//! Value types and error taxonomy for the Cohora audience API client.
//!
//! This crate contains:
//! - Request/response value types exchanged with the batch runner
//! - The error taxonomy shared across the workspace
//! - Configuration structures with eager validation
//!
//! ## Architecture
//! - No dependencies on other Cohora crates
//! - Only external dependencies allowed
//! - Pure data structures, no I/O

pub mod config;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::{BatchConfig, RetryConfig};
pub use errors::{ApiError, ErrorCategory, Result};
pub use types::{BatchRequest, HttpResponse, Method, Progress};
