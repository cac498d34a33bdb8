//! # Cohora Core
//!
//! The batch request runner - pure orchestration logic, no HTTP code.
//!
//! This crate contains:
//! - The `Transport` port the runner consumes
//! - Attempt classification and the retry policy
//! - The single-request executor with backoff
//! - The thread-safe progress aggregator
//! - The bounded-concurrency batch runner
//!
//! ## Architecture Principles
//! - Only depends on `cohora-domain`
//! - All network access goes through the [`Transport`] trait
//! - Failures are data: the runner returns them, it never raises for them

pub mod batch;

// Re-export the batch machinery at the crate root
pub use batch::classify::{classify_response, classify_transport_error, AttemptOutcome};
pub use batch::executor::RequestExecutor;
pub use batch::ports::{Transport, TransportError};
pub use batch::progress::{ProgressCallback, ProgressTracker};
pub use batch::retry::{RetryDecision, RetryPolicy};
pub use batch::runner::{run_batch, BatchOutcome, BatchRunner};
