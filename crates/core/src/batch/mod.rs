//! Concurrent batch execution against the audience API
//!
//! Control flow: the caller hands a sequence of [`BatchRequest`] descriptors
//! to the [`runner::BatchRunner`], which schedules them onto a bounded worker
//! pool. Each worker drives one descriptor through the
//! [`executor::RequestExecutor`] (which consults the [`retry::RetryPolicy`]),
//! reports the terminal outcome to the [`progress::ProgressTracker`], and the
//! runner collects every descriptor into exactly one of the two result
//! collections.
//!
//! [`BatchRequest`]: cohora_domain::BatchRequest

pub mod classify;
pub mod executor;
pub mod ports;
pub mod progress;
pub mod retry;
pub mod runner;
