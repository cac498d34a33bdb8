//! HTTP transport adapter and log hygiene helpers

pub mod redact;
pub mod transport;
