//! Environment-based configuration loading

pub mod loader;
