//! Configuration
//!
//! Environment settings and the backend endpoint table.

pub mod api_endpoints;
pub mod environment;

pub use environment::{ConfigError, EnvironmentConfig};
