//! Middleware
//!
//! Session extraction, the 401/403 interceptor and CORS.

pub mod auth;
pub mod cors;

pub use auth::authorization_interceptor;
pub use cors::cors_layer;
