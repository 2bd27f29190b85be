//! Shared utilities
//!
//! Error handling, validation, JWT and pagination helpers.

pub mod errors;
pub mod jwt;
pub mod pagination;
pub mod validation;
