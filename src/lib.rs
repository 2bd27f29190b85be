//! Lease portal gateway
//!
//! Backend-for-frontend for the vehicle leasing marketplace: companies raise
//! lease requests, vendors quote against them, and both sides look vehicles
//! up in the registry.

pub mod client;
pub mod config;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
pub mod utils;

pub use config::EnvironmentConfig;
pub use routes::create_router;
pub use state::AppState;
pub use utils::errors::{AppError, AppResult};
