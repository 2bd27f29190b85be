//! HTTP surface of the gateway
//!
//! One router per resource, nested under `/api`, plus the health check.

pub mod auth_routes;
pub mod dashboard_routes;
pub mod lease_request_routes;
pub mod quotation_routes;
pub mod user_routes;
pub mod vehicle_routes;

use std::time::Duration;

use axum::{extract::State, middleware, routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::{compression::CompressionLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::middleware::{authorization_interceptor, cors_layer};
use crate::state::AppState;

/// Upper bound on a whole request, backend round trip included
const REQUEST_TIMEOUT_SLACK_SECS: u64 = 5;

pub fn create_router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.backend_timeout_secs + REQUEST_TIMEOUT_SLACK_SECS);

    let api = Router::new()
        .nest("/auth", auth_routes::create_auth_router())
        .nest("/users", user_routes::create_user_router())
        .nest("/lease-requests", lease_request_routes::create_lease_request_router())
        .nest("/quotations", quotation_routes::create_quotation_router())
        .nest("/vehicles", vehicle_routes::create_vehicle_router())
        .nest("/dashboard", dashboard_routes::create_dashboard_router())
        .layer(middleware::from_fn_with_state(state.clone(), authorization_interceptor));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(TimeoutLayer::new(timeout))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "mode": if state.is_local() { "local" } else { "backend" },
        "activeSessions": state.auth.sessions().len().await,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
