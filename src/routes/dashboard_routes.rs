use axum::{extract::State, routing::get, Json, Router};

use crate::dto::ApiResponse;
use crate::models::SessionContext;
use crate::services::dashboard_service::{AdminDashboard, CompanyDashboard, VendorDashboard};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_dashboard_router() -> Router<AppState> {
    Router::new()
        .route("/company", get(company))
        .route("/vendor", get(vendor))
        .route("/admin", get(admin))
}

async fn company(
    State(state): State<AppState>,
    session: SessionContext,
) -> Result<Json<ApiResponse<CompanyDashboard>>, AppError> {
    Ok(Json(ApiResponse::success(state.dashboard.company(&session).await?)))
}

async fn vendor(
    State(state): State<AppState>,
    session: SessionContext,
) -> Result<Json<ApiResponse<VendorDashboard>>, AppError> {
    Ok(Json(ApiResponse::success(state.dashboard.vendor(&session).await?)))
}

async fn admin(
    State(state): State<AppState>,
    session: SessionContext,
) -> Result<Json<ApiResponse<AdminDashboard>>, AppError> {
    Ok(Json(ApiResponse::success(state.dashboard.admin(&session).await?)))
}
