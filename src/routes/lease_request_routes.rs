use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};

use crate::dto::lease_request_dto::{LeaseRequestConfirmation, LeaseRequestForm, StatusUpdateRequest};
use crate::dto::ApiResponse;
use crate::models::{EntityId, LeaseRequest, SessionContext, StatusCounts};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_lease_request_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_lease_request).get(list_all))
        .route("/:id", put(update_lease_request))
        .route("/:id/status", put(respond))
        .route("/company/:company_id", get(list_by_company))
        .route("/company/:company_id/stats", get(stats_for_company))
        .route("/pending/vendor/:vendor_id", get(list_pending_for_vendor))
}

async fn create_lease_request(
    State(state): State<AppState>,
    session: SessionContext,
    Json(form): Json<LeaseRequestForm>,
) -> Result<(StatusCode, Json<LeaseRequestConfirmation>), AppError> {
    let confirmation = state.lease_requests.create(&session, form).await?;
    Ok((StatusCode::CREATED, Json(confirmation)))
}

async fn list_all(
    State(state): State<AppState>,
    session: SessionContext,
) -> Result<Json<ApiResponse<Vec<LeaseRequest>>>, AppError> {
    let requests = state.lease_requests.list_all(&session).await?;
    Ok(Json(ApiResponse::success(requests)))
}

async fn update_lease_request(
    State(state): State<AppState>,
    session: SessionContext,
    Path(id): Path<EntityId>,
    Json(form): Json<LeaseRequestForm>,
) -> Result<Json<ApiResponse<LeaseRequest>>, AppError> {
    let request = state.lease_requests.update(&session, id, form).await?;
    Ok(Json(ApiResponse::success_with_message(request, "Lease request updated successfully")))
}

async fn respond(
    State(state): State<AppState>,
    session: SessionContext,
    Path(id): Path<EntityId>,
    Json(update): Json<StatusUpdateRequest>,
) -> Result<Json<ApiResponse<LeaseRequest>>, AppError> {
    let request = state.lease_requests.respond(&session, id, update).await?;
    Ok(Json(ApiResponse::success(request)))
}

async fn list_by_company(
    State(state): State<AppState>,
    session: SessionContext,
    Path(company_id): Path<EntityId>,
) -> Result<Json<ApiResponse<Vec<LeaseRequest>>>, AppError> {
    let requests = state.lease_requests.list_by_company(&session, company_id).await?;
    Ok(Json(ApiResponse::success(requests)))
}

async fn stats_for_company(
    State(state): State<AppState>,
    session: SessionContext,
    Path(company_id): Path<EntityId>,
) -> Result<Json<ApiResponse<StatusCounts>>, AppError> {
    let stats = state.lease_requests.stats_for_company(&session, company_id).await?;
    Ok(Json(ApiResponse::success(stats)))
}

async fn list_pending_for_vendor(
    State(state): State<AppState>,
    session: SessionContext,
    Path(vendor_id): Path<EntityId>,
) -> Result<Json<ApiResponse<Vec<LeaseRequest>>>, AppError> {
    let requests = state.lease_requests.list_pending_for_vendor(&session, vendor_id).await?;
    Ok(Json(ApiResponse::success(requests)))
}
