use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::dto::vehicle_dto::VehicleLookupQuery;
use crate::dto::ApiResponse;
use crate::models::{EntityId, SavedVehicle, SessionContext, VehicleDetails};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/", post(save_vehicle))
        .route("/lookup", get(lookup))
        .route("/vendor/:vendor_id", get(list_saved))
}

async fn lookup(
    State(state): State<AppState>,
    session: SessionContext,
    Query(query): Query<VehicleLookupQuery>,
) -> Result<Json<ApiResponse<VehicleDetails>>, AppError> {
    let details = state.vehicles.lookup(&session, &query).await?;
    Ok(Json(ApiResponse::success(details)))
}

async fn save_vehicle(
    State(state): State<AppState>,
    session: SessionContext,
    Json(details): Json<VehicleDetails>,
) -> Result<(StatusCode, Json<ApiResponse<SavedVehicle>>), AppError> {
    let saved = state.vehicles.save_vehicle(&session, details).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(saved, "Vehicle saved successfully")),
    ))
}

async fn list_saved(
    State(state): State<AppState>,
    session: SessionContext,
    Path(vendor_id): Path<EntityId>,
) -> Result<Json<ApiResponse<Vec<SavedVehicle>>>, AppError> {
    let vehicles = state.vehicles.list_saved(&session, vendor_id).await?;
    Ok(Json(ApiResponse::success(vehicles)))
}
