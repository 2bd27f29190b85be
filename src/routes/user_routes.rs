use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::dto::user_dto::{AddUserRequest, UpdateUserRequest};
use crate::dto::ApiResponse;
use crate::models::{EntityId, SessionContext, UserProfile};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_user_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(add_user))
        .route("/:id", get(get_user).put(update_user))
}

async fn list_users(
    State(state): State<AppState>,
    session: SessionContext,
) -> Result<Json<ApiResponse<Vec<UserProfile>>>, AppError> {
    let users = state.accounts.list_users(&session).await?;
    Ok(Json(ApiResponse::success(users)))
}

async fn add_user(
    State(state): State<AppState>,
    session: SessionContext,
    Json(request): Json<AddUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserProfile>>), AppError> {
    let user = state.accounts.add_user(&session, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(user, "User added successfully")),
    ))
}

async fn get_user(
    State(state): State<AppState>,
    session: SessionContext,
    Path(id): Path<EntityId>,
) -> Result<Json<ApiResponse<UserProfile>>, AppError> {
    let user = state.accounts.get_user(&session, id).await?;
    Ok(Json(ApiResponse::success(user)))
}

async fn update_user(
    State(state): State<AppState>,
    session: SessionContext,
    Path(id): Path<EntityId>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserProfile>>, AppError> {
    let user = state.accounts.update_user(&session, id, request).await?;
    Ok(Json(ApiResponse::success_with_message(user, "Profile updated successfully")))
}
