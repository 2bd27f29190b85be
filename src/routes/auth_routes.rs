use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::dto::auth_dto::{LoginRequest, LoginResponse, ResendOtpRequest, SignupRequest, VerifyOtpRequest};
use crate::dto::ApiResponse;
use crate::models::{SessionContext, UserProfile};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
        .route("/signup", post(signup))
        .route("/verify-otp", post(verify_otp))
        .route("/resend-otp", post(resend_otp))
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    Ok(Json(state.auth.login(request).await?))
}

async fn logout(State(state): State<AppState>, session: SessionContext) -> Json<ApiResponse<()>> {
    state.auth.logout(&session.token).await;
    Json(ApiResponse::message("Logged out successfully"))
}

async fn me(State(state): State<AppState>, session: SessionContext) -> Json<ApiResponse<UserProfile>> {
    Json(ApiResponse::success(state.auth.me(&session)))
}

async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let message = state.otp.start(request).await?;
    Ok(Json(ApiResponse::message(message)))
}

async fn verify_otp(
    State(state): State<AppState>,
    Json(request): Json<VerifyOtpRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let message = state.otp.verify(request).await?;
    Ok(Json(ApiResponse::message(message)))
}

async fn resend_otp(
    State(state): State<AppState>,
    Json(request): Json<ResendOtpRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let message = state.otp.resend(request).await?;
    Ok(Json(ApiResponse::message(message)))
}
