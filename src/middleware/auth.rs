//! Session extraction and the authorization interceptor
//!
//! Handlers ask for a [`SessionContext`] argument; the extractor resolves
//! the bearer token against the session store. The interceptor watches
//! responses and tears the session down when the backend answers 401.

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::{
    models::SessionContext,
    state::AppState,
    utils::{errors::AppError, jwt::extract_token_from_header},
};

fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Please log in to continue.".to_string()))?;
    extract_token_from_header(value)
}

#[async_trait]
impl FromRequestParts<AppState> for SessionContext {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;
        state.auth.resolve(token).await
    }
}

/// Clears the caller's session on any 401; a 403 is only logged.
pub async fn authorization_interceptor(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let token = bearer_token(request.headers()).ok().map(str::to_string);
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    match response.status() {
        StatusCode::UNAUTHORIZED => {
            warn!("🔒 401 on {}", path);
            if let Some(token) = token {
                state.auth.revoke(&token).await;
            }
        }
        StatusCode::FORBIDDEN => warn!("⛔ 403 on {}", path),
        _ => {}
    }
    response
}
