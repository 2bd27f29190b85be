//! Error handling
//!
//! This module defines every error the gateway can produce and how each one
//! is turned into an HTTP response for the dashboards.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};
use validator::{ValidationErrors, ValidationErrorsKind};

/// Message shown when the backend gives us nothing usable.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

/// Main application errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Non-success answer from the leasing backend, message kept verbatim.
    #[error("Backend error ({status}): {message}")]
    Backend { status: StatusCode, message: String },

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("JWT error: {0}")]
    Jwt(String),

    #[error("Hash error: {0}")]
    Hash(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error body returned to the dashboards
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl AppError {
    /// The string a dashboard should render for this failure.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(errors) => first_validation_message(errors)
                .unwrap_or_else(|| "Please fill all required fields correctly.".to_string()),
            AppError::InvalidInput(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::ServiceUnavailable(msg) => msg.clone(),
            AppError::Backend { message, .. } if !message.trim().is_empty() => message.clone(),
            AppError::Jwt(_) => "Your session is invalid. Please log in again.".to_string(),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }

    /// HTTP status that goes back to the caller.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) | AppError::Jwt(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Backend { status, .. } => *status,
            AppError::ExternalApi(_) => StatusCode::BAD_GATEWAY,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Hash(_) | AppError::Storage(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Backend { .. } => "BACKEND_ERROR",
            AppError::ExternalApi(_) => "EXTERNAL_API_ERROR",
            AppError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            AppError::Jwt(_) => "JWT_ERROR",
            AppError::Hash(_) => "HASH_ERROR",
            AppError::Storage(_) => "STORAGE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn title(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "Validation Error",
            AppError::InvalidInput(_) => "Bad Request",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::Forbidden(_) => "Forbidden",
            AppError::NotFound(_) => "Not Found",
            AppError::Conflict(_) => "Conflict",
            AppError::Backend { .. } => "Backend Error",
            AppError::ExternalApi(_) => "External API Error",
            AppError::ServiceUnavailable(_) => "Service Unavailable",
            AppError::Jwt(_) => "JWT Error",
            AppError::Hash(_) => "Hash Error",
            AppError::Storage(_) => "Storage Error",
            AppError::Internal(_) => "Internal Server Error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            error!("❌ {}", self);
        } else {
            warn!("⚠️ {}", self);
        }

        let details = match &self {
            AppError::Validation(errors) => Some(json!(errors)),
            AppError::ExternalApi(msg) => Some(json!({ "external_api_error": msg })),
            AppError::Storage(msg) => Some(json!({ "storage_error": msg })),
            AppError::Internal(msg) => Some(json!({ "internal_error": msg })),
            _ => None,
        };

        let body = ErrorResponse {
            error: self.title().to_string(),
            message: self.user_message(),
            details,
            code: Some(self.code().to_string()),
        };

        (status, Json(body)).into_response()
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AppError::ExternalApi(format!("Backend request timed out: {}", e))
        } else if e.is_decode() {
            AppError::ExternalApi(format!("Unexpected backend response: {}", e))
        } else {
            AppError::ExternalApi(format!("Network error: {}", e))
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Storage(format!("JSON error: {}", e))
    }
}

/// Typed result for fallible operations
pub type AppResult<T> = Result<T, AppError>;

/// Pick the most relevant human message out of a validator error tree.
///
/// Struct-level (schema) errors win over field errors, because those carry
/// the cross-field messages such as date or budget ordering.
pub fn first_validation_message(errors: &ValidationErrors) -> Option<String> {
    let all = errors.errors();

    if let Some(ValidationErrorsKind::Field(list)) = all.get("__all__") {
        if let Some(msg) = list.iter().find_map(|e| e.message.clone()) {
            return Some(msg.into_owned());
        }
    }

    let mut fields: Vec<_> = all.iter().collect();
    fields.sort_by_key(|(name, _)| *name);

    for (field, kind) in fields {
        match kind {
            ValidationErrorsKind::Field(list) => {
                if let Some(e) = list.first() {
                    return Some(match &e.message {
                        Some(msg) => msg.to_string(),
                        None => format!("Invalid value for {}", field),
                    });
                }
            }
            ValidationErrorsKind::Struct(inner) => {
                if let Some(msg) = first_validation_message(inner) {
                    return Some(msg);
                }
            }
            ValidationErrorsKind::List(items) => {
                for inner in items.values() {
                    if let Some(msg) = first_validation_message(inner) {
                        return Some(msg);
                    }
                }
            }
        }
    }

    None
}

/// Helper for not-found errors
pub fn not_found_error(resource: &str, id: impl std::fmt::Display) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}

/// Helper for forbidden errors
pub fn forbidden_error(operation: &str, reason: &str) -> AppError {
    AppError::Forbidden(format!("Cannot {}: {}", operation, reason))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;
    use validator::ValidationError;

    #[test]
    fn backend_message_is_surfaced_verbatim() {
        let err = AppError::Backend {
            status: StatusCode::BAD_REQUEST,
            message: "Company not found for id 42".to_string(),
        };
        assert_eq!(err.user_message(), "Company not found for id 42");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn empty_backend_message_falls_back_to_generic() {
        let err = AppError::Backend {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "  ".to_string(),
        };
        assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn schema_message_wins_over_field_message() {
        let mut errors = ValidationErrors::new();
        let mut field = ValidationError::new("length");
        field.message = Some(Cow::from("Terms are required"));
        errors.add("terms", field);
        let mut schema = ValidationError::new("date_order");
        schema.message = Some(Cow::from("Valid Until date must be after the Quotation Date"));
        errors.add("__all__", schema);

        assert_eq!(
            AppError::from(errors).user_message(),
            "Valid Until date must be after the Quotation Date"
        );
    }

    #[test]
    fn network_failures_map_to_bad_gateway() {
        let err = AppError::ExternalApi("connection refused".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);
    }
}
