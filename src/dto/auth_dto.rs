use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::{UserProfile, UserRole};
use crate::utils::validation::{validate_gst_number, validate_pan_number, validate_phone};

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// What the backend's `/users/login` answers
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendLoginResponse {
    pub token: Option<String>,
    pub user: Option<UserProfile>,
    pub user_role: Option<String>,
    pub user_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub user: UserProfile,
    pub user_role: UserRole,
    pub user_name: String,
}

/// Vendor or company self-registration
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_signup", skip_on_field_errors = false))]
pub struct SignupRequest {
    pub role: UserRole,
    #[validate(length(min = 2, message = "First name must be at least 2 characters"))]
    pub first_name: String,
    #[validate(length(min = 2, message = "Last name must be at least 2 characters"))]
    pub last_name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 3, message = "Company name must be at least 3 characters"))]
    pub company_name: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[serde(skip_serializing)]
    pub confirm_password: String,
    #[serde(default)]
    #[validate(custom = "validate_phone")]
    pub phone_number: Option<String>,
    #[serde(default)]
    #[validate(custom = "validate_gst_number")]
    pub gst_number: Option<String>,
    #[serde(default)]
    #[validate(custom = "validate_pan_number")]
    pub pan_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

fn validate_signup(form: &SignupRequest) -> Result<(), ValidationError> {
    if form.role == UserRole::Admin {
        let mut error = ValidationError::new("role");
        error.message = Some(Cow::from("Only vendor and company accounts can sign up"));
        return Err(error);
    }
    if form.password != form.confirm_password {
        let mut error = ValidationError::new("password_mismatch");
        error.message = Some(Cow::from("Passwords do not match"));
        return Err(error);
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    pub role: UserRole,
    #[serde(default)]
    pub otp: String,
}

/// Body the backend's `/verify_OTP` expects
#[derive(Debug, Serialize)]
pub struct BackendVerifyOtp<'a> {
    pub mail: &'a str,
    pub otp: &'a str,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ResendOtpRequest {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
}
