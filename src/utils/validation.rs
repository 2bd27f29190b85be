//! Validation helpers
//!
//! Custom validators used by the `validator` derives on the DTOs, plus a
//! few normalization helpers for identifiers typed by users.

use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use validator::ValidationError;

lazy_static! {
    /// 15 chars: state code, PAN, entity number, 'Z', checksum
    static ref GST_RE: Regex =
        Regex::new(r"^[0-9]{2}[A-Z]{5}[0-9]{4}[A-Z][1-9A-Z]Z[0-9A-Z]$").unwrap();
    static ref PAN_RE: Regex = Regex::new(r"^[A-Z]{5}[0-9]{4}[A-Z]$").unwrap();
    /// State code, RTO number, optional series, 1-4 digit number (e.g. KA01AB1234),
    /// or a Bharat series plate: year, "BH", 4 digits, 1-2 letters (e.g. 22BH1234AA)
    static ref REGISTRATION_RE: Regex =
        Regex::new(r"^(?:[A-Z]{2}[0-9]{1,2}[A-Z]{0,3}[0-9]{1,4}|[0-9]{2}BH[0-9]{4}[A-Z]{1,2})$").unwrap();
}

fn error_with_message(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::from(message));
    error
}

/// Reject blank strings (whitespace only counts as blank)
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error_with_message("not_blank", "This field is required"));
    }
    Ok(())
}

/// Indian GSTIN format
pub fn validate_gst_number(value: &str) -> Result<(), ValidationError> {
    if !GST_RE.is_match(&value.trim().to_uppercase()) {
        let mut error = error_with_message("gst_number", "Please enter a valid GST number");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Indian PAN format
pub fn validate_pan_number(value: &str) -> Result<(), ValidationError> {
    if !PAN_RE.is_match(&value.trim().to_uppercase()) {
        let mut error = error_with_message("pan_number", "Please enter a valid PAN number");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// 10 digit mobile number, an optional +91/0 prefix is tolerated
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    let digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();
    let local = digits
        .strip_prefix("91")
        .filter(|rest| rest.len() == 10)
        .or_else(|| digits.strip_prefix('0').filter(|rest| rest.len() == 10))
        .unwrap_or(&digits);

    if local.len() != 10 {
        let mut error = error_with_message("phone", "Please enter a valid 10 digit contact number");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Registration number as printed on the RC book
pub fn validate_registration_number(value: &str) -> Result<(), ValidationError> {
    if !REGISTRATION_RE.is_match(&normalize_registration(value)) {
        let mut error =
            error_with_message("registration_number", "Please enter a valid registration number");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Amounts can't be negative
pub fn validate_non_negative_amount(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut error = error_with_message("non_negative", "Amount cannot be negative");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Tax is a percentage between 0 and 100
pub fn validate_tax_percent(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO || *value > Decimal::ONE_HUNDRED {
        let mut error = error_with_message("tax_percent", "Tax percent must be between 0 and 100");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Upper-case and strip the separators people type into plate numbers
pub fn normalize_registration(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '.')
        .flat_map(char::to_uppercase)
        .collect()
}

/// Trim and lower-case an email for lookups
pub fn normalize_email(value: &str) -> String {
    value.trim().to_lowercase()
}
