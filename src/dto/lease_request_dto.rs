use std::borrow::Cow;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::{EntityId, LeaseRequest, RequestStatus, VehicleType};
use crate::utils::validation::validate_non_negative_amount;

/// Create/edit form submitted by a company
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_budget_range", skip_on_field_errors = false))]
pub struct LeaseRequestForm {
    pub vehicle_type: VehicleType,
    #[serde(default)]
    #[validate(length(max = 100, message = "Preferred model is too long"))]
    pub preferred_model: Option<String>,
    #[validate(range(min = 1, message = "Lease duration must be at least 1 month"))]
    pub lease_duration: u32,
    #[serde(with = "rust_decimal::serde::float")]
    #[validate(custom = "validate_non_negative_amount")]
    pub min_budget: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[validate(custom = "validate_non_negative_amount")]
    pub max_budget: Decimal,
    #[serde(default)]
    #[validate(length(max = 2000, message = "Additional requirements are too long"))]
    pub additional_requirements: Option<String>,
}

fn validate_budget_range(form: &LeaseRequestForm) -> Result<(), ValidationError> {
    if form.min_budget > form.max_budget {
        let mut error = ValidationError::new("budget_range");
        error.message = Some(Cow::from(
            "Minimum budget cannot be greater than maximum budget",
        ));
        return Err(error);
    }
    Ok(())
}

/// Body sent to the backend's create and update endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeaseRequestPayload {
    pub vehicle_type: VehicleType,
    pub preferred_model: String,
    pub lease_duration: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub min_budget: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub max_budget: Decimal,
    pub additional_requirements: String,
    pub company_id: EntityId,
}

impl LeaseRequestForm {
    /// Backend payload owned by `company_id`; optional text defaults to "".
    pub fn into_payload(self, company_id: EntityId) -> LeaseRequestPayload {
        LeaseRequestPayload {
            vehicle_type: self.vehicle_type,
            preferred_model: self.preferred_model.unwrap_or_default(),
            lease_duration: self.lease_duration,
            min_budget: self.min_budget,
            max_budget: self.max_budget,
            additional_requirements: self.additional_requirements.unwrap_or_default(),
            company_id,
        }
    }
}

impl LeaseRequestPayload {
    /// Turn the payload into a stored record.
    pub fn into_request(
        self,
        id: Option<EntityId>,
        status: Option<RequestStatus>,
        created_at: Option<NaiveDateTime>,
    ) -> LeaseRequest {
        LeaseRequest {
            id,
            vehicle_type: self.vehicle_type,
            preferred_model: Some(self.preferred_model).filter(|s| !s.is_empty()),
            lease_duration: self.lease_duration,
            min_budget: self.min_budget,
            max_budget: self.max_budget,
            additional_requirements: Some(self.additional_requirements).filter(|s| !s.is_empty()),
            company_id: self.company_id,
            status,
            created_at,
            vendor_response: None,
            company_name: None,
            company_email: None,
        }
    }
}

/// Opaque confirmation returned from create
#[derive(Debug, Clone, Serialize)]
pub struct LeaseRequestConfirmation {
    pub success: bool,
    /// Backend text body, verbatim
    pub message: String,
    pub data: LeaseRequestPayload,
}

/// Vendor/admin decision on a lease request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateRequest {
    pub status: RequestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_response: Option<String>,
}
