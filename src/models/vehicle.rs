//! Registry lookups and vendor-saved vehicles
//!
//! The registry returns loosely shaped JSON whose keys drift between
//! camelCase, snake_case and vendor-specific names. [`VehicleDetails::from_registry`]
//! folds all of that into one fixed record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::EntityId;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDetails {
    pub registration_number: String,
    pub owner_name: String,
    pub make: Option<String>,
    pub model: Option<String>,
    pub fuel_type: Option<String>,
    pub registration_date: Option<String>,
    pub brand_name: Option<String>,
    pub brand_model: Option<String>,
    pub is_financed: Option<String>,
    pub manufacturing_date: Option<String>,
    pub blacklist_status: Option<String>,
    pub financer: Option<String>,
    pub body_type: Option<String>,
    pub color: Option<String>,
    pub rc_status: Option<String>,
    pub fit_upto: Option<String>,
    pub tax_upto: Option<String>,
    pub category: Option<String>,
    pub insurance_company: Option<String>,
    pub insurance_policy: Option<String>,
    pub insurance_expiry: Option<String>,
    pub chasis_number: Option<String>,
    pub owner_count: Option<String>,
    pub seating_capacity: Option<String>,
    pub license_plate: Option<String>,
}

/// A lookup result a vendor chose to keep
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavedVehicle {
    #[serde(default)]
    pub id: Option<EntityId>,
    #[serde(default)]
    pub vendor_id: Option<EntityId>,
    #[serde(flatten)]
    pub details: VehicleDetails,
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
}

/// Wire names seen for each field, preferred name first
const MAKE: &[&str] = &["make", "maker", "manufacturer", "makerDescription", "maker_description"];
const MODEL: &[&str] = &["model", "makerModel", "maker_model", "vehicleModel"];
const FUEL_TYPE: &[&str] = &["fuelType", "fuel_type", "fuelDescription", "fuel"];
const REGISTRATION_DATE: &[&str] = &["registrationDate", "registration_date", "regDate", "reg_date"];
const BRAND_NAME: &[&str] = &["brandName", "brand_name", "brand"];
const BRAND_MODEL: &[&str] = &["brandModel", "brand_model"];
const IS_FINANCED: &[&str] = &["isFinanced", "is_financed", "financed"];
const MANUFACTURING_DATE: &[&str] = &[
    "manufacturingDate",
    "manufacturing_date",
    "manufacturingDateFormatted",
    "mfgDate",
];
const BLACKLIST_STATUS: &[&str] = &["blacklistStatus", "blacklist_status"];
const FINANCER: &[&str] = &["financer", "financier", "financerName"];
const BODY_TYPE: &[&str] = &["bodyType", "body_type", "bodyTypeDescription"];
const COLOR: &[&str] = &["color", "colour", "vehicleColour"];
const RC_STATUS: &[&str] = &["rcStatus", "rc_status"];
const FIT_UPTO: &[&str] = &["fitUpto", "fit_upto", "fitnessUpto"];
const TAX_UPTO: &[&str] = &["taxUpto", "tax_upto", "taxPaidUpto"];
const CATEGORY: &[&str] = &["category", "vehicleCategory", "vehicle_category"];
const INSURANCE_COMPANY: &[&str] = &["insuranceCompany", "insurance_company", "insurer"];
const INSURANCE_POLICY: &[&str] = &[
    "insurancePolicy",
    "insurance_policy",
    "insurancePolicyNumber",
    "policyNumber",
];
const INSURANCE_EXPIRY: &[&str] = &[
    "insuranceExpiry",
    "insuranceUpto",
    "insurance_upto",
    "insuranceValidity",
];
const CHASIS_NUMBER: &[&str] = &["chasisNumber", "chassisNumber", "chassis_number", "vehicleChasiNumber"];
const OWNER_COUNT: &[&str] = &["ownerCount", "owner_count", "ownerNumber", "ownerSrNo"];
const SEATING_CAPACITY: &[&str] = &["seatingCapacity", "seating_capacity", "seatCapacity"];
const LICENSE_PLATE: &[&str] = &["licensePlate", "license_plate"];
const REGISTRATION_NUMBER: &[&str] = &["registrationNumber", "registration_number", "regNo", "rcNumber"];
const OWNER_NAME: &[&str] = &["ownerName", "owner_name", "owner"];

impl VehicleDetails {
    /// Map a registry response onto the fixed record.
    ///
    /// The payload may be wrapped in `data` or `result`. Missing or blank
    /// values become `None`, booleans become `"Yes"`/`"No"`, numbers are
    /// rendered as text. The registration number and owner fall back to the
    /// values the lookup was made with.
    pub fn from_registry(registration_number: &str, owner_name: &str, response: &Value) -> Self {
        let body = unwrap_envelope(response);
        let field = |names: &[&str]| pick(body, names);

        let registration_number =
            field(REGISTRATION_NUMBER).unwrap_or_else(|| registration_number.to_string());

        Self {
            owner_name: field(OWNER_NAME).unwrap_or_else(|| owner_name.to_string()),
            make: field(MAKE),
            model: field(MODEL),
            fuel_type: field(FUEL_TYPE),
            registration_date: field(REGISTRATION_DATE),
            brand_name: field(BRAND_NAME),
            brand_model: field(BRAND_MODEL),
            is_financed: field(IS_FINANCED),
            manufacturing_date: field(MANUFACTURING_DATE),
            blacklist_status: field(BLACKLIST_STATUS),
            financer: field(FINANCER),
            body_type: field(BODY_TYPE),
            color: field(COLOR),
            rc_status: field(RC_STATUS),
            fit_upto: field(FIT_UPTO),
            tax_upto: field(TAX_UPTO),
            category: field(CATEGORY),
            insurance_company: field(INSURANCE_COMPANY),
            insurance_policy: field(INSURANCE_POLICY),
            insurance_expiry: field(INSURANCE_EXPIRY),
            chasis_number: field(CHASIS_NUMBER),
            owner_count: field(OWNER_COUNT),
            seating_capacity: field(SEATING_CAPACITY),
            license_plate: field(LICENSE_PLATE).or_else(|| Some(registration_number.clone())),
            registration_number,
        }
    }

    /// Deterministic record served when no backend is configured
    pub fn sample(registration_number: &str, owner_name: &str) -> Self {
        let text = |s: &str| Some(s.to_string());
        Self {
            registration_number: registration_number.to_string(),
            owner_name: owner_name.to_string(),
            make: text("Toyota"),
            model: text("Innova"),
            fuel_type: text("Diesel"),
            registration_date: text("2022-01-15"),
            brand_name: text("Toyota"),
            brand_model: text("Innova Crysta"),
            is_financed: text("Yes"),
            manufacturing_date: text("2021-11-10"),
            blacklist_status: text("Clear"),
            financer: text("HDFC Bank"),
            body_type: text("SUV"),
            color: text("White"),
            rc_status: text("Active"),
            fit_upto: text("2026-11-10"),
            tax_upto: text("2025-11-10"),
            category: text("Commercial"),
            insurance_company: text("ICICI Lombard"),
            insurance_policy: text("POL123456"),
            insurance_expiry: text("2024-11-10"),
            chasis_number: text("CHASIS1234567890"),
            owner_count: text("1"),
            seating_capacity: text("7"),
            license_plate: Some(registration_number.to_string()),
        }
    }
}

fn unwrap_envelope(response: &Value) -> &Value {
    ["data", "result"]
        .iter()
        .find_map(|key| response.get(key).filter(|inner| inner.is_object()))
        .unwrap_or(response)
}

fn pick(body: &Value, names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| body.get(name).and_then(render))
}

fn render(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Bool(true) => Some("Yes".to_string()),
        Value::Bool(false) => Some("No".to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
