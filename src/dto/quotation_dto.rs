use std::borrow::Cow;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationError};

use crate::models::{EntityId, Quotation, QuotationTotals, RequestStatus};
use crate::utils::validation::{validate_non_negative_amount, validate_not_blank, validate_tax_percent};

/// Quotation a vendor submits against a lease request
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_quotation_dates", skip_on_field_errors = false))]
pub struct QuotationForm {
    #[validate(range(min = 1, message = "Lease request is required"))]
    pub lease_request_id: i64,
    /// Number reserved by the caller; normally assigned on save
    #[serde(default)]
    pub quotation_number: Option<String>,
    pub quote_date: NaiveDate,
    pub valid_until: NaiveDate,
    #[validate(custom = "validate_not_blank")]
    pub item_description: String,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    #[validate(custom = "validate_non_negative_amount")]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[validate(custom = "validate_tax_percent")]
    pub tax_percent: Decimal,
    #[validate(custom = "validate_not_blank")]
    pub terms: String,
}

fn validate_quotation_dates(form: &QuotationForm) -> Result<(), ValidationError> {
    if form.valid_until <= form.quote_date {
        let mut error = ValidationError::new("valid_until");
        error.message = Some(Cow::from("Valid Until date must be after the Quotation Date"));
        return Err(error);
    }
    Ok(())
}

/// Body sent to `POST /quotations/new-Quotation`
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuotationPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quotation_number: Option<String>,
    pub quote_date: NaiveDate,
    pub valid_until: NaiveDate,
    pub lease_request_id: EntityId,
    pub vendor_id: EntityId,
    pub vendor_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<EntityId>,
    pub item_description: String,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub tax_percent: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub terms: String,
    pub status: RequestStatus,
}

impl QuotationForm {
    pub fn totals(&self) -> QuotationTotals {
        QuotationTotals::compute(self.quantity, self.unit_price, self.tax_percent)
    }

    /// `company_id` is the owner of the lease request being quoted.
    pub fn into_payload(self, vendor_id: EntityId, vendor_name: String, company_id: EntityId) -> QuotationPayload {
        let total_amount = self.totals().total;
        QuotationPayload {
            quotation_number: self.quotation_number.filter(|n| !n.trim().is_empty()),
            quote_date: self.quote_date,
            valid_until: self.valid_until,
            lease_request_id: self.lease_request_id,
            vendor_id,
            vendor_name,
            company_id: Some(company_id),
            item_description: self.item_description.trim().to_string(),
            quantity: self.quantity,
            unit_price: self.unit_price,
            tax_percent: self.tax_percent,
            total_amount,
            terms: self.terms.trim().to_string(),
            status: RequestStatus::Pending,
        }
    }
}

impl QuotationPayload {
    /// Turn the payload into a stored record.
    pub fn into_quotation(self, id: Option<EntityId>, created_at: Option<NaiveDateTime>) -> Quotation {
        Quotation {
            id,
            quotation_number: self.quotation_number,
            quote_date: self.quote_date,
            valid_until: self.valid_until,
            lease_request_id: self.lease_request_id,
            vendor_id: self.vendor_id,
            vendor_name: Some(self.vendor_name),
            company_id: self.company_id,
            item_description: self.item_description,
            quantity: self.quantity,
            unit_price: self.unit_price,
            tax_percent: self.tax_percent,
            total_amount: Some(self.total_amount),
            terms: self.terms,
            status: Some(self.status),
            created_at,
        }
    }
}

/// Dashboard list filters
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotationQuery {
    pub search: Option<String>,
    #[serde(default, deserialize_with = "status_filter")]
    pub status: Option<RequestStatus>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

/// Blank and `all` mean no status filter
fn status_filter<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<RequestStatus>, D::Error> {
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() && !raw.trim().eq_ignore_ascii_case("all") => {
            raw.parse().map(Some).map_err(serde::de::Error::custom)
        }
        _ => Ok(None),
    }
}
