//! Vendor quotations and the figures derived from them
//!
//! Totals and expiry flags are computed on read and never stored; the
//! backend's `totalAmount` is only a denormalized copy.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::status::{effective_status, RequestStatus};
use super::EntityId;

/// Days ahead of `validUntil` that count as expiring soon
pub const EXPIRING_SOON_DAYS: i64 = 7;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Quotation {
    pub id: Option<EntityId>,
    #[serde(default)]
    pub quotation_number: Option<String>,
    pub quote_date: NaiveDate,
    pub valid_until: NaiveDate,
    pub lease_request_id: EntityId,
    pub vendor_id: EntityId,
    #[serde(default)]
    pub vendor_name: Option<String>,
    #[serde(default)]
    pub company_id: Option<EntityId>,
    pub item_description: String,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub tax_percent: Decimal,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub total_amount: Option<Decimal>,
    #[serde(default)]
    pub terms: String,
    #[serde(default)]
    pub status: Option<RequestStatus>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotationTotals {
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub tax_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

impl QuotationTotals {
    pub fn compute(quantity: u32, unit_price: Decimal, tax_percent: Decimal) -> Self {
        let subtotal = Decimal::from(quantity) * unit_price;
        let tax_amount = subtotal * tax_percent / Decimal::ONE_HUNDRED;
        Self {
            subtotal,
            tax_amount,
            total: subtotal + tax_amount,
        }
    }
}

impl Quotation {
    pub fn totals(&self) -> QuotationTotals {
        QuotationTotals::compute(self.quantity, self.unit_price, self.tax_percent)
    }

    pub fn effective_status(&self) -> RequestStatus {
        effective_status(self.status)
    }

    /// Whole days from `today` to `validUntil`, negative once past
    pub fn days_until_expiry(&self, today: NaiveDate) -> i64 {
        (self.valid_until - today).num_days()
    }

    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.valid_until < today
    }

    pub fn is_expiring_soon(&self, today: NaiveDate) -> bool {
        (0..=EXPIRING_SOON_DAYS).contains(&self.days_until_expiry(today))
    }
}

/// A quotation as the dashboards display it
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuotationSummary {
    #[serde(flatten)]
    pub quotation: Quotation,
    #[serde(flatten)]
    pub totals: QuotationTotals,
    pub expired: bool,
    pub expiring_soon: bool,
}

impl QuotationSummary {
    pub fn new(quotation: Quotation, today: NaiveDate) -> Self {
        Self {
            totals: quotation.totals(),
            expired: quotation.is_expired(today),
            expiring_soon: quotation.is_expiring_soon(today),
            quotation,
        }
    }
}
