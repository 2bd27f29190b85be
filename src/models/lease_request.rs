//! Lease requests raised by companies

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::status::{RequestStatus, StatusCounts};
use super::EntityId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VehicleType {
    Suv,
    Sedan,
    Hatchback,
    Cuv,
    Muv,
    Pickup,
    Sports,
    Luxury,
}

/// A company's ask for a leased vehicle. Never hard-deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeaseRequest {
    pub id: Option<EntityId>,
    pub vehicle_type: VehicleType,
    #[serde(default)]
    pub preferred_model: Option<String>,
    /// Months
    pub lease_duration: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub min_budget: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub max_budget: Decimal,
    #[serde(default)]
    pub additional_requirements: Option<String>,
    pub company_id: EntityId,
    #[serde(default)]
    pub status: Option<RequestStatus>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_email: Option<String>,
}

impl LeaseRequest {
    pub fn effective_status(&self) -> RequestStatus {
        super::status::effective_status(self.status)
    }

    pub fn is_pending(&self) -> bool {
        self.effective_status() == RequestStatus::Pending
    }
}

/// Dashboard counters for one company's requests
pub fn request_stats(requests: &[LeaseRequest]) -> StatusCounts {
    StatusCounts::tally(requests.iter().map(|r| r.status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(status: Option<RequestStatus>) -> LeaseRequest {
        LeaseRequest {
            id: Some(1),
            vehicle_type: VehicleType::Sedan,
            preferred_model: None,
            lease_duration: 12,
            min_budget: Decimal::new(20_000, 0),
            max_budget: Decimal::new(30_000, 0),
            additional_requirements: None,
            company_id: 7,
            status,
            created_at: None,
            vendor_response: None,
            company_name: None,
            company_email: None,
        }
    }

    #[test]
    fn reads_backend_record() {
        let raw = json!({
            "id": 12,
            "vehicleType": "SUV",
            "preferredModel": "Fortuner",
            "leaseDuration": 24,
            "minBudget": 45000.0,
            "maxBudget": 60000.5,
            "additionalRequirements": "",
            "companyId": 3,
            "status": "PENDING",
            "createdAt": "2024-03-01T09:30:00"
        });
        let parsed: LeaseRequest = serde_json::from_value(raw).unwrap();
        assert_eq!(parsed.vehicle_type, VehicleType::Suv);
        assert_eq!(parsed.max_budget, Decimal::new(600_005, 1));
        assert_eq!(parsed.status, Some(RequestStatus::Pending));
        assert!(parsed.created_at.is_some());
    }

    #[test]
    fn status_is_optional_on_the_wire() {
        let raw = json!({
            "id": 1,
            "vehicleType": "MUV",
            "leaseDuration": 6,
            "minBudget": 1,
            "maxBudget": 2,
            "companyId": 3
        });
        let parsed: LeaseRequest = serde_json::from_value(raw).unwrap();
        assert_eq!(parsed.status, None);
        assert!(parsed.is_pending());
    }

    #[test]
    fn stats_partition_the_list() {
        let requests = vec![
            request(None),
            request(Some(RequestStatus::Pending)),
            request(Some(RequestStatus::Approved)),
            request(Some(RequestStatus::Rejected)),
            request(Some(RequestStatus::Rejected)),
        ];
        let stats = request_stats(&requests);
        assert_eq!(
            stats,
            StatusCounts {
                total: 5,
                pending: 2,
                approved: 1,
                rejected: 2
            }
        );
    }

    #[test]
    fn empty_list_has_zero_stats() {
        assert_eq!(request_stats(&[]), StatusCounts::default());
    }
}
