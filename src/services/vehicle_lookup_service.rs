use std::sync::Arc;

use tracing::{info, warn};

use crate::dto::vehicle_dto::VehicleLookupQuery;
use crate::models::{EntityId, SavedVehicle, SessionContext, UserRole, VehicleDetails};
use crate::repositories::VehicleRepository;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::{normalize_registration, validate_registration_number};

const REQUIRED_FIELDS: &str = "Registration number and owner name are required.";

#[derive(Clone)]
pub struct VehicleLookupService {
    repo: Arc<dyn VehicleRepository>,
}

impl VehicleLookupService {
    pub fn new(repo: Arc<dyn VehicleRepository>) -> Self {
        Self { repo }
    }

    /// Registry lookup by registration number and owner name
    pub async fn lookup(&self, session: &SessionContext, query: &VehicleLookupQuery) -> AppResult<VehicleDetails> {
        session.require_role(&[UserRole::Vendor, UserRole::Admin], "look up a vehicle")?;

        let owner_name = query.owner_name.trim();
        if query.reg_no.trim().is_empty() || owner_name.is_empty() {
            return Err(AppError::InvalidInput(REQUIRED_FIELDS.to_string()));
        }
        let registration = checked_registration(&query.reg_no)?;

        info!("🔍 Looking up vehicle {}", registration);
        let details = self.repo.lookup(session, &registration, owner_name).await?;
        if details.make.is_none() && details.model.is_none() {
            warn!("⚠️ Registry returned no make/model for {}", registration);
        }
        Ok(details)
    }

    /// Attach a looked-up vehicle to the calling vendor
    pub async fn save_vehicle(&self, session: &SessionContext, details: VehicleDetails) -> AppResult<SavedVehicle> {
        session.require_role(&[UserRole::Vendor], "save a vehicle")?;

        if details.registration_number.trim().is_empty() || details.owner_name.trim().is_empty() {
            return Err(AppError::InvalidInput(REQUIRED_FIELDS.to_string()));
        }
        let details = VehicleDetails {
            registration_number: checked_registration(&details.registration_number)?,
            owner_name: details.owner_name.trim().to_string(),
            ..details
        };

        let saved = self.repo.save(session, session.user_id, &details).await?;
        info!("🚗 Vehicle {} saved for vendor {}", details.registration_number, session.user_id);
        Ok(saved)
    }

    pub async fn list_saved(&self, session: &SessionContext, vendor_id: EntityId) -> AppResult<Vec<SavedVehicle>> {
        session.require_vendor_scope(vendor_id, "list saved vehicles")?;
        self.repo.list_by_vendor(session, vendor_id).await
    }
}

fn checked_registration(raw: &str) -> AppResult<String> {
    let registration = normalize_registration(raw);
    validate_registration_number(&registration).map_err(|e| {
        AppError::InvalidInput(
            e.message
                .map(|m| m.into_owned())
                .unwrap_or_else(|| "Please enter a valid registration number".to_string()),
        )
    })?;
    Ok(registration)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_is_normalized_before_checking() {
        assert_eq!(checked_registration("ka-01 ab 1234").unwrap(), "KA01AB1234");
        assert_eq!(checked_registration("22 bh 1234 aa").unwrap(), "22BH1234AA");
    }

    #[test]
    fn malformed_registration_is_invalid_input() {
        let err = checked_registration("12-ABC").unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(msg) if msg == "Please enter a valid registration number"));
    }
}
