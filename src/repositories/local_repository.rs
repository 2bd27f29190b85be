//! Repositories backed by the local store
//!
//! Used when `USE_BACKEND_API` is off. Keeps the same records the backend
//! would, under the storage keys the dashboards historically used.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rand::Rng;
use tracing::{info, warn};

use super::{LeaseRequestRepository, QuotationRepository, VehicleRepository};
use crate::dto::lease_request_dto::{LeaseRequestPayload, StatusUpdateRequest};
use crate::dto::quotation_dto::QuotationPayload;
use crate::models::{
    EntityId, LeaseRequest, Quotation, RequestStatus, SavedVehicle, SessionContext, VehicleDetails,
};
use crate::store::local_store::{
    LocalStore, LEASE_REQUESTS_KEY, QUOTATIONS_KEY, VENDOR_VEHICLES_KEY,
};
use crate::utils::errors::{not_found_error, AppError, AppResult};

const QUOTATION_NUMBER_ATTEMPTS: usize = 32;

#[derive(Clone)]
pub struct LocalRepository {
    pub(super) store: LocalStore,
}

impl LocalRepository {
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    async fn lease_requests(&self) -> AppResult<Vec<LeaseRequest>> {
        self.store.get_list(LEASE_REQUESTS_KEY).await
    }

    async fn quotations(&self) -> AppResult<Vec<Quotation>> {
        self.store.get_list(QUOTATIONS_KEY).await
    }
}

/// `QT-<yyyymmdd>-<4 digits>`, unique among `taken`
pub fn generate_quotation_number(date: NaiveDate, taken: &HashSet<String>) -> AppResult<String> {
    let prefix = format!("QT-{}", date.format("%Y%m%d"));
    let mut rng = rand::thread_rng();

    let random = (0..QUOTATION_NUMBER_ATTEMPTS)
        .map(|_| format!("{}-{:04}", prefix, rng.gen_range(0..10_000)))
        .find(|candidate| !taken.contains(candidate));
    if let Some(number) = random {
        return Ok(number);
    }

    (0..10_000)
        .map(|n| format!("{}-{:04}", prefix, n))
        .find(|candidate| !taken.contains(candidate))
        .ok_or_else(|| AppError::Conflict(format!("No quotation numbers left for {}", prefix)))
}

#[async_trait]
impl LeaseRequestRepository for LocalRepository {
    async fn create(&self, session: &SessionContext, payload: &LeaseRequestPayload) -> AppResult<String> {
        let id = self.store.next_id().await?;
        let mut request = payload
            .clone()
            .into_request(Some(id), Some(RequestStatus::Pending), Some(Utc::now().naive_utc()));
        request.company_name = session.company_name.clone();
        request.company_email = Some(session.email.clone());

        self.store
            .update_list(LEASE_REQUESTS_KEY, |requests: &mut Vec<LeaseRequest>| {
                requests.push(request);
                Ok(())
            })
            .await?;

        info!("✅ Lease request {} created (local store)", id);
        Ok("Lease request submitted successfully".to_string())
    }

    async fn update(
        &self,
        _session: &SessionContext,
        id: EntityId,
        payload: &LeaseRequestPayload,
    ) -> AppResult<LeaseRequest> {
        self.store
            .update_list(LEASE_REQUESTS_KEY, |requests: &mut Vec<LeaseRequest>| {
                let existing = requests
                    .iter_mut()
                    .find(|r| r.id == Some(id))
                    .ok_or_else(|| not_found_error("Lease request", id))?;

                let mut updated = payload
                    .clone()
                    .into_request(existing.id, existing.status, existing.created_at);
                updated.vendor_response = existing.vendor_response.take();
                updated.company_name = existing.company_name.take();
                updated.company_email = existing.company_email.take();
                *existing = updated.clone();
                Ok(updated)
            })
            .await
    }

    async fn get(&self, _session: &SessionContext, id: EntityId) -> AppResult<LeaseRequest> {
        self.lease_requests()
            .await?
            .into_iter()
            .find(|r| r.id == Some(id))
            .ok_or_else(|| not_found_error("Lease request", id))
    }

    async fn list_by_company(&self, _session: &SessionContext, company_id: EntityId) -> AppResult<Vec<LeaseRequest>> {
        Ok(self
            .lease_requests()
            .await?
            .into_iter()
            .filter(|r| r.company_id == company_id)
            .collect())
    }

    async fn list_pending_for_vendor(
        &self,
        _session: &SessionContext,
        vendor_id: EntityId,
    ) -> AppResult<Vec<LeaseRequest>> {
        let quoted: HashSet<EntityId> = self
            .quotations()
            .await?
            .into_iter()
            .filter(|q| q.vendor_id == vendor_id)
            .map(|q| q.lease_request_id)
            .collect();

        Ok(self
            .lease_requests()
            .await?
            .into_iter()
            .filter(|r| r.is_pending())
            .filter(|r| r.id.map_or(true, |id| !quoted.contains(&id)))
            .collect())
    }

    async fn list_all(&self, _session: &SessionContext) -> AppResult<Vec<LeaseRequest>> {
        self.lease_requests().await
    }

    async fn update_status(
        &self,
        _session: &SessionContext,
        id: EntityId,
        update: &StatusUpdateRequest,
    ) -> AppResult<LeaseRequest> {
        let updated = self
            .store
            .update_list(LEASE_REQUESTS_KEY, |requests: &mut Vec<LeaseRequest>| {
                let request = requests
                    .iter_mut()
                    .find(|r| r.id == Some(id))
                    .ok_or_else(|| not_found_error("Lease request", id))?;

                request.status = Some(request.effective_status().transition(update.status)?);
                if let Some(note) = update.vendor_response.as_ref().filter(|n| !n.trim().is_empty()) {
                    request.vendor_response = Some(note.clone());
                }
                Ok(request.clone())
            })
            .await?;

        info!("✅ Lease request {} status updated to {} (local store)", id, update.status);
        Ok(updated)
    }
}

#[async_trait]
impl QuotationRepository for LocalRepository {
    async fn create(&self, _session: &SessionContext, payload: &QuotationPayload) -> AppResult<Quotation> {
        let lease_request = self
            .lease_requests()
            .await?
            .into_iter()
            .find(|r| r.id == Some(payload.lease_request_id))
            .ok_or_else(|| not_found_error("Lease request", payload.lease_request_id))?;
        if !lease_request.is_pending() {
            return Err(AppError::Conflict(format!(
                "Lease request is already {} and no longer accepts quotations",
                lease_request.effective_status()
            )));
        }

        let id = self.store.next_id().await?;
        let today = Utc::now().date_naive();
        let mut quotation = payload.clone().into_quotation(Some(id), Some(Utc::now().naive_utc()));
        quotation.company_id = Some(lease_request.company_id);

        let created = self
            .store
            .update_list(QUOTATIONS_KEY, |quotations: &mut Vec<Quotation>| {
                let taken: HashSet<String> = quotations
                    .iter()
                    .filter_map(|q| q.quotation_number.clone())
                    .collect();

                match &quotation.quotation_number {
                    Some(number) if taken.contains(number) => {
                        return Err(AppError::Conflict(format!(
                            "Quotation number {} is already in use",
                            number
                        )))
                    }
                    Some(_) => {}
                    None => {
                        quotation.quotation_number = Some(generate_quotation_number(today, &taken)?);
                    }
                }

                quotations.push(quotation.clone());
                Ok(quotation)
            })
            .await?;

        info!(
            "✅ Quotation {} created for lease request {} (local store)",
            created.quotation_number.as_deref().unwrap_or("-"),
            created.lease_request_id
        );
        Ok(created)
    }

    async fn get(&self, _session: &SessionContext, id: EntityId) -> AppResult<Quotation> {
        self.quotations()
            .await?
            .into_iter()
            .find(|q| q.id == Some(id))
            .ok_or_else(|| not_found_error("Quotation", id))
    }

    async fn list_by_vendor(&self, _session: &SessionContext, vendor_id: EntityId) -> AppResult<Vec<Quotation>> {
        Ok(self
            .quotations()
            .await?
            .into_iter()
            .filter(|q| q.vendor_id == vendor_id)
            .collect())
    }

    async fn list_by_company(&self, _session: &SessionContext, company_id: EntityId) -> AppResult<Vec<Quotation>> {
        Ok(self
            .quotations()
            .await?
            .into_iter()
            .filter(|q| q.company_id == Some(company_id))
            .collect())
    }

    async fn set_status(
        &self,
        _session: &SessionContext,
        id: EntityId,
        status: RequestStatus,
    ) -> AppResult<Quotation> {
        let updated = self
            .store
            .update_list(QUOTATIONS_KEY, |quotations: &mut Vec<Quotation>| {
                let quotation = quotations
                    .iter_mut()
                    .find(|q| q.id == Some(id))
                    .ok_or_else(|| not_found_error("Quotation", id))?;
                quotation.status = Some(quotation.effective_status().transition(status)?);
                Ok(quotation.clone())
            })
            .await?;

        if status == RequestStatus::Approved {
            let lease_request_id = updated.lease_request_id;
            self.store
                .update_list(LEASE_REQUESTS_KEY, |requests: &mut Vec<LeaseRequest>| {
                    if let Some(request) = requests
                        .iter_mut()
                        .find(|r| r.id == Some(lease_request_id) && r.is_pending())
                    {
                        request.status = Some(RequestStatus::Approved);
                    }
                    Ok(())
                })
                .await?;
        }

        info!("✅ Quotation {} marked {} (local store)", id, status);
        Ok(updated)
    }

    async fn download_pdf(&self, _session: &SessionContext, id: EntityId) -> AppResult<Vec<u8>> {
        warn!("⚠️ PDF requested for quotation {} without a backend", id);
        Err(AppError::ServiceUnavailable(
            "PDF download is not available without the backend".to_string(),
        ))
    }
}

#[async_trait]
impl VehicleRepository for LocalRepository {
    async fn lookup(
        &self,
        _session: &SessionContext,
        registration_number: &str,
        owner_name: &str,
    ) -> AppResult<VehicleDetails> {
        Ok(VehicleDetails::sample(registration_number, owner_name))
    }

    async fn save(
        &self,
        _session: &SessionContext,
        vendor_id: EntityId,
        details: &VehicleDetails,
    ) -> AppResult<SavedVehicle> {
        let id = self.store.next_id().await?;
        let record = SavedVehicle {
            id: Some(id),
            vendor_id: Some(vendor_id),
            details: details.clone(),
            saved_at: Some(Utc::now()),
        };

        self.store
            .update_list(VENDOR_VEHICLES_KEY, |vehicles: &mut Vec<SavedVehicle>| {
                let repeat = vehicles.iter().any(|v| {
                    v.vendor_id == Some(vendor_id)
                        && v.details.registration_number == details.registration_number
                });
                if repeat {
                    warn!(
                        "⚠️ Vendor {} saved {} again",
                        vendor_id, details.registration_number
                    );
                }
                vehicles.push(record.clone());
                Ok(())
            })
            .await?;

        info!("✅ Vehicle {} saved for vendor {} (local store)", details.registration_number, vendor_id);
        Ok(record)
    }

    async fn list_by_vendor(&self, _session: &SessionContext, vendor_id: EntityId) -> AppResult<Vec<SavedVehicle>> {
        Ok(self
            .store
            .get_list::<SavedVehicle>(VENDOR_VEHICLES_KEY)
            .await?
            .into_iter()
            .filter(|v| v.vendor_id == Some(vendor_id))
            .collect())
    }
}
