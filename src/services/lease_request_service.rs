//! Lease request facade
//!
//! Companies raise and edit requests; vendors and admins browse them and
//! record a decision. Every call is scoped by the caller's session.

use std::sync::Arc;

use tracing::{debug, info};
use validator::Validate;

use crate::dto::lease_request_dto::{LeaseRequestConfirmation, LeaseRequestForm, StatusUpdateRequest};
use crate::models::{request_stats, EntityId, LeaseRequest, SessionContext, StatusCounts, UserRole};
use crate::repositories::LeaseRequestRepository;
use crate::utils::errors::{forbidden_error, AppError, AppResult};

#[derive(Clone)]
pub struct LeaseRequestService {
    repo: Arc<dyn LeaseRequestRepository>,
}

impl LeaseRequestService {
    pub fn new(repo: Arc<dyn LeaseRequestRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(
        &self,
        session: &SessionContext,
        form: LeaseRequestForm,
    ) -> AppResult<LeaseRequestConfirmation> {
        session.require_role(&[UserRole::Company], "create a lease request")?;
        form.validate()?;

        let payload = form.into_payload(session.user_id);
        let message = self.repo.create(session, &payload).await?;
        info!("📝 Lease request submitted by company {}", session.user_id);

        Ok(LeaseRequestConfirmation {
            success: true,
            message,
            data: payload,
        })
    }

    /// Full replace, allowed for the owning company while still pending.
    pub async fn update(
        &self,
        session: &SessionContext,
        id: EntityId,
        form: LeaseRequestForm,
    ) -> AppResult<LeaseRequest> {
        session.require_role(&[UserRole::Company], "edit a lease request")?;
        form.validate()?;

        let current = self.repo.get(session, id).await?;
        if current.company_id != session.user_id {
            return Err(forbidden_error(
                "edit this lease request",
                "it belongs to another company",
            ));
        }
        if !current.is_pending() {
            return Err(AppError::Conflict(format!(
                "Lease request is already {} and can no longer be edited",
                current.effective_status()
            )));
        }

        let payload = form.into_payload(current.company_id);
        let updated = self.repo.update(session, id, &payload).await?;
        info!("✏️ Lease request {} updated", id);
        Ok(updated)
    }

    pub async fn list_by_company(
        &self,
        session: &SessionContext,
        company_id: EntityId,
    ) -> AppResult<Vec<LeaseRequest>> {
        session.require_company_scope(company_id, "list lease requests")?;
        let requests = self.repo.list_by_company(session, company_id).await?;
        debug!("📥 {} lease requests for company {}", requests.len(), company_id);
        Ok(requests)
    }

    pub async fn stats_for_company(
        &self,
        session: &SessionContext,
        company_id: EntityId,
    ) -> AppResult<StatusCounts> {
        let requests = self.list_by_company(session, company_id).await?;
        Ok(request_stats(&requests))
    }

    /// Requests still open to a vendor, excluding the ones it already quoted
    pub async fn list_pending_for_vendor(
        &self,
        session: &SessionContext,
        vendor_id: EntityId,
    ) -> AppResult<Vec<LeaseRequest>> {
        session.require_vendor_scope(vendor_id, "list pending lease requests")?;
        let requests = self.repo.list_pending_for_vendor(session, vendor_id).await?;
        Ok(requests.into_iter().filter(LeaseRequest::is_pending).collect())
    }

    pub async fn list_all(&self, session: &SessionContext) -> AppResult<Vec<LeaseRequest>> {
        session.require_role(&[UserRole::Vendor, UserRole::Admin], "list all lease requests")?;
        self.repo.list_all(session).await
    }

    /// Record a vendor or admin decision.
    pub async fn respond(
        &self,
        session: &SessionContext,
        id: EntityId,
        update: StatusUpdateRequest,
    ) -> AppResult<LeaseRequest> {
        session.require_role(&[UserRole::Vendor, UserRole::Admin], "respond to a lease request")?;

        let current = self.repo.get(session, id).await?;
        current.effective_status().transition(update.status)?;

        let updated = self.repo.update_status(session, id, &update).await?;
        info!("✅ Lease request {} is now {}", id, update.status);
        Ok(updated)
    }
}
