//! Quotation facade
//!
//! Vendors submit quotations against lease requests; the owning company (or
//! an admin) approves or rejects them once. Lists come back with derived
//! totals and expiry flags, filtered and paged for the dashboards.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::info;
use validator::Validate;

use crate::dto::quotation_dto::{QuotationForm, QuotationQuery};
use crate::models::{
    EntityId, Quotation, QuotationSummary, RequestStatus, SessionContext, UserRole,
};
use crate::repositories::{LeaseRequestRepository, QuotationRepository};
use crate::utils::errors::{forbidden_error, AppError, AppResult};
use crate::utils::pagination::{paginate, Page};

/// A rendered quotation document
#[derive(Debug, Clone)]
pub struct QuotationPdf {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
pub struct QuotationService {
    repo: Arc<dyn QuotationRepository>,
    lease_requests: Arc<dyn LeaseRequestRepository>,
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

impl QuotationService {
    pub fn new(repo: Arc<dyn QuotationRepository>, lease_requests: Arc<dyn LeaseRequestRepository>) -> Self {
        Self { repo, lease_requests }
    }

    /// The quotation is addressed to the company owning the lease request,
    /// which must still be open.
    pub async fn submit(&self, session: &SessionContext, form: QuotationForm) -> AppResult<QuotationSummary> {
        session.require_role(&[UserRole::Vendor], "submit a quotation")?;
        form.validate()?;

        let request = self.lease_requests.get(session, form.lease_request_id).await?;
        if !request.is_pending() {
            return Err(AppError::Conflict(format!(
                "Lease request is already {} and no longer accepts quotations",
                request.effective_status()
            )));
        }

        let vendor_name = session
            .company_name
            .clone()
            .unwrap_or_else(|| session.display_name.clone());
        let payload = form.into_payload(session.user_id, vendor_name, request.company_id);
        let quotation = self.repo.create(session, &payload).await?;

        info!(
            "📝 Quotation submitted by vendor {} for lease request {}",
            session.user_id, quotation.lease_request_id
        );
        Ok(QuotationSummary::new(quotation, today()))
    }

    pub async fn approve(&self, session: &SessionContext, id: EntityId) -> AppResult<QuotationSummary> {
        self.decide(session, id, RequestStatus::Approved).await
    }

    pub async fn reject(&self, session: &SessionContext, id: EntityId) -> AppResult<QuotationSummary> {
        self.decide(session, id, RequestStatus::Rejected).await
    }

    /// Single transition out of pending; a second decision is a conflict.
    async fn decide(
        &self,
        session: &SessionContext,
        id: EntityId,
        status: RequestStatus,
    ) -> AppResult<QuotationSummary> {
        session.require_role(&[UserRole::Company, UserRole::Admin], "decide on a quotation")?;

        let current = self.repo.get(session, id).await?;
        if session.role == UserRole::Company && self.owner_of(session, &current).await? != session.user_id {
            return Err(forbidden_error(
                "decide on this quotation",
                "it was sent to another company",
            ));
        }
        current.effective_status().transition(status)?;

        let updated = self.repo.set_status(session, id, status).await?;
        info!("✅ Quotation {} {}", id, status);
        Ok(QuotationSummary::new(updated, today()))
    }

    pub async fn get(&self, session: &SessionContext, id: EntityId) -> AppResult<QuotationSummary> {
        let quotation = self.repo.get(session, id).await?;
        self.check_visibility(session, &quotation).await?;
        Ok(QuotationSummary::new(quotation, today()))
    }

    pub async fn list_by_vendor(
        &self,
        session: &SessionContext,
        vendor_id: EntityId,
        query: &QuotationQuery,
    ) -> AppResult<Page<QuotationSummary>> {
        session.require_vendor_scope(vendor_id, "list quotations")?;
        let quotations = self.repo.list_by_vendor(session, vendor_id).await?;
        Ok(search(summarize(quotations, today()), query))
    }

    pub async fn list_by_company(
        &self,
        session: &SessionContext,
        company_id: EntityId,
        query: &QuotationQuery,
    ) -> AppResult<Page<QuotationSummary>> {
        session.require_company_scope(company_id, "list quotations")?;
        let quotations = self.repo.list_by_company(session, company_id).await?;
        Ok(search(summarize(quotations, today()), query))
    }

    /// Unfiltered summaries, used by the dashboards
    pub async fn summaries_for_company(
        &self,
        session: &SessionContext,
        company_id: EntityId,
    ) -> AppResult<Vec<QuotationSummary>> {
        session.require_company_scope(company_id, "list quotations")?;
        let quotations = self.repo.list_by_company(session, company_id).await?;
        Ok(summarize(quotations, today()))
    }

    pub async fn summaries_for_vendor(
        &self,
        session: &SessionContext,
        vendor_id: EntityId,
    ) -> AppResult<Vec<QuotationSummary>> {
        session.require_vendor_scope(vendor_id, "list quotations")?;
        let quotations = self.repo.list_by_vendor(session, vendor_id).await?;
        Ok(summarize(quotations, today()))
    }

    pub async fn download_pdf(&self, session: &SessionContext, id: EntityId) -> AppResult<QuotationPdf> {
        let quotation = self.repo.get(session, id).await?;
        self.check_visibility(session, &quotation).await?;

        let bytes = self.repo.download_pdf(session, id).await?;
        info!("📄 Quotation {} PDF fetched ({} bytes)", id, bytes.len());
        Ok(QuotationPdf {
            filename: format!("quotation-{}.pdf", id),
            bytes,
        })
    }

    /// Company the quotation is addressed to, read from its lease request
    /// when the record does not carry one.
    async fn owner_of(&self, session: &SessionContext, quotation: &Quotation) -> AppResult<EntityId> {
        match quotation.company_id {
            Some(company_id) => Ok(company_id),
            None => Ok(self
                .lease_requests
                .get(session, quotation.lease_request_id)
                .await?
                .company_id),
        }
    }

    async fn check_visibility(&self, session: &SessionContext, quotation: &Quotation) -> AppResult<()> {
        let visible = match session.role {
            UserRole::Admin => true,
            UserRole::Vendor => quotation.vendor_id == session.user_id,
            UserRole::Company => self.owner_of(session, quotation).await? == session.user_id,
        };
        if visible {
            Ok(())
        } else {
            Err(forbidden_error("view this quotation", "it belongs to another account"))
        }
    }
}

pub fn summarize(quotations: Vec<Quotation>, today: NaiveDate) -> Vec<QuotationSummary> {
    quotations
        .into_iter()
        .map(|q| QuotationSummary::new(q, today))
        .collect()
}

/// Case-insensitive search over id, vendor name, lease request id and
/// quotation number, then status filter, then paging.
pub fn search(summaries: Vec<QuotationSummary>, query: &QuotationQuery) -> Page<QuotationSummary> {
    let needle = query
        .search
        .as_deref()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());

    let filtered = summaries
        .into_iter()
        .filter(|s| match &needle {
            Some(needle) => matches_search(&s.quotation, needle),
            None => true,
        })
        .filter(|s| match query.status {
            Some(status) => s.quotation.effective_status() == status,
            None => true,
        })
        .collect();

    paginate(filtered, query.page, query.per_page)
}

fn matches_search(quotation: &Quotation, needle: &str) -> bool {
    let id = quotation.id.map(|id| id.to_string()).unwrap_or_default();
    let request_id = quotation.lease_request_id.to_string();
    let vendor = quotation.vendor_name.as_deref().unwrap_or_default().to_lowercase();
    let number = quotation
        .quotation_number
        .as_deref()
        .unwrap_or_default()
        .to_lowercase();

    id.contains(needle) || request_id.contains(needle) || vendor.contains(needle) || number.contains(needle)
}
