//! Dashboard summaries
//!
//! Each summary is assembled from the other facades, fetching concurrently.

use serde::Serialize;

use super::{AccountService, LeaseRequestService, QuotationService, VehicleLookupService};
use crate::models::{QuotationSummary, RequestStatus, SessionContext, StatusCounts, UserProfile, UserRole};
use crate::utils::errors::AppResult;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDashboard {
    pub lease_requests: StatusCounts,
    pub quotations: StatusCounts,
    pub expiring_soon: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VendorDashboard {
    pub requests_to_quote: usize,
    pub quotations: StatusCounts,
    pub expiring_soon: usize,
    pub saved_vehicles: usize,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboard {
    pub total_users: usize,
    pub vendors: usize,
    pub companies: usize,
    pub admins: usize,
    pub unverified: usize,
}

impl AdminDashboard {
    pub fn from_users(users: &[UserProfile]) -> Self {
        users.iter().fold(Self::default(), |mut acc, user| {
            acc.total_users += 1;
            match user.role {
                Some(UserRole::Vendor) => acc.vendors += 1,
                Some(UserRole::Company) => acc.companies += 1,
                Some(UserRole::Admin) => acc.admins += 1,
                None => {}
            }
            if user.is_verified == Some(false) {
                acc.unverified += 1;
            }
            acc
        })
    }
}

/// Status counts plus how many undecided quotations expire within a week
fn quotation_counts(summaries: &[QuotationSummary]) -> (StatusCounts, usize) {
    let counts = StatusCounts::tally(summaries.iter().map(|s| s.quotation.status));
    let expiring = summaries
        .iter()
        .filter(|s| s.expiring_soon && s.quotation.effective_status() == RequestStatus::Pending)
        .count();
    (counts, expiring)
}

#[derive(Clone)]
pub struct DashboardService {
    lease_requests: LeaseRequestService,
    quotations: QuotationService,
    vehicles: VehicleLookupService,
    accounts: AccountService,
}

impl DashboardService {
    pub fn new(
        lease_requests: LeaseRequestService,
        quotations: QuotationService,
        vehicles: VehicleLookupService,
        accounts: AccountService,
    ) -> Self {
        Self {
            lease_requests,
            quotations,
            vehicles,
            accounts,
        }
    }

    pub async fn company(&self, session: &SessionContext) -> AppResult<CompanyDashboard> {
        session.require_role(&[UserRole::Company], "view the company dashboard")?;
        let company_id = session.user_id;

        let (lease_requests, summaries) = futures::try_join!(
            self.lease_requests.stats_for_company(session, company_id),
            self.quotations.summaries_for_company(session, company_id),
        )?;
        let (quotations, expiring_soon) = quotation_counts(&summaries);

        Ok(CompanyDashboard {
            lease_requests,
            quotations,
            expiring_soon,
        })
    }

    pub async fn vendor(&self, session: &SessionContext) -> AppResult<VendorDashboard> {
        session.require_role(&[UserRole::Vendor], "view the vendor dashboard")?;
        let vendor_id = session.user_id;

        let (open_requests, summaries, vehicles) = futures::try_join!(
            self.lease_requests.list_pending_for_vendor(session, vendor_id),
            self.quotations.summaries_for_vendor(session, vendor_id),
            self.vehicles.list_saved(session, vendor_id),
        )?;
        let (quotations, expiring_soon) = quotation_counts(&summaries);

        Ok(VendorDashboard {
            requests_to_quote: open_requests.len(),
            quotations,
            expiring_soon,
            saved_vehicles: vehicles.len(),
        })
    }

    pub async fn admin(&self, session: &SessionContext) -> AppResult<AdminDashboard> {
        let users = self.accounts.list_users(session).await?;
        Ok(AdminDashboard::from_users(&users))
    }
}
