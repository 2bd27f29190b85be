//! Transport seams for the facades
//!
//! Each trait has two implementations chosen at startup by the backend
//! integration toggle: [`HttpRepository`] talks to the external backend and
//! [`LocalRepository`] works against the [`LocalStore`](crate::store::LocalStore).

pub mod http_repository;
pub mod local_accounts;
pub mod local_repository;

use async_trait::async_trait;

use crate::dto::auth_dto::{LoginRequest, SignupRequest};
use crate::dto::lease_request_dto::{LeaseRequestPayload, StatusUpdateRequest};
use crate::dto::quotation_dto::QuotationPayload;
use crate::dto::user_dto::{AddUserRequest, UpdateUserRequest};
use crate::models::{
    EntityId, LeaseRequest, Quotation, RequestStatus, SavedVehicle, SessionContext, UserProfile,
    VehicleDetails,
};
use crate::utils::errors::AppResult;

pub use http_repository::HttpRepository;
pub use local_repository::LocalRepository;

#[async_trait]
pub trait LeaseRequestRepository: Send + Sync {
    /// Returns the confirmation text to show the company
    async fn create(&self, session: &SessionContext, payload: &LeaseRequestPayload) -> AppResult<String>;
    async fn update(
        &self,
        session: &SessionContext,
        id: EntityId,
        payload: &LeaseRequestPayload,
    ) -> AppResult<LeaseRequest>;
    async fn get(&self, session: &SessionContext, id: EntityId) -> AppResult<LeaseRequest>;
    async fn list_by_company(&self, session: &SessionContext, company_id: EntityId) -> AppResult<Vec<LeaseRequest>>;
    /// Pending requests the vendor has not quoted yet
    async fn list_pending_for_vendor(
        &self,
        session: &SessionContext,
        vendor_id: EntityId,
    ) -> AppResult<Vec<LeaseRequest>>;
    async fn list_all(&self, session: &SessionContext) -> AppResult<Vec<LeaseRequest>>;
    async fn update_status(
        &self,
        session: &SessionContext,
        id: EntityId,
        update: &StatusUpdateRequest,
    ) -> AppResult<LeaseRequest>;
}

#[async_trait]
pub trait QuotationRepository: Send + Sync {
    async fn create(&self, session: &SessionContext, payload: &QuotationPayload) -> AppResult<Quotation>;
    async fn get(&self, session: &SessionContext, id: EntityId) -> AppResult<Quotation>;
    async fn list_by_vendor(&self, session: &SessionContext, vendor_id: EntityId) -> AppResult<Vec<Quotation>>;
    async fn list_by_company(&self, session: &SessionContext, company_id: EntityId) -> AppResult<Vec<Quotation>>;
    /// Approve or reject
    async fn set_status(
        &self,
        session: &SessionContext,
        id: EntityId,
        status: RequestStatus,
    ) -> AppResult<Quotation>;
    async fn download_pdf(&self, session: &SessionContext, id: EntityId) -> AppResult<Vec<u8>>;
}

#[async_trait]
pub trait VehicleRepository: Send + Sync {
    async fn lookup(
        &self,
        session: &SessionContext,
        registration_number: &str,
        owner_name: &str,
    ) -> AppResult<VehicleDetails>;
    async fn save(
        &self,
        session: &SessionContext,
        vendor_id: EntityId,
        details: &VehicleDetails,
    ) -> AppResult<SavedVehicle>;
    async fn list_by_vendor(&self, session: &SessionContext, vendor_id: EntityId) -> AppResult<Vec<SavedVehicle>>;
}

/// Result of a successful credential check
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// Backend-issued token; `None` when the gateway must mint one
    pub token: Option<String>,
    pub profile: UserProfile,
}

#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn login(&self, credentials: &LoginRequest) -> AppResult<AuthenticatedUser>;
    async fn get_user(&self, session: &SessionContext, id: EntityId) -> AppResult<UserProfile>;
    async fn update_user(
        &self,
        session: &SessionContext,
        id: EntityId,
        update: &UpdateUserRequest,
    ) -> AppResult<UserProfile>;
    async fn add_user(&self, session: &SessionContext, user: &AddUserRequest) -> AppResult<UserProfile>;
    async fn list_users(&self, session: &SessionContext) -> AppResult<Vec<UserProfile>>;
}

/// Signup verification by one-time password
#[async_trait]
pub trait OtpRepository: Send + Sync {
    async fn signup(&self, form: &SignupRequest) -> AppResult<String>;
    async fn verify(&self, email: &str, otp: &str) -> AppResult<String>;
    async fn resend(&self, email: &str) -> AppResult<String>;
}
