//! Repositories backed by the external leasing backend

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{
    AccountRepository, AuthenticatedUser, LeaseRequestRepository, OtpRepository, QuotationRepository,
    VehicleRepository,
};
use crate::client::{parse_json_text, BackendClient};
use crate::config::api_endpoints::{self, replace_url_params};
use crate::dto::auth_dto::{BackendLoginResponse, BackendVerifyOtp, LoginRequest, SignupRequest};
use crate::dto::lease_request_dto::{LeaseRequestPayload, StatusUpdateRequest};
use crate::dto::quotation_dto::QuotationPayload;
use crate::dto::user_dto::{AddUserRequest, UpdateUserRequest};
use crate::dto::vehicle_dto::VehicleLookupQuery;
use crate::models::{
    EntityId, LeaseRequest, Quotation, RequestStatus, SavedVehicle, SessionContext, UserProfile,
    UserRole, VehicleDetails,
};
use crate::utils::errors::{AppError, AppResult};

#[derive(Clone)]
pub struct HttpRepository {
    client: BackendClient,
}

impl HttpRepository {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    fn path(template: &str, id: EntityId) -> String {
        replace_url_params(template, &[("id", &id.to_string())])
    }

    /// Use the record in `text` when the backend echoed one, otherwise read
    /// it back with `GET refetch_path`.
    async fn parse_or_refetch<T: DeserializeOwned>(
        &self,
        text: &str,
        refetch_path: &str,
        token: &str,
    ) -> AppResult<T> {
        match serde_json::from_str::<T>(text) {
            Ok(record) => Ok(record),
            Err(_) => {
                debug!("🔁 Backend answered without a record, reading {}", refetch_path);
                self.client.get_json(refetch_path, Some(token)).await
            }
        }
    }
}

#[async_trait]
impl LeaseRequestRepository for HttpRepository {
    async fn create(&self, session: &SessionContext, payload: &LeaseRequestPayload) -> AppResult<String> {
        info!("📝 Creating lease request for company {}", payload.company_id);
        let message = self
            .client
            .post_text(api_endpoints::lease_request::CREATE, payload, Some(&session.token))
            .await?;
        info!("✅ Lease request created via backend");
        Ok(message)
    }

    async fn update(
        &self,
        session: &SessionContext,
        id: EntityId,
        payload: &LeaseRequestPayload,
    ) -> AppResult<LeaseRequest> {
        let path = Self::path(api_endpoints::lease_request::UPDATE, id);
        let text = self.client.put_text(&path, Some(payload), Some(&session.token)).await?;
        let refetch = Self::path(api_endpoints::lease_request::GET_BY_ID, id);
        self.parse_or_refetch(&text, &refetch, &session.token).await
    }

    async fn get(&self, session: &SessionContext, id: EntityId) -> AppResult<LeaseRequest> {
        let path = Self::path(api_endpoints::lease_request::GET_BY_ID, id);
        self.client.get_json(&path, Some(&session.token)).await
    }

    async fn list_by_company(&self, session: &SessionContext, company_id: EntityId) -> AppResult<Vec<LeaseRequest>> {
        let path = replace_url_params(
            api_endpoints::lease_request::GET_BY_COMPANY,
            &[("companyId", &company_id.to_string())],
        );
        let requests: Vec<LeaseRequest> = self.client.get_json(&path, Some(&session.token)).await?;
        debug!("📥 {} lease requests for company {}", requests.len(), company_id);
        Ok(requests)
    }

    async fn list_pending_for_vendor(
        &self,
        session: &SessionContext,
        vendor_id: EntityId,
    ) -> AppResult<Vec<LeaseRequest>> {
        let path = replace_url_params(
            api_endpoints::lease_request::GET_PENDING_FOR_VENDOR,
            &[("vendorId", &vendor_id.to_string())],
        );
        self.client.get_json(&path, Some(&session.token)).await
    }

    async fn list_all(&self, session: &SessionContext) -> AppResult<Vec<LeaseRequest>> {
        self.client
            .get_json(api_endpoints::lease_request::GET_ALL, Some(&session.token))
            .await
    }

    async fn update_status(
        &self,
        session: &SessionContext,
        id: EntityId,
        update: &StatusUpdateRequest,
    ) -> AppResult<LeaseRequest> {
        let path = Self::path(api_endpoints::lease_request::UPDATE_STATUS, id);
        let text = self.client.put_text(&path, Some(update), Some(&session.token)).await?;
        let refetch = Self::path(api_endpoints::lease_request::GET_BY_ID, id);
        self.parse_or_refetch(&text, &refetch, &session.token).await
    }
}

#[async_trait]
impl QuotationRepository for HttpRepository {
    async fn create(&self, session: &SessionContext, payload: &QuotationPayload) -> AppResult<Quotation> {
        info!(
            "📝 Submitting quotation for lease request {} (vendor {})",
            payload.lease_request_id, payload.vendor_id
        );
        let text = self
            .client
            .post_text(api_endpoints::quotation::CREATE, payload, Some(&session.token))
            .await?;

        match serde_json::from_str::<Quotation>(&text) {
            Ok(quotation) => Ok(quotation),
            Err(_) => {
                debug!("🔁 Quotation create answered with text: {}", text.trim());
                Ok(payload.clone().into_quotation(None, None))
            }
        }
    }

    async fn get(&self, session: &SessionContext, id: EntityId) -> AppResult<Quotation> {
        let path = Self::path(api_endpoints::quotation::GET_BY_ID, id);
        self.client.get_json(&path, Some(&session.token)).await
    }

    async fn list_by_vendor(&self, session: &SessionContext, vendor_id: EntityId) -> AppResult<Vec<Quotation>> {
        let path = replace_url_params(
            api_endpoints::quotation::GET_BY_VENDOR,
            &[("vendorId", &vendor_id.to_string())],
        );
        self.client.get_json(&path, Some(&session.token)).await
    }

    async fn list_by_company(&self, session: &SessionContext, company_id: EntityId) -> AppResult<Vec<Quotation>> {
        let path = replace_url_params(
            api_endpoints::quotation::GET_BY_COMPANY,
            &[("companyId", &company_id.to_string())],
        );
        self.client.get_json(&path, Some(&session.token)).await
    }

    async fn set_status(
        &self,
        session: &SessionContext,
        id: EntityId,
        status: RequestStatus,
    ) -> AppResult<Quotation> {
        let template = match status {
            RequestStatus::Approved => api_endpoints::quotation::APPROVE,
            RequestStatus::Rejected => api_endpoints::quotation::REJECT,
            RequestStatus::Pending => {
                return Err(AppError::InvalidInput(
                    "A quotation can only be approved or rejected".to_string(),
                ))
            }
        };
        let path = Self::path(template, id);
        let text = self
            .client
            .put_text::<Value>(&path, None, Some(&session.token))
            .await?;
        let refetch = Self::path(api_endpoints::quotation::GET_BY_ID, id);
        self.parse_or_refetch(&text, &refetch, &session.token).await
    }

    async fn download_pdf(&self, session: &SessionContext, id: EntityId) -> AppResult<Vec<u8>> {
        let path = Self::path(api_endpoints::quotation::DOWNLOAD_PDF, id);
        self.client.get_bytes(&path, Some(&session.token)).await
    }
}

#[async_trait]
impl VehicleRepository for HttpRepository {
    async fn lookup(
        &self,
        session: &SessionContext,
        registration_number: &str,
        owner_name: &str,
    ) -> AppResult<VehicleDetails> {
        let query = VehicleLookupQuery {
            reg_no: registration_number.to_string(),
            owner_name: owner_name.to_string(),
        };
        let text = self
            .client
            .get_text_with_query(api_endpoints::vehicle::LOOKUP, &query, Some(&session.token))
            .await?;
        let response: Value = parse_json_text(&text)?;
        Ok(VehicleDetails::from_registry(registration_number, owner_name, &response))
    }

    async fn save(
        &self,
        session: &SessionContext,
        vendor_id: EntityId,
        details: &VehicleDetails,
    ) -> AppResult<SavedVehicle> {
        let record = SavedVehicle {
            id: None,
            vendor_id: Some(vendor_id),
            details: details.clone(),
            saved_at: None,
        };
        let text = self
            .client
            .post_text(api_endpoints::vehicle::SAVE, &record, Some(&session.token))
            .await?;
        Ok(serde_json::from_str::<SavedVehicle>(&text).unwrap_or(record))
    }

    async fn list_by_vendor(&self, session: &SessionContext, vendor_id: EntityId) -> AppResult<Vec<SavedVehicle>> {
        let path = Self::path(api_endpoints::vehicle::GET_BY_VENDOR, vendor_id);
        self.client.get_json(&path, Some(&session.token)).await
    }
}

#[async_trait]
impl AccountRepository for HttpRepository {
    async fn login(&self, credentials: &LoginRequest) -> AppResult<AuthenticatedUser> {
        let response: BackendLoginResponse = self
            .client
            .post_json(api_endpoints::auth::LOGIN, credentials, None)
            .await?;

        let token = response
            .token
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| AppError::ExternalApi("Login response did not include a token".to_string()))?;

        let mut profile = response.user.unwrap_or_default();
        if let Some(role) = response.user_role.as_deref() {
            match role.parse::<UserRole>() {
                Ok(role) => profile.role = Some(role),
                Err(e) => warn!("⚠️ Ignoring login role: {}", e),
            }
        }
        if profile.name.is_none() {
            profile.name = response.user_name;
        }
        if profile.email.is_none() {
            profile.email = Some(credentials.email.clone());
        }

        Ok(AuthenticatedUser {
            token: Some(token),
            profile,
        })
    }

    async fn get_user(&self, session: &SessionContext, id: EntityId) -> AppResult<UserProfile> {
        let path = Self::path(api_endpoints::auth::GET_USER_BY_ID, id);
        self.client.get_json(&path, Some(&session.token)).await
    }

    async fn update_user(
        &self,
        session: &SessionContext,
        id: EntityId,
        update: &UpdateUserRequest,
    ) -> AppResult<UserProfile> {
        let path = Self::path(api_endpoints::auth::UPDATE_USER_BY_ID, id);
        let text = self.client.put_text(&path, Some(update), Some(&session.token)).await?;
        let refetch = Self::path(api_endpoints::auth::GET_USER_BY_ID, id);
        self.parse_or_refetch(&text, &refetch, &session.token).await
    }

    async fn add_user(&self, session: &SessionContext, user: &AddUserRequest) -> AppResult<UserProfile> {
        let text = self
            .client
            .post_text(api_endpoints::auth::ADD_USER, user, Some(&session.token))
            .await?;
        Ok(serde_json::from_str::<UserProfile>(&text).unwrap_or_else(|_| UserProfile {
            name: Some(user.name.clone()),
            email: Some(user.email.clone()),
            role: Some(user.role),
            contact_number: user.contact_number.clone(),
            company_name: user.company_name.clone(),
            ..UserProfile::default()
        }))
    }

    async fn list_users(&self, session: &SessionContext) -> AppResult<Vec<UserProfile>> {
        self.client
            .get_json(api_endpoints::auth::GET_ALL_USERS, Some(&session.token))
            .await
    }
}

#[async_trait]
impl OtpRepository for HttpRepository {
    async fn signup(&self, form: &SignupRequest) -> AppResult<String> {
        info!("📧 Starting OTP signup for {}", form.email);
        self.client.post_text(api_endpoints::otp::SIGNUP, form, None).await
    }

    async fn verify(&self, email: &str, otp: &str) -> AppResult<String> {
        let body = BackendVerifyOtp { mail: email, otp };
        self.client.post_text(api_endpoints::otp::VERIFY, &body, None).await
    }

    async fn resend(&self, email: &str) -> AppResult<String> {
        self.client
            .get_text_with_query(api_endpoints::otp::RESEND, &[("mail", email)], None)
            .await
    }
}
