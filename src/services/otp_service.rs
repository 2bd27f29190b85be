//! Three step OTP signup: start, verify, resend
//!
//! The gateway remembers which email/role pair is mid-signup so a verify or
//! resend for anything else is refused before the backend sees it.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tracing::{info, warn};
use validator::Validate;

use crate::dto::auth_dto::{ResendOtpRequest, SignupRequest, VerifyOtpRequest};
use crate::models::UserRole;
use crate::repositories::OtpRepository;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::normalize_email;

const OTP_SESSION_EXPIRED: &str = "OTP session expired. Please sign up again.";
const OTP_REQUIRED: &str = "Please enter the OTP.";
const RESEND_SESSION_EXPIRED: &str = "Session expired. Please sign up again.";

/// How long a signup waits for its code; a resend restarts the clock
pub const OTP_SESSION_TTL_SECS: u64 = 15 * 60;

#[derive(Debug, Clone)]
struct PendingOtp {
    role: UserRole,
    expires_at: DateTime<Utc>,
}

impl PendingOtp {
    fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

#[derive(Clone)]
pub struct OtpService {
    repo: Arc<dyn OtpRepository>,
    /// normalized email -> signup waiting for its code
    pending: Arc<RwLock<HashMap<String, PendingOtp>>>,
    ttl_secs: u64,
}

impl OtpService {
    pub fn new(repo: Arc<dyn OtpRepository>) -> Self {
        Self::with_ttl(repo, OTP_SESSION_TTL_SECS)
    }

    pub fn with_ttl(repo: Arc<dyn OtpRepository>, ttl_secs: u64) -> Self {
        Self {
            repo,
            pending: Arc::new(RwLock::new(HashMap::new())),
            ttl_secs,
        }
    }

    fn expiry(&self) -> DateTime<Utc> {
        Utc::now() + Duration::seconds(self.ttl_secs as i64)
    }

    pub async fn start(&self, form: SignupRequest) -> AppResult<String> {
        form.validate()?;

        let message = self.repo.signup(&form).await?;
        let entry = PendingOtp {
            role: form.role,
            expires_at: self.expiry(),
        };
        self.pending.write().await.insert(normalize_email(&form.email), entry);
        info!("📧 OTP signup started for {} ({})", form.email, form.role);
        Ok(message)
    }

    /// Live pending entry for `email`; an expired one is dropped on sight.
    async fn live_entry(&self, email: &str) -> Option<PendingOtp> {
        let mut pending = self.pending.write().await;
        let expired = pending.get(email)?.is_expired();
        if expired {
            pending.remove(email);
            warn!("⏰ OTP session for {} expired", email);
            return None;
        }
        pending.get(email).cloned()
    }

    pub async fn verify(&self, request: VerifyOtpRequest) -> AppResult<String> {
        let email = normalize_email(&request.email);
        let matches = self
            .live_entry(&email)
            .await
            .is_some_and(|entry| entry.role == request.role);
        if !matches {
            warn!("⚠️ OTP verify without a matching signup for {}", email);
            return Err(AppError::InvalidInput(OTP_SESSION_EXPIRED.to_string()));
        }

        let otp = request.otp.trim();
        if otp.is_empty() {
            return Err(AppError::InvalidInput(OTP_REQUIRED.to_string()));
        }

        let message = self.repo.verify(&email, otp).await?;
        self.pending.write().await.remove(&email);
        info!("✅ OTP verified for {}", email);
        Ok(message)
    }

    pub async fn resend(&self, request: ResendOtpRequest) -> AppResult<String> {
        let email = normalize_email(&request.email);
        if self.live_entry(&email).await.is_none() {
            return Err(AppError::InvalidInput(RESEND_SESSION_EXPIRED.to_string()));
        }

        let message = self.repo.resend(&email).await?;
        let expires_at = self.expiry();
        if let Some(entry) = self.pending.write().await.get_mut(&email) {
            entry.expires_at = expires_at;
        }
        info!("📧 OTP resent to {}", email);
        Ok(message)
    }

    pub async fn is_pending(&self, email: &str) -> bool {
        self.pending
            .read()
            .await
            .get(&normalize_email(email))
            .is_some_and(|entry| !entry.is_expired())
    }

    /// Drop abandoned signups, returning how many were removed
    pub async fn cleanup_expired(&self) -> usize {
        let mut pending = self.pending.write().await;
        let before = pending.len();
        pending.retain(|_, entry| !entry.is_expired());
        before - pending.len()
    }
}
