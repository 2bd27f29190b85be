//! Accounts and OTP signup against the local store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::local_repository::LocalRepository;
use super::{AccountRepository, AuthenticatedUser, OtpRepository};
use crate::dto::auth_dto::{LoginRequest, SignupRequest};
use crate::dto::user_dto::{AddUserRequest, UpdateUserRequest};
use crate::models::{EntityId, SessionContext, UserProfile, UserRole};
use crate::store::local_store::{
    registrations_key, LocalAccount, LOCAL_HASH_COST, PENDING_SIGNUPS_KEY,
};
use crate::utils::errors::{not_found_error, AppError, AppResult};
use crate::utils::validation::normalize_email;

const INVALID_CREDENTIALS: &str = "Invalid email or password. Please try again.";
const EMAIL_TAKEN: &str = "This email is already registered. Please use a different email.";
const ALL_ROLES: [UserRole; 3] = [UserRole::Admin, UserRole::Vendor, UserRole::Company];

/// Registration waiting for its OTP
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingSignup {
    pub email: String,
    pub role: UserRole,
    pub first_name: String,
    pub last_name: String,
    pub company_name: String,
    pub password_hash: String,
    pub phone_number: Option<String>,
    pub gst_number: Option<String>,
    pub pan_number: Option<String>,
    pub otp: String,
    pub created_at: DateTime<Utc>,
}

impl From<&LocalAccount> for UserProfile {
    fn from(account: &LocalAccount) -> Self {
        Self {
            id: Some(account.id),
            name: Some(account.display_name()),
            email: Some(account.email.clone()),
            role: Some(account.role),
            contact_number: account.phone_number.clone(),
            company_name: account.company_name.clone(),
            gst_number: account.gst_number.clone(),
            pan_number: account.pan_number.clone(),
            is_verified: Some(account.is_verified),
        }
    }
}

impl From<&PendingSignup> for UserProfile {
    fn from(pending: &PendingSignup) -> Self {
        Self {
            id: None,
            name: Some(format!("{} {}", pending.first_name, pending.last_name)),
            email: Some(pending.email.clone()),
            role: Some(pending.role),
            contact_number: pending.phone_number.clone(),
            company_name: Some(pending.company_name.clone()),
            gst_number: pending.gst_number.clone(),
            pan_number: pending.pan_number.clone(),
            is_verified: Some(false),
        }
    }
}

fn generate_otp() -> String {
    format!("{:06}", rand::thread_rng().gen_range(0..1_000_000))
}

fn hash_password(password: &str) -> AppResult<String> {
    bcrypt::hash(password, LOCAL_HASH_COST).map_err(|e| AppError::Hash(e.to_string()))
}

fn split_name(name: &str) -> (String, String) {
    let name = name.trim();
    match name.split_once(char::is_whitespace) {
        Some((first, last)) => (first.to_string(), last.trim().to_string()),
        None => (name.to_string(), String::new()),
    }
}

impl LocalRepository {
    async fn all_accounts(&self) -> AppResult<Vec<LocalAccount>> {
        let mut accounts = Vec::new();
        for role in ALL_ROLES {
            accounts.extend(self.store.get_list::<LocalAccount>(registrations_key(role)).await?);
        }
        Ok(accounts)
    }

    async fn find_account_by_email(&self, email: &str) -> AppResult<Option<LocalAccount>> {
        let email = normalize_email(email);
        Ok(self
            .all_accounts()
            .await?
            .into_iter()
            .find(|a| normalize_email(&a.email) == email))
    }

    async fn find_account_by_id(&self, id: EntityId) -> AppResult<LocalAccount> {
        self.all_accounts()
            .await?
            .into_iter()
            .find(|a| a.id == id)
            .ok_or_else(|| not_found_error("User", id))
    }

    async fn ensure_email_free(&self, email: &str) -> AppResult<()> {
        if self.find_account_by_email(email).await?.is_some() {
            return Err(AppError::Conflict(EMAIL_TAKEN.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl AccountRepository for LocalRepository {
    async fn login(&self, credentials: &LoginRequest) -> AppResult<AuthenticatedUser> {
        let Some(account) = self.find_account_by_email(&credentials.email).await? else {
            warn!("⚠️ Local login for unknown email {}", credentials.email);
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        let matches = bcrypt::verify(&credentials.password, &account.password_hash)
            .map_err(|e| AppError::Hash(e.to_string()))?;
        if !matches {
            warn!("⚠️ Local login with wrong password for {}", account.email);
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        info!("✅ Local login for {} ({})", account.email, account.role);
        Ok(AuthenticatedUser {
            token: None,
            profile: UserProfile::from(&account),
        })
    }

    async fn get_user(&self, _session: &SessionContext, id: EntityId) -> AppResult<UserProfile> {
        Ok(UserProfile::from(&self.find_account_by_id(id).await?))
    }

    async fn update_user(
        &self,
        _session: &SessionContext,
        id: EntityId,
        update: &UpdateUserRequest,
    ) -> AppResult<UserProfile> {
        let role = self.find_account_by_id(id).await?.role;
        self.store
            .update_list(registrations_key(role), |accounts: &mut Vec<LocalAccount>| {
                let account = accounts
                    .iter_mut()
                    .find(|a| a.id == id)
                    .ok_or_else(|| not_found_error("User", id))?;

                if let Some(name) = &update.name {
                    let (first, last) = split_name(name);
                    account.first_name = first;
                    account.last_name = last;
                }
                if let Some(contact) = &update.contact_number {
                    account.phone_number = Some(contact.clone());
                }
                if let Some(company) = &update.company_name {
                    account.company_name = Some(company.clone());
                }
                if let Some(gst) = &update.gst_number {
                    account.gst_number = Some(gst.to_uppercase());
                }
                if let Some(pan) = &update.pan_number {
                    account.pan_number = Some(pan.to_uppercase());
                }
                Ok(UserProfile::from(&*account))
            })
            .await
    }

    async fn add_user(&self, _session: &SessionContext, user: &AddUserRequest) -> AppResult<UserProfile> {
        self.ensure_email_free(&user.email).await?;

        let (first_name, last_name) = split_name(&user.name);
        let account = LocalAccount {
            id: self.store.next_id().await?,
            email: normalize_email(&user.email),
            password_hash: hash_password(&user.password)?,
            role: user.role,
            first_name,
            last_name,
            company_name: user.company_name.clone(),
            phone_number: user.contact_number.clone(),
            gst_number: None,
            pan_number: None,
            is_verified: true,
            registered_at: Utc::now(),
        };
        let profile = UserProfile::from(&account);

        self.store
            .update_list(registrations_key(user.role), |accounts: &mut Vec<LocalAccount>| {
                accounts.push(account);
                Ok(())
            })
            .await?;

        info!("✅ User {} added as {} (local store)", user.email, user.role);
        Ok(profile)
    }

    async fn list_users(&self, _session: &SessionContext) -> AppResult<Vec<UserProfile>> {
        let mut users: Vec<UserProfile> = self.all_accounts().await?.iter().map(UserProfile::from).collect();
        let pending: Vec<PendingSignup> = self.store.get_list(PENDING_SIGNUPS_KEY).await?;
        users.extend(pending.iter().map(UserProfile::from));
        Ok(users)
    }
}

#[async_trait]
impl OtpRepository for LocalRepository {
    async fn signup(&self, form: &SignupRequest) -> AppResult<String> {
        self.ensure_email_free(&form.email).await?;

        let email = normalize_email(&form.email);
        let pending = PendingSignup {
            email: email.clone(),
            role: form.role,
            first_name: form.first_name.trim().to_string(),
            last_name: form.last_name.trim().to_string(),
            company_name: form.company_name.trim().to_string(),
            password_hash: hash_password(&form.password)?,
            phone_number: form.phone_number.clone(),
            gst_number: form.gst_number.as_ref().map(|g| g.to_uppercase()),
            pan_number: form.pan_number.as_ref().map(|p| p.to_uppercase()),
            otp: generate_otp(),
            created_at: Utc::now(),
        };
        info!("📧 OTP for {} is {} (local store)", email, pending.otp);

        self.store
            .update_list(PENDING_SIGNUPS_KEY, |signups: &mut Vec<PendingSignup>| {
                signups.retain(|s| s.email != email);
                signups.push(pending);
                Ok(())
            })
            .await?;

        Ok("OTP sent to your email".to_string())
    }

    async fn verify(&self, email: &str, otp: &str) -> AppResult<String> {
        let email = normalize_email(email);
        let otp = otp.trim();

        let pending = self
            .store
            .update_list(PENDING_SIGNUPS_KEY, |signups: &mut Vec<PendingSignup>| {
                let index = signups
                    .iter()
                    .position(|s| s.email == email)
                    .ok_or_else(|| AppError::NotFound("Session expired. Please sign up again.".to_string()))?;
                if signups[index].otp != otp {
                    return Err(AppError::InvalidInput("Invalid OTP. Please try again.".to_string()));
                }
                Ok(signups.remove(index))
            })
            .await?;

        let account = LocalAccount {
            id: self.store.next_id().await?,
            email: pending.email,
            password_hash: pending.password_hash,
            role: pending.role,
            first_name: pending.first_name,
            last_name: pending.last_name,
            company_name: Some(pending.company_name),
            phone_number: pending.phone_number,
            gst_number: pending.gst_number,
            pan_number: pending.pan_number,
            is_verified: true,
            registered_at: Utc::now(),
        };
        let role = account.role;
        self.store
            .update_list(registrations_key(role), |accounts: &mut Vec<LocalAccount>| {
                accounts.push(account);
                Ok(())
            })
            .await?;

        info!("✅ {} account {} verified (local store)", role, email);
        Ok("OTP verified successfully! Account created.".to_string())
    }

    async fn resend(&self, email: &str) -> AppResult<String> {
        let email = normalize_email(email);
        let code = self
            .store
            .update_list(PENDING_SIGNUPS_KEY, |signups: &mut Vec<PendingSignup>| {
                let signup = signups
                    .iter_mut()
                    .find(|s| s.email == email)
                    .ok_or_else(|| AppError::NotFound("Session expired. Please sign up again.".to_string()))?;
                signup.otp = generate_otp();
                Ok(signup.otp.clone())
            })
            .await?;

        info!("📧 New OTP for {} is {} (local store)", email, code);
        Ok("A new OTP has been sent to your email.".to_string())
    }
}
