//! Login, logout and session resolution
//!
//! Sessions live in a token-keyed store inside the gateway. Each request
//! resolves its bearer token to a [`SessionContext`] once; nothing about the
//! caller is kept in globals.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use validator::Validate;

use crate::dto::auth_dto::{LoginRequest, LoginResponse};
use crate::models::{SessionContext, UserProfile};
use crate::repositories::AccountRepository;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::jwt::{generate_token, verify_token, JwtConfig};

const SESSION_EXPIRED: &str = "Your session has expired. Please log in again.";

/// A resolved session and when it stops being valid
#[derive(Clone, Debug)]
pub struct StoredSession {
    pub context: SessionContext,
    pub expires_at: DateTime<Utc>,
}

impl StoredSession {
    pub fn new(context: SessionContext, expires_in_secs: u64) -> Self {
        Self {
            context,
            expires_at: Utc::now() + Duration::seconds(expires_in_secs as i64),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

/// Token-keyed session table shared by all requests
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, StoredSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, context: SessionContext, expires_in_secs: u64) {
        let token = context.token.clone();
        let mut sessions = self.sessions.write().await;
        sessions.insert(token, StoredSession::new(context, expires_in_secs));
        debug!("💾 Session stored, {} active", sessions.len());
    }

    /// Live session for `token`; an expired entry is dropped on the way.
    pub async fn get(&self, token: &str) -> Option<SessionContext> {
        {
            let sessions = self.sessions.read().await;
            match sessions.get(token) {
                Some(session) if !session.is_expired() => return Some(session.context.clone()),
                Some(_) => {}
                None => return None,
            }
        }
        self.sessions.write().await.remove(token);
        debug!("⌛ Dropped expired session");
        None
    }

    pub async fn revoke(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }

    pub async fn cleanup_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired());
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[derive(Clone)]
pub struct AuthService {
    repo: Arc<dyn AccountRepository>,
    sessions: SessionStore,
    jwt: JwtConfig,
    /// Set in local mode, where the gateway signs its own tokens
    issues_tokens: bool,
}

impl AuthService {
    pub fn new(
        repo: Arc<dyn AccountRepository>,
        sessions: SessionStore,
        jwt: JwtConfig,
        issues_tokens: bool,
    ) -> Self {
        Self {
            repo,
            sessions,
            jwt,
            issues_tokens,
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub async fn login(&self, credentials: LoginRequest) -> AppResult<LoginResponse> {
        credentials.validate()?;

        let authenticated = self.repo.login(&credentials).await?;
        let profile = authenticated.profile;

        let role = profile
            .role
            .ok_or_else(|| AppError::ExternalApi("Login response did not include a user role".to_string()))?;
        let user_id = profile
            .id
            .ok_or_else(|| AppError::ExternalApi("Login response did not include a user id".to_string()))?;
        let email = profile.email.clone().unwrap_or_else(|| credentials.email.clone());
        let display_name = profile
            .name
            .clone()
            .or_else(|| profile.company_name.clone())
            .unwrap_or_else(|| email.clone());

        let token = match authenticated.token {
            Some(token) => token,
            None => generate_token(user_id, role, &display_name, &email, &self.jwt)?,
        };

        let context = SessionContext {
            token: token.clone(),
            user_id,
            role,
            display_name: display_name.clone(),
            email,
            company_name: profile.company_name.clone(),
        };
        self.sessions.insert(context, self.jwt.expiration).await;
        info!("✅ {} logged in as {}", display_name, role);

        Ok(LoginResponse {
            success: true,
            token,
            user: profile,
            user_role: role,
            user_name: display_name,
        })
    }

    pub async fn logout(&self, token: &str) -> bool {
        let removed = self.sessions.revoke(token).await;
        if removed {
            info!("👋 Session closed");
        }
        removed
    }

    /// Resolve a bearer token into the caller's session.
    pub async fn resolve(&self, token: &str) -> AppResult<SessionContext> {
        let Some(context) = self.sessions.get(token).await else {
            return Err(AppError::Unauthorized(SESSION_EXPIRED.to_string()));
        };

        if self.issues_tokens {
            if let Err(e) = verify_token(token, &self.jwt) {
                warn!("⚠️ Rejecting stored session: {}", e);
                self.sessions.revoke(token).await;
                return Err(AppError::Unauthorized(SESSION_EXPIRED.to_string()));
            }
        }
        Ok(context)
    }

    /// Drop every trace of the session after the backend refused it.
    pub async fn revoke(&self, token: &str) {
        if self.sessions.revoke(token).await {
            warn!("🔒 Session revoked after an unauthorized response");
        }
    }

    pub fn me(&self, session: &SessionContext) -> UserProfile {
        UserProfile::from(session)
    }
}
