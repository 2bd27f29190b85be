//! Users and request-scoped sessions

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use super::EntityId;
use crate::utils::errors::{forbidden_error, AppError, AppResult};

/// Marketplace roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Company,
    Vendor,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Company => "company",
            UserRole::Vendor => "vendor",
            UserRole::Admin => "admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "company" => Ok(UserRole::Company),
            "vendor" => Ok(UserRole::Vendor),
            "admin" => Ok(UserRole::Admin),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// User as the backend returns it. Only `id` and `role` matter to the
/// facades; the rest is carried through for the account screens.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Option<EntityId>,
    pub name: Option<String>,
    #[serde(alias = "mail")]
    pub email: Option<String>,
    pub role: Option<UserRole>,
    pub contact_number: Option<String>,
    pub company_name: Option<String>,
    pub gst_number: Option<String>,
    pub pan_number: Option<String>,
    pub is_verified: Option<bool>,
}

/// Who is calling, resolved once per request from the bearer token and
/// passed into every facade call.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionContext {
    pub token: String,
    pub user_id: EntityId,
    pub role: UserRole,
    pub display_name: String,
    pub email: String,
    pub company_name: Option<String>,
}

impl SessionContext {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Fail with 403 unless the caller has one of `roles`.
    pub fn require_role(&self, roles: &[UserRole], operation: &str) -> AppResult<()> {
        if roles.contains(&self.role) {
            return Ok(());
        }
        let allowed = roles
            .iter()
            .map(UserRole::as_str)
            .collect::<Vec<_>>()
            .join(" or ");
        Err(forbidden_error(operation, &format!("requires the {} role", allowed)))
    }

    /// Companies only see their own data; admins see everything.
    pub fn require_company_scope(&self, company_id: EntityId, operation: &str) -> AppResult<()> {
        match self.role {
            UserRole::Admin => Ok(()),
            UserRole::Company if self.user_id == company_id => Ok(()),
            _ => Err(forbidden_error(operation, "company scope mismatch")),
        }
    }

    /// Vendors only see their own data; admins see everything.
    pub fn require_vendor_scope(&self, vendor_id: EntityId, operation: &str) -> AppResult<()> {
        match self.role {
            UserRole::Admin => Ok(()),
            UserRole::Vendor if self.user_id == vendor_id => Ok(()),
            _ => Err(forbidden_error(operation, "vendor scope mismatch")),
        }
    }
}

impl From<&SessionContext> for UserProfile {
    fn from(session: &SessionContext) -> Self {
        Self {
            id: Some(session.user_id),
            name: Some(session.display_name.clone()),
            email: Some(session.email.clone()),
            role: Some(session.role),
            company_name: session.company_name.clone(),
            ..Self::default()
        }
    }
}

/// Map `AppError::Forbidden` for handlers that want a bare bool.
pub fn is_forbidden(err: &AppError) -> bool {
    matches!(err, AppError::Forbidden(_))
}
