//! JSON key/value store used when the backend integration is switched off
//!
//! Values are whole JSON documents under well-known keys, so the store can be
//! snapshotted to a single file and inspected by hand.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::models::{EntityId, UserRole};
use crate::utils::errors::{AppError, AppResult};

pub const LEASE_REQUESTS_KEY: &str = "lease_requests";
pub const QUOTATIONS_KEY: &str = "quotations";
pub const VENDOR_VEHICLES_KEY: &str = "vendor_vehicles";
pub const VENDOR_REGISTRATIONS_KEY: &str = "vendor_registrations";
pub const COMPANY_REGISTRATIONS_KEY: &str = "company_registrations";
pub const ADMIN_ACCOUNTS_KEY: &str = "admin_accounts";
pub const PENDING_SIGNUPS_KEY: &str = "pending_signups";
const ID_SEQUENCE_KEY: &str = "id_sequence";

/// bcrypt cost for locally stored passwords
pub const LOCAL_HASH_COST: u32 = 8;

pub const ADMIN_EMAIL: &str = "admin@leaseright.com";
const ADMIN_PASSWORD: &str = "Admin@123";
pub const TEST_VENDOR_EMAIL: &str = "vendor@test.com";
pub const TEST_COMPANY_EMAIL: &str = "company@test.com";
const TEST_PASSWORD: &str = "Test@123";

/// Registered account as the local store keeps it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LocalAccount {
    pub id: EntityId,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub gst_number: Option<String>,
    #[serde(default)]
    pub pan_number: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
    pub registered_at: DateTime<Utc>,
}

impl LocalAccount {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

/// Registrations list for a role
pub fn registrations_key(role: UserRole) -> &'static str {
    match role {
        UserRole::Vendor => VENDOR_REGISTRATIONS_KEY,
        UserRole::Company => COMPANY_REGISTRATIONS_KEY,
        UserRole::Admin => ADMIN_ACCOUNTS_KEY,
    }
}

#[derive(Clone, Default)]
pub struct LocalStore {
    entries: Arc<RwLock<HashMap<String, Value>>>,
    snapshot_path: Option<PathBuf>,
}

impl LocalStore {
    /// Empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a store backed by `path`, loading the previous snapshot if the
    /// file exists.
    pub async fn open(path: Option<PathBuf>) -> AppResult<Self> {
        let entries = match &path {
            Some(path) if tokio::fs::try_exists(path).await.unwrap_or(false) => {
                let raw = tokio::fs::read_to_string(path)
                    .await
                    .map_err(|e| AppError::Storage(format!("reading {}: {}", path.display(), e)))?;
                let entries: HashMap<String, Value> = serde_json::from_str(&raw)?;
                info!("📂 Local store loaded from {} ({} keys)", path.display(), entries.len());
                entries
            }
            Some(path) => {
                info!("📂 Local store will be created at {}", path.display());
                HashMap::new()
            }
            None => {
                info!("📂 Local store running in memory only");
                HashMap::new()
            }
        };

        Ok(Self {
            entries: Arc::new(RwLock::new(entries)),
            snapshot_path: path,
        })
    }

    /// Read the list stored under `key`, empty when absent
    pub async fn get_list<T: DeserializeOwned>(&self, key: &str) -> AppResult<Vec<T>> {
        let entries = self.entries.read().await;
        match entries.get(key) {
            Some(value) => {
                debug!("📥 Local store HIT: {}", key);
                Ok(serde_json::from_value(value.clone())?)
            }
            None => {
                debug!("❌ Local store MISS: {}", key);
                Ok(Vec::new())
            }
        }
    }

    pub async fn set_list<T: Serialize>(&self, key: &str, items: &[T]) -> AppResult<()> {
        let value = serde_json::to_value(items)?;
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), value);
        debug!("💾 Local store SET: {} ({} items)", key, items.len());
        self.persist(&entries).await
    }

    /// Read-modify-write the list under `key` while holding the write lock.
    /// Nothing is written back when `apply` fails.
    pub async fn update_list<T, R, F>(&self, key: &str, apply: F) -> AppResult<R>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut Vec<T>) -> AppResult<R>,
    {
        let mut entries = self.entries.write().await;
        let mut items: Vec<T> = match entries.get(key) {
            Some(value) => serde_json::from_value(value.clone())?,
            None => Vec::new(),
        };

        let result = apply(&mut items)?;

        entries.insert(key.to_string(), serde_json::to_value(&items)?);
        debug!("💾 Local store UPDATE: {} ({} items)", key, items.len());
        self.persist(&entries).await?;
        Ok(result)
    }

    /// Next value of the store-wide id sequence, starting at 1
    pub async fn next_id(&self) -> AppResult<EntityId> {
        let mut entries = self.entries.write().await;
        let next = entries
            .get(ID_SEQUENCE_KEY)
            .and_then(Value::as_i64)
            .unwrap_or(0)
            + 1;
        entries.insert(ID_SEQUENCE_KEY.to_string(), Value::from(next));
        self.persist(&entries).await?;
        Ok(next)
    }

    /// Seed the built-in admin and, when asked, the vendor/company test
    /// accounts. Accounts that already exist are left alone.
    pub async fn seed_accounts(&self, include_test_credentials: bool) -> AppResult<()> {
        let mut seeds = vec![(UserRole::Admin, ADMIN_EMAIL, ADMIN_PASSWORD, "System", "Admin", None)];
        if include_test_credentials {
            seeds.push((
                UserRole::Vendor,
                TEST_VENDOR_EMAIL,
                TEST_PASSWORD,
                "Test",
                "Vendor",
                Some("Test Vendor Company"),
            ));
            seeds.push((
                UserRole::Company,
                TEST_COMPANY_EMAIL,
                TEST_PASSWORD,
                "Test",
                "Company",
                Some("Test Company Ltd"),
            ));
        }

        for (role, email, password, first_name, last_name, company_name) in seeds {
            let key = registrations_key(role);
            let existing: Vec<LocalAccount> = self.get_list(key).await?;
            if existing.iter().any(|a| a.email == email) {
                debug!("⚠️ Seed account already present: {}", email);
                continue;
            }

            let password_hash = bcrypt::hash(password, LOCAL_HASH_COST)
                .map_err(|e| AppError::Hash(e.to_string()))?;
            let account = LocalAccount {
                id: self.next_id().await?,
                email: email.to_string(),
                password_hash,
                role,
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                company_name: company_name.map(str::to_string),
                phone_number: None,
                gst_number: None,
                pan_number: None,
                is_verified: true,
                registered_at: Utc::now(),
            };
            self.update_list(key, |accounts: &mut Vec<LocalAccount>| {
                accounts.push(account);
                Ok(())
            })
            .await?;
            info!("✅ Seeded {} account {}", role, email);
        }
        Ok(())
    }

    async fn persist(&self, entries: &HashMap<String, Value>) -> AppResult<()> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };
        let raw = serde_json::to_string_pretty(entries)?;
        if let Err(e) = tokio::fs::write(path, raw).await {
            warn!("⚠️ Local store snapshot failed for {}: {}", path.display(), e);
            return Err(AppError::Storage(format!("writing {}: {}", path.display(), e)));
        }
        Ok(())
    }
}
