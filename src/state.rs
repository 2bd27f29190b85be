//! Shared application state
//!
//! Built once at startup and cloned into every handler. The backend
//! integration toggle decides which repository sits behind the facades.

use std::sync::Arc;

use tracing::info;

use crate::client::BackendClient;
use crate::config::environment::EnvironmentConfig;
use crate::repositories::{
    AccountRepository, HttpRepository, LeaseRequestRepository, LocalRepository, OtpRepository,
    QuotationRepository, VehicleRepository,
};
use crate::services::{
    AccountService, AuthService, DashboardService, LeaseRequestService, OtpService, QuotationService,
    SessionStore, VehicleLookupService,
};
use crate::store::LocalStore;
use crate::utils::errors::AppResult;
use crate::utils::jwt::JwtConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub auth: AuthService,
    pub otp: OtpService,
    pub accounts: AccountService,
    pub lease_requests: LeaseRequestService,
    pub quotations: QuotationService,
    pub vehicles: VehicleLookupService,
    pub dashboard: DashboardService,
    /// Present only when serving from the local store
    pub local_store: Option<LocalStore>,
}

impl AppState {
    pub async fn new(config: EnvironmentConfig) -> AppResult<Self> {
        if config.use_backend_api {
            let client = BackendClient::new(&config.backend_base_url, config.backend_timeout_secs)?;
            info!("🌐 Facades backed by {}", client.base_url());
            let repo = Arc::new(HttpRepository::new(client));
            Ok(Self::with_repository(config, repo, None))
        } else {
            let store = LocalStore::open(config.local_store_path.clone()).await?;
            store.seed_accounts(config.seed_test_credentials).await?;
            info!("💾 Facades backed by the local store");
            let repo = Arc::new(LocalRepository::new(store.clone()));
            Ok(Self::with_repository(config, repo, Some(store)))
        }
    }

    fn with_repository<R>(config: EnvironmentConfig, repo: Arc<R>, local_store: Option<LocalStore>) -> Self
    where
        R: LeaseRequestRepository
            + QuotationRepository
            + VehicleRepository
            + AccountRepository
            + OtpRepository
            + 'static,
    {
        let lease_repo: Arc<dyn LeaseRequestRepository> = repo.clone();
        let quotation_repo: Arc<dyn QuotationRepository> = repo.clone();
        let vehicle_repo: Arc<dyn VehicleRepository> = repo.clone();
        let account_repo: Arc<dyn AccountRepository> = repo.clone();
        let otp_repo: Arc<dyn OtpRepository> = repo;

        let issues_tokens = local_store.is_some();
        let auth = AuthService::new(
            account_repo.clone(),
            SessionStore::new(),
            JwtConfig::from(&config),
            issues_tokens,
        );
        let accounts = AccountService::new(account_repo);
        let quotations = QuotationService::new(quotation_repo, lease_repo.clone());
        let lease_requests = LeaseRequestService::new(lease_repo);
        let vehicles = VehicleLookupService::new(vehicle_repo);
        let dashboard = DashboardService::new(
            lease_requests.clone(),
            quotations.clone(),
            vehicles.clone(),
            accounts.clone(),
        );

        Self {
            config,
            auth,
            otp: OtpService::new(otp_repo),
            accounts,
            lease_requests,
            quotations,
            vehicles,
            dashboard,
            local_store,
        }
    }

    pub fn is_local(&self) -> bool {
        self.local_store.is_some()
    }
}
