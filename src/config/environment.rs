//! Environment configuration
//!
//! Reads the gateway settings from environment variables (a `.env` file is
//! loaded by `main` through dotenvy).

use std::env;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be a valid number, got '{1}'")]
    InvalidNumber(&'static str, String),

    #[error("{0} must be true or false, got '{1}'")]
    InvalidFlag(&'static str, String),

    #[error("JWT_SECRET must be set outside development")]
    MissingJwtSecret,
}

/// Gateway configuration
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub host: String,
    pub port: u16,
    /// Base URL of the external leasing backend
    pub backend_base_url: String,
    /// Integration toggle: `false` serves everything from the local store
    pub use_backend_api: bool,
    pub backend_timeout_secs: u64,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub cors_origins: Vec<String>,
    /// Where the local store snapshots itself, if anywhere
    pub local_store_path: Option<PathBuf>,
    /// Seed the local store with the vendor/company test accounts
    pub seed_test_credentials: bool,
    pub log_level: String,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            host: "0.0.0.0".to_string(),
            port: 3000,
            backend_base_url: "http://localhost:8080".to_string(),
            use_backend_api: true,
            backend_timeout_secs: 30,
            jwt_secret: "lease_portal_development_secret".to_string(),
            jwt_expiration: 86_400,
            cors_origins: Vec::new(),
            local_store_path: None,
            seed_test_credentials: false,
            log_level: "debug".to_string(),
        }
    }
}

impl EnvironmentConfig {
    /// Build the configuration from the process environment, falling back to
    /// development defaults for anything that is not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let environment = env::var("ENVIRONMENT").unwrap_or(defaults.environment);
        let is_dev = environment == "development";

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ if is_dev => defaults.jwt_secret,
            _ => return Err(ConfigError::MissingJwtSecret),
        };

        Ok(Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_number("PORT", defaults.port)?,
            backend_base_url: env::var("BACKEND_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.backend_base_url),
            use_backend_api: parse_flag("USE_BACKEND_API", defaults.use_backend_api)?,
            backend_timeout_secs: parse_number("BACKEND_TIMEOUT_SECS", defaults.backend_timeout_secs)?,
            jwt_secret,
            jwt_expiration: parse_number("JWT_EXPIRATION", defaults.jwt_expiration)?,
            cors_origins: env::var("CORS_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            local_store_path: env::var("LOCAL_STORE_PATH").ok().map(PathBuf::from),
            seed_test_credentials: parse_flag("SEED_TEST_CREDENTIALS", is_dev)?,
            log_level: env::var("LOG_LEVEL")
                .unwrap_or_else(|_| (if is_dev { "debug" } else { "info" }).to_string()),
            environment,
        })
    }

    /// Local-store configuration used by tests and offline demos
    pub fn local() -> Self {
        Self {
            use_backend_api: false,
            seed_test_credentials: true,
            ..Self::default()
        }
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber(key, raw)),
        Err(_) => Ok(default),
    }
}

fn parse_flag(key: &'static str, default: bool) -> Result<bool, ConfigError> {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidFlag(key, raw)),
        },
        Err(_) => Ok(default),
    }
}
