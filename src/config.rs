use std::time::Duration;

use crate::authz::AuthzMode;
use crate::errors::AppError;

const DEFAULT_DATABASE_URL: &str = "sqlite://carelink-session.db";
const DEFAULT_API_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub api_base_url: Option<String>,
    pub api_timeout: Duration,
    pub authz_mode: AuthzMode,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any variable source; `from_env` passes the process env.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let api_base_url = lookup("API_BASE_URL")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty());

        let api_timeout_secs = lookup("API_TIMEOUT_SECS")
            .map(|val| val.trim().parse::<u64>())
            .unwrap_or(Ok(DEFAULT_API_TIMEOUT_SECS))
            .map_err(|_| AppError::configuration("API_TIMEOUT_SECS must be a valid integer"))?;

        let authz_mode = match lookup("AUTHZ_MODE") {
            Some(value) => AuthzMode::parse(&value)?,
            None => AuthzMode::default(),
        };

        Ok(Self {
            database_url,
            api_base_url,
            api_timeout: Duration::from_secs(api_timeout_secs),
            authz_mode,
        })
    }

    pub fn require_api_base_url(&self) -> Result<&str, AppError> {
        self.api_base_url
            .as_deref()
            .ok_or_else(|| AppError::configuration("API_BASE_URL not set"))
    }
}
