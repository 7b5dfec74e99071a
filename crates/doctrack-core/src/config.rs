//! Configuration module
//!
//! Client settings come from the environment (optionally a `.env` file).
//! Command-line flags override individual values after loading.

use std::env;
use std::time::Duration;

use crate::error::{AppError, AppResult};

const DEFAULT_API_URL: &str = "http://localhost:5000";
const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub request_timeout_secs: u64,
}

impl ClientConfig {
    /// Load from `DOCTRACK_*` variables, reading `.env` first.
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("DOCTRACK_API_URL")
            .or_else(|| lookup("API_URL"))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let request_timeout_secs = match lookup("DOCTRACK_REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                AppError::Config(
                    "DOCTRACK_REQUEST_TIMEOUT_SECS must be a valid number".to_string(),
                )
            })?,
            None => REQUEST_TIMEOUT_SECS,
        };

        let config = ClientConfig {
            api_url: normalize_api_url(&api_url)?,
            username: lookup("DOCTRACK_USERNAME").filter(|v| !v.trim().is_empty()),
            password: lookup("DOCTRACK_PASSWORD").filter(|v| !v.is_empty()),
            request_timeout_secs,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.request_timeout_secs == 0 {
            return Err(AppError::Config(
                "DOCTRACK_REQUEST_TIMEOUT_SECS must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn with_api_url(mut self, api_url: &str) -> AppResult<Self> {
        self.api_url = normalize_api_url(api_url)?;
        Ok(self)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_url", &self.api_url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

/// Trim trailing slashes and default to `http://` for `host:port` values.
pub fn normalize_api_url(raw: &str) -> AppResult<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(AppError::Config("API URL must not be empty".to_string()));
    }

    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(trimmed.to_string())
    } else if trimmed.contains("://") {
        Err(AppError::Config(format!(
            "Unsupported API URL scheme: {}",
            trimmed
        )))
    } else {
        Ok(format!("http://{}", trimmed))
    }
}
