use std::{env, fmt::Display, str::FromStr, time::Duration};

use tracing::{info, warn};

use crate::error::AppError;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const FETCH_PATH: &str = "/myorders/fetch";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub request_timeout: Duration,
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        let api_url: String = try_load("ORDERS_API_URL", DEFAULT_API_URL)?;
        let timeout_ms: u64 = try_load("ORDERS_TIMEOUT_MS", "5000")?;

        Ok(Self {
            request_timeout: Duration::from_millis(timeout_ms),
            ..Self::with_api_url(api_url)
        })
    }

    pub fn with_api_url(api_url: impl AsRef<str>) -> Self {
        Self {
            api_url: api_url.as_ref().trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    pub fn fetch_endpoint(&self) -> String {
        format!("{}{FETCH_PATH}", self.api_url)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(5),
        }
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T, AppError>
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e: T::Err| {
            warn!("Invalid {key} value: {e}");

            AppError::Config {
                key: key.to_string(),
                reason: e.to_string(),
            }
        })
}
