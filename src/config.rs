//! Runtime configuration read from the environment (and `.env`).
//!
//! - `CRM_DOMAIN_URL`: backend base URL (required)
//! - `CRM_USER_SUB`: identity subject pre-filled on the session screen
//! - `CRM_LOG_FILE`: log destination (default: `clinic-crm.log`)
//! - `CRM_REQUEST_TIMEOUT_SECS`: per-request timeout (default: `10`)

use crate::error::ConfigError;
use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_LOG_FILE: &str = "clinic-crm.log";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub domain_url: String,
    pub user_sub: Option<String>,
    pub log_file: PathBuf,
    pub request_timeout: Duration,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let domain_url = var("CRM_DOMAIN_URL").ok_or(ConfigError::Missing("CRM_DOMAIN_URL"))?;
        let domain_url = domain_url.trim().to_string();
        if !(domain_url.starts_with("http://") || domain_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                var: "CRM_DOMAIN_URL",
                reason: format!("'{domain_url}' is not an http(s) URL"),
            });
        }

        let timeout_secs: u64 = try_parse(
            "CRM_REQUEST_TIMEOUT_SECS",
            var("CRM_REQUEST_TIMEOUT_SECS"),
            DEFAULT_TIMEOUT_SECS,
        )?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                var: "CRM_REQUEST_TIMEOUT_SECS",
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            domain_url,
            user_sub: var("CRM_USER_SUB").map(|s| s.trim().to_string()),
            log_file: var("CRM_LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE)),
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn try_parse<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match raw {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var: key,
            reason: e.to_string(),
        }),
    }
}
