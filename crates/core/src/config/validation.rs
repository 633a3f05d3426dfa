//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

const MAX_REFRESH_INTERVAL_SECS: u64 = 7 * 24 * 60 * 60;

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - any source or geocoding URL is empty or not http(s)
    /// - `refresh_interval_secs` is 0 or exceeds one week
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `user_agent` is empty
    /// - `geocode_concurrency` is 0 or exceeds 32
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, url) in [
            ("artists_url", &self.artists_url),
            ("locations_url", &self.locations_url),
            ("dates_url", &self.dates_url),
            ("relations_url", &self.relations_url),
            ("geocoding_url", &self.geocoding_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::Invalid { field: field.into(), reason: "must be an http(s) URL".into() });
            }
        }

        if self.refresh_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "refresh_interval_secs".into(),
                reason: "must be greater than 0".into(),
            });
        }
        if self.refresh_interval_secs > MAX_REFRESH_INTERVAL_SECS {
            return Err(ConfigError::Invalid {
                field: "refresh_interval_secs".into(),
                reason: "must not exceed one week".into(),
            });
        }

        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if self.geocode_concurrency == 0 || self.geocode_concurrency > 32 {
            return Err(ConfigError::Invalid {
                field: "geocode_concurrency".into(),
                reason: "must be between 1 and 32".into(),
            });
        }

        Ok(())
    }
}
