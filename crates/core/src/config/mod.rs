//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (GROUPIE_*)
//! 2. TOML config file (if GROUPIE_CONFIG_FILE set)
//! 3. Built-in defaults

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::cache::RefreshPolicy;

mod validation;

pub use validation::ConfigError;

const DEFAULT_API_BASE: &str = "https://groupietrackers.herokuapp.com/api";

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (GROUPIE_*)
/// 2. TOML config file (if GROUPIE_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Artists source URL.
    ///
    /// Set via GROUPIE_ARTISTS_URL environment variable.
    #[serde(default = "default_artists_url")]
    pub artists_url: String,

    /// Locations source URL.
    #[serde(default = "default_locations_url")]
    pub locations_url: String,

    /// Dates source URL.
    #[serde(default = "default_dates_url")]
    pub dates_url: String,

    /// Relations source URL.
    #[serde(default = "default_relations_url")]
    pub relations_url: String,

    /// How long a fetched snapshot is served before the next read refreshes it.
    ///
    /// Set via GROUPIE_REFRESH_INTERVAL_SECS environment variable.
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,

    /// Per-request HTTP timeout in milliseconds, for upstream and geocoding calls.
    ///
    /// Set via GROUPIE_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// User-Agent string for HTTP requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Whether concurrent callers share one refresh (`single_flight`) or each
    /// run their own (`independent`).
    ///
    /// Set via GROUPIE_REFRESH_POLICY environment variable.
    #[serde(default)]
    pub refresh_policy: RefreshPolicy,

    /// Mapbox access token for geocoding concert locations.
    ///
    /// Set via GROUPIE_MAPBOX_ACCESS_TOKEN environment variable.
    /// Without it, artist details carry no coordinates.
    #[serde(default)]
    pub mapbox_access_token: Option<String>,

    /// Mapbox geocoding endpoint.
    #[serde(default = "default_geocoding_url")]
    pub geocoding_url: String,

    /// Geocoder calls in flight per artist detail request.
    #[serde(default = "default_geocode_concurrency")]
    pub geocode_concurrency: usize,

    /// How long a resolved address is remembered, in seconds.
    #[serde(default = "default_geocode_cache_ttl_secs")]
    pub geocode_cache_ttl_secs: u64,
}

fn default_artists_url() -> String {
    format!("{DEFAULT_API_BASE}/artists")
}

fn default_locations_url() -> String {
    format!("{DEFAULT_API_BASE}/locations")
}

fn default_dates_url() -> String {
    format!("{DEFAULT_API_BASE}/dates")
}

fn default_relations_url() -> String {
    format!("{DEFAULT_API_BASE}/relation")
}

fn default_refresh_interval_secs() -> u64 {
    3600
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_user_agent() -> String {
    "groupie/0.1".into()
}

fn default_geocoding_url() -> String {
    "https://api.mapbox.com/geocoding/v5/mapbox.places".into()
}

fn default_geocode_concurrency() -> usize {
    4
}

fn default_geocode_cache_ttl_secs() -> u64 {
    24 * 60 * 60
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            artists_url: default_artists_url(),
            locations_url: default_locations_url(),
            dates_url: default_dates_url(),
            relations_url: default_relations_url(),
            refresh_interval_secs: default_refresh_interval_secs(),
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
            refresh_policy: RefreshPolicy::default(),
            mapbox_access_token: None,
            geocoding_url: default_geocoding_url(),
            geocode_concurrency: default_geocode_concurrency(),
            geocode_cache_ttl_secs: default_geocode_cache_ttl_secs(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn geocode_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.geocode_cache_ttl_secs)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `GROUPIE_`
    /// 2. TOML file from `GROUPIE_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("GROUPIE_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("GROUPIE_")
                .ignore(&["config_file"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        Self::from_figment(figment)
    }

    fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Mapbox token, required only when geocoding is wired up.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the token is not set or blank.
    pub fn require_mapbox_access_token(&self) -> Result<&str, ConfigError> {
        self.mapbox_access_token
            .as_deref()
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| ConfigError::Missing {
                field: "mapbox_access_token".into(),
                hint: "Set GROUPIE_MAPBOX_ACCESS_TOKEN environment variable".into(),
            })
    }
}
