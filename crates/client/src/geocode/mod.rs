//! Mapbox geocoding client.
//!
//! Resolves free-text concert locations (e.g. `north_carolina-usa`) to
//! coordinates for artist details.
//!
//! ### Specification
//!
//! - **Endpoint**: `https://api.mapbox.com/geocoding/v5/mapbox.places/{address}.json`
//! - **Authentication**: `access_token` query parameter.
//! - **Result**: the first feature's `center`, which is `[longitude, latitude]`.
//! - **Failures**: every failure is a miss for that address; callers drop it.

pub mod cache;
pub mod response;

pub use cache::CachedGeocoder;
pub use response::{Feature, FeatureCollection};

use async_trait::async_trait;
use groupie_core::{AppConfig, GeoLocation, GeocodeError, Geocoder};
use reqwest::{StatusCode, header};
use std::time::Duration;
use url::Url;

use crate::error::ClientError;

/// Default Mapbox forward-geocoding endpoint.
const DEFAULT_BASE_URL: &str = "https://api.mapbox.com/geocoding/v5/mapbox.places";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Mapbox client configuration.
#[derive(Debug, Clone)]
pub struct MapboxConfig {
    /// Access token from GROUPIE_MAPBOX_ACCESS_TOKEN.
    pub access_token: String,
    /// Base URL (default: https://api.mapbox.com/geocoding/v5/mapbox.places).
    pub base_url: String,
    /// Request timeout (default: 10s).
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for MapboxConfig {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: "groupie/0.1".to_string(),
        }
    }
}

impl MapboxConfig {
    /// Build from application config. Fails if no access token is configured.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, ClientError> {
        let access_token = config
            .require_mapbox_access_token()
            .map_err(|_| ClientError::MissingAccessToken)?;

        Ok(Self {
            access_token: access_token.to_string(),
            base_url: config.geocoding_url.clone(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
        })
    }
}

/// Mapbox forward-geocoding client.
#[derive(Debug, Clone)]
pub struct MapboxGeocoder {
    http: reqwest::Client,
    base_url: Url,
    access_token: String,
}

impl MapboxGeocoder {
    /// Create a new Mapbox geocoder with the given configuration.
    pub fn new(config: MapboxConfig) -> Result<Self, ClientError> {
        if config.access_token.trim().is_empty() {
            return Err(ClientError::MissingAccessToken);
        }

        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ClientError::InvalidUrl { url: config.base_url.clone(), reason: e.to_string() })?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl { url: config.base_url, reason: "cannot be a base URL".into() });
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self { http, base_url, access_token: config.access_token })
    }

    /// Request URL for `address`: the address becomes one escaped path segment.
    fn endpoint(&self, address: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&format!("{address}.json"));
        }
        url.query_pairs_mut().append_pair("access_token", &self.access_token);
        url
    }
}

fn transport_failure(err: reqwest::Error) -> GeocodeError {
    if err.is_timeout() { GeocodeError::Timeout } else { GeocodeError::Transport(err.to_string()) }
}

#[async_trait]
impl Geocoder for MapboxGeocoder {
    async fn geocode(&self, address: &str) -> Result<GeoLocation, GeocodeError> {
        tracing::debug!(address, "geocoding via Mapbox");

        let response = self
            .http
            .get(self.endpoint(address))
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(transport_failure)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(GeocodeError::Status(status.as_u16()));
        }

        let bytes = response.bytes().await.map_err(transport_failure)?;
        let collection: FeatureCollection =
            serde_json::from_slice(&bytes).map_err(|e| GeocodeError::Decode(e.to_string()))?;

        collection.into_location(address)
    }
}
