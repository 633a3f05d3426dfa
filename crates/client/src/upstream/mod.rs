//! Upstream tour-data client.
//!
//! Fetches the four datasets a snapshot is built from over plain HTTP GET.
//!
//! ### Specification
//!
//! - **Endpoints**: `https://groupietrackers.herokuapp.com/api/{artists,locations,dates,relation}`
//! - **Authentication**: none.
//! - **Payloads**: JSON; the per-artist sources are wrapped as `{"index": [...]}`.
//! - **Failures**: anything other than 200 OK, a timeout, a transport error or an
//!   undecodable body fails that dataset. Nothing is retried here.

pub mod response;

pub use response::IndexEnvelope;

use async_trait::async_trait;
use groupie_core::{AppConfig, Artist, DataSource, Dataset, DateRecord, FetchFailure, LocationRecord, RelationRecord};
use reqwest::{StatusCode, header};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use url::Url;

use crate::error::ClientError;

/// Default base URL for the tour-data API.
const DEFAULT_BASE_URL: &str = "https://groupietrackers.herokuapp.com/api";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "groupie/0.1";

/// Upstream client configuration.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub artists_url: String,
    pub locations_url: String,
    pub dates_url: String,
    pub relations_url: String,
    /// Request timeout (default: 10s).
    pub timeout: Duration,
    /// User-agent string (default: groupie/0.x).
    pub user_agent: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            artists_url: format!("{DEFAULT_BASE_URL}/artists"),
            locations_url: format!("{DEFAULT_BASE_URL}/locations"),
            dates_url: format!("{DEFAULT_BASE_URL}/dates"),
            relations_url: format!("{DEFAULT_BASE_URL}/relation"),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl From<&AppConfig> for UpstreamConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            artists_url: config.artists_url.clone(),
            locations_url: config.locations_url.clone(),
            dates_url: config.dates_url.clone(),
            relations_url: config.relations_url.clone(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
        }
    }
}

impl UpstreamConfig {
    fn url(&self, dataset: Dataset) -> &str {
        match dataset {
            Dataset::Artists => &self.artists_url,
            Dataset::Locations => &self.locations_url,
            Dataset::Dates => &self.dates_url,
            Dataset::Relations => &self.relations_url,
        }
    }
}

/// HTTP client for the four upstream datasets.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    config: UpstreamConfig,
}

impl UpstreamClient {
    /// Create a new upstream client with the given configuration.
    pub fn new(config: UpstreamConfig) -> Result<Self, ClientError> {
        for dataset in Dataset::ALL {
            let url = config.url(dataset);
            Url::parse(url).map_err(|e| ClientError::InvalidUrl { url: url.to_string(), reason: e.to_string() })?;
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &UpstreamConfig {
        &self.config
    }

    /// Fetch one dataset and decode its records.
    async fn fetch<T: DeserializeOwned>(&self, dataset: Dataset) -> Result<Vec<T>, FetchFailure> {
        let url = self.config.url(dataset);
        let start = Instant::now();

        tracing::debug!(source = %dataset, url, "fetching dataset");

        let response = self
            .http
            .get(url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(transport_failure)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchFailure::Status(status.as_u16()));
        }

        let bytes = response.bytes().await.map_err(transport_failure)?;
        let records = serde_json::from_slice::<IndexEnvelope<T>>(&bytes)
            .map_err(|e| FetchFailure::Decode(e.to_string()))?
            .into_records();

        tracing::debug!(
            source = %dataset,
            records = records.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "dataset fetched"
        );

        Ok(records)
    }
}

fn transport_failure(err: reqwest::Error) -> FetchFailure {
    if err.is_timeout() { FetchFailure::Timeout } else { FetchFailure::Transport(err.to_string()) }
}

#[async_trait]
impl DataSource for UpstreamClient {
    async fn artists(&self) -> Result<Vec<Artist>, FetchFailure> {
        self.fetch(Dataset::Artists).await
    }

    async fn locations(&self) -> Result<Vec<LocationRecord>, FetchFailure> {
        self.fetch(Dataset::Locations).await
    }

    async fn dates(&self) -> Result<Vec<DateRecord>, FetchFailure> {
        self.fetch(Dataset::Dates).await
    }

    async fn relations(&self) -> Result<Vec<RelationRecord>, FetchFailure> {
        self.fetch(Dataset::Relations).await
    }
}


#[cfg(test)]
mod tests {
    use super::testing::serve;
    use super::*;

    fn client_for(base: &str, timeout: Duration) -> UpstreamClient {
        UpstreamClient::new(UpstreamConfig {
            artists_url: format!("{base}/artists"),
            locations_url: format!("{base}/locations"),
            dates_url: format!("{base}/dates"),
            relations_url: format!("{base}/relation"),
            timeout,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = UpstreamConfig::default();
        assert_eq!(config.artists_url, "https://groupietrackers.herokuapp.com/api/artists");
        assert_eq!(config.url(Dataset::Relations), "https://groupietrackers.herokuapp.com/api/relation");
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_config_from_app_config() {
        let app = AppConfig { dates_url: "http://localhost:9000/dates".into(), timeout_ms: 2500, ..Default::default() };
        let config = UpstreamConfig::from(&app);
        assert_eq!(config.dates_url, "http://localhost:9000/dates");
        assert_eq!(config.timeout, Duration::from_millis(2500));
        assert_eq!(config.user_agent, "groupie/0.1");
    }

    #[test]
    fn test_client_new_invalid_url() {
        let config = UpstreamConfig { locations_url: "not a url".into(), ..Default::default() };
        let result = UpstreamClient::new(config);
        assert!(matches!(result, Err(ClientError::InvalidUrl { url, .. }) if url == "not a url"));
    }

    #[tokio::test]
    async fn test_fetch_wrapped_dates() {
        let base = serve("200 OK", r#"{"index":[{"id":1,"dates":["23-08-2019"]}]}"#, Duration::ZERO).await;
        let client = client_for(&base, Duration::from_secs(5));

        let dates = client.dates().await.unwrap();
        assert_eq!(dates.len(), 1);
        assert_eq!(dates[0].dates, vec!["23-08-2019"]);
    }

    #[tokio::test]
    async fn test_fetch_non_ok_status() {
        let base = serve("503 Service Unavailable", "{}", Duration::ZERO).await;
        let client = client_for(&base, Duration::from_secs(5));

        assert_eq!(client.artists().await.unwrap_err(), FetchFailure::Status(503));
    }

    #[tokio::test]
    async fn test_fetch_undecodable_body() {
        let base = serve("200 OK", "<html>oops</html>", Duration::ZERO).await;
        let client = client_for(&base, Duration::from_secs(5));

        assert!(matches!(client.relations().await, Err(FetchFailure::Decode(_))));
    }

    #[tokio::test]
    async fn test_fetch_timeout() {
        let base = serve("200 OK", "[]", Duration::from_secs(2)).await;
        let client = client_for(&base, Duration::from_millis(200));

        assert_eq!(client.locations().await.unwrap_err(), FetchFailure::Timeout);
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_for(&format!("http://{addr}"), Duration::from_secs(5));
        assert!(matches!(client.artists().await, Err(FetchFailure::Transport(_))));
    }
}
