//! Client construction errors.
//!
//! Per-request failures are reported through the core `FetchFailure` and
//! `GeocodeError` types; these cover building a client in the first place.

use std::sync::Arc;

#[derive(Debug, Clone, thiserror::Error)]
pub enum ClientError {
    /// The underlying HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Build(Arc<reqwest::Error>),

    /// Missing Mapbox access token.
    #[error("missing access token: GROUPIE_MAPBOX_ACCESS_TOKEN not set")]
    MissingAccessToken,

    /// A configured endpoint is not a valid URL.
    #[error("invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Build(Arc::new(err))
    }
}
