//! Artist detail assembly.
//!
//! Joins one artist with its location, date and relation records and
//! geocodes each concert location. Locations that fail to resolve are left
//! out; they never fail the assembly.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future;
use futures::stream::{self, StreamExt};

use crate::model::{ArtistDetail, GeoLocation};
use crate::snapshot::Snapshot;

/// Default number of geocoder calls in flight per detail request.
pub const DEFAULT_GEOCODE_CONCURRENCY: usize = 4;

/// Why an address could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeocodeError {
    /// The geocoder returned no features for the address.
    #[error("no match for address: {0}")]
    NoMatch(String),

    /// Geocoding is not configured.
    #[error("geocoding unavailable: {0}")]
    Unavailable(String),

    /// HTTP error response.
    #[error("geocoding returned status {0}")]
    Status(u16),

    /// Request timeout.
    #[error("geocoding request timed out")]
    Timeout,

    /// Network error.
    #[error("geocoding request failed: {0}")]
    Transport(String),

    /// Response parse error.
    #[error("malformed geocoding response: {0}")]
    Decode(String),
}

/// Resolves a free-text address to coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &str) -> Result<GeoLocation, GeocodeError>;
}

#[async_trait]
impl<G: Geocoder + ?Sized> Geocoder for Arc<G> {
    async fn geocode(&self, address: &str) -> Result<GeoLocation, GeocodeError> {
        (**self).geocode(address).await
    }
}

/// Geocoder used when no access token is configured; every address misses.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledGeocoder;

#[async_trait]
impl Geocoder for DisabledGeocoder {
    async fn geocode(&self, _address: &str) -> Result<GeoLocation, GeocodeError> {
        Err(GeocodeError::Unavailable("no access token configured".into()))
    }
}

/// Builds [`ArtistDetail`] values from a snapshot.
pub struct DetailAssembler<G> {
    geocoder: G,
    concurrency: usize,
}

impl<G: Geocoder> DetailAssembler<G> {
    pub fn new(geocoder: G) -> Self {
        Self { geocoder, concurrency: DEFAULT_GEOCODE_CONCURRENCY }
    }

    /// Cap concurrent geocoder calls per assembly (minimum 1).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn geocoder(&self) -> &G {
        &self.geocoder
    }

    /// Assemble the detail view for `id`, or `None` if no such artist exists.
    ///
    /// Resolved locations keep the order of the artist's location list.
    pub async fn assemble(&self, snapshot: &Snapshot, id: u32) -> Option<ArtistDetail> {
        let artist = snapshot.artist(id)?;

        let locations: Vec<GeoLocation> = stream::iter(snapshot.locations_for(id).iter().cloned())
            .map(|address| self.resolve(id, address))
            .buffered(self.concurrency)
            .filter_map(future::ready)
            .collect()
            .await;

        Some(ArtistDetail {
            artist: artist.clone(),
            locations,
            dates: snapshot.dates_for(id).to_vec(),
            relations: snapshot.relations_for(id).cloned().unwrap_or_default(),
        })
    }

    async fn resolve(&self, id: u32, address: String) -> Option<GeoLocation> {
        match self.geocoder.geocode(&address).await {
            Ok(location) => Some(location),
            Err(err) => {
                tracing::debug!(id, address = %address, error = %err, "dropping unresolved location");
                None
            }
        }
    }
}
