//! Memoization of resolved addresses.
//!
//! Concert locations repeat across artists and detail views, so successful
//! resolutions are kept per address for a TTL (24 hours by default).

use async_trait::async_trait;
use groupie_core::{GeoLocation, GeocodeError, Geocoder};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

/// Default TTL for resolved addresses (24 hours).
pub const DEFAULT_GEOCODE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Cached resolution with timestamp.
#[derive(Debug, Clone)]
struct CachedLocation {
    location: GeoLocation,
    resolved_at: Instant,
}

impl CachedLocation {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.resolved_at.elapsed() > ttl
    }
}

/// Geocoder wrapper that remembers successful resolutions.
///
/// Uses a simple HashMap with tokio RwLock for concurrent access. Misses are
/// never stored, so a transient failure is retried on the next request.
pub struct CachedGeocoder<G> {
    inner: G,
    cache: Arc<RwLock<HashMap<String, CachedLocation>>>,
    ttl: Duration,
}

impl<G: Geocoder> CachedGeocoder<G> {
    pub fn new(inner: G) -> Self {
        Self::with_ttl(inner, DEFAULT_GEOCODE_TTL)
    }

    pub fn with_ttl(inner: G, ttl: Duration) -> Self {
        Self { inner, cache: Arc::new(RwLock::new(HashMap::new())), ttl }
    }

    pub fn inner(&self) -> &G {
        &self.inner
    }

    /// Number of entries currently held, expired ones included.
    pub async fn len(&self) -> usize {
        self.cache.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.cache.read().await.is_empty()
    }

    /// Clear expired entries from the cache.
    pub async fn cleanup_expired(&self) {
        let mut cache = self.cache.write().await;
        cache.retain(|_, cached| !cached.is_expired(self.ttl));
    }
}

#[async_trait]
impl<G: Geocoder> Geocoder for CachedGeocoder<G> {
    async fn geocode(&self, address: &str) -> Result<GeoLocation, GeocodeError> {
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.get(address)
                && !cached.is_expired(self.ttl)
            {
                tracing::debug!(address, "geocode cache hit");
                return Ok(cached.location.clone());
            }
        }

        let location = self.inner.geocode(address).await?;

        let mut cache = self.cache.write().await;
        cache.insert(address.to_string(), CachedLocation { location: location.clone(), resolved_at: Instant::now() });

        Ok(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingGeocoder {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Geocoder for CountingGeocoder {
        async fn geocode(&self, address: &str) -> Result<GeoLocation, GeocodeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if address.starts_with("unknown") {
                return Err(GeocodeError::NoMatch(address.to_string()));
            }
            Ok(GeoLocation { address: address.to_string(), lat: 1.0, lon: 2.0 })
        }
    }

    fn calls(geocoder: &CachedGeocoder<CountingGeocoder>) -> usize {
        geocoder.inner().calls.load(Ordering::SeqCst)
    }

    #[test]
    fn test_cached_location_expiry() {
        let location = GeoLocation { address: "london-uk".into(), lat: 51.5, lon: -0.12 };
        let cached = CachedLocation { location, resolved_at: Instant::now() };
        assert!(!cached.is_expired(DEFAULT_GEOCODE_TTL));
        assert!(!cached.is_expired(Duration::from_secs(60)));
    }

    #[tokio::test]
    async fn test_hit_is_memoized() {
        let geocoder = CachedGeocoder::new(CountingGeocoder::default());

        let first = geocoder.geocode("london-uk").await.unwrap();
        let second = geocoder.geocode("london-uk").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(calls(&geocoder), 1);
        assert_eq!(geocoder.len().await, 1);
    }

    #[tokio::test]
    async fn test_miss_is_not_memoized() {
        let geocoder = CachedGeocoder::new(CountingGeocoder::default());

        assert!(geocoder.geocode("unknown-place").await.is_err());
        assert!(geocoder.geocode("unknown-place").await.is_err());

        assert_eq!(calls(&geocoder), 2);
        assert!(geocoder.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_is_resolved_again() {
        let geocoder = CachedGeocoder::with_ttl(CountingGeocoder::default(), Duration::from_secs(60));

        geocoder.geocode("seattle-usa").await.unwrap();
        tokio::time::advance(Duration::from_secs(30)).await;
        geocoder.geocode("seattle-usa").await.unwrap();
        assert_eq!(calls(&geocoder), 1);

        tokio::time::advance(Duration::from_secs(31)).await;
        geocoder.geocode("seattle-usa").await.unwrap();
        assert_eq!(calls(&geocoder), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cleanup_expired() {
        let geocoder = CachedGeocoder::with_ttl(CountingGeocoder::default(), Duration::from_secs(60));

        geocoder.geocode("hanover-germany").await.unwrap();
        tokio::time::advance(Duration::from_secs(45)).await;
        geocoder.geocode("queens-usa").await.unwrap();
        tokio::time::advance(Duration::from_secs(30)).await;

        geocoder.cleanup_expired().await;

        assert_eq!(geocoder.len().await, 1);
        let cache = geocoder.cache.read().await;
        assert!(cache.contains_key("queens-usa"));
    }
}
