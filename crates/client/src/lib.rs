//! HTTP clients for groupie.
//!
//! This crate provides the upstream client that feeds the snapshot cache and
//! the Mapbox geocoder used for artist details, shared by the server.

pub mod error;
pub mod geocode;
pub mod upstream;

pub use error::ClientError;
pub use geocode::{CachedGeocoder, MapboxConfig, MapboxGeocoder};
pub use upstream::{UpstreamClient, UpstreamConfig};
