//! Core types and shared functionality for groupie.
//!
//! This crate provides:
//! - The artist/tour data model and the immutable [`Snapshot`] that joins it
//! - [`SnapshotCache`], an in-memory snapshot cache refreshed from four upstream sources
//! - The query engine (filtering, multi-token search, ranked suggestions)
//! - Artist detail assembly with geocoded concert locations
//! - Unified error types and layered configuration

pub mod cache;
pub mod config;
pub mod detail;
pub mod error;
pub mod model;
pub mod query;
pub mod snapshot;

pub use cache::{CacheStatus, DataSource, RefreshPolicy, SnapshotCache};
pub use config::{AppConfig, ConfigError};
pub use detail::{DetailAssembler, DisabledGeocoder, GeocodeError, Geocoder};
pub use error::{Dataset, Error, FetchFailure, SourceFailure};
pub use model::{Artist, ArtistDetail, DateRecord, GeoLocation, LocationRecord, RelationRecord};
pub use query::{FilterParams, FilterRequest, Suggestion, SuggestionKind};
pub use snapshot::Snapshot;
