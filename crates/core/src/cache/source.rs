//! The upstream seam and the four-way fan-out/fan-in refresh.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{Dataset, Error, FetchFailure, SourceFailure};
use crate::model::{Artist, DateRecord, LocationRecord, RelationRecord};
use crate::snapshot::Snapshot;

/// The four upstream datasets a snapshot is built from.
///
/// Implementations perform one read per call and never retry; the cache
/// decides what a failure means.
#[async_trait]
pub trait DataSource: Send + Sync + 'static {
    async fn artists(&self) -> Result<Vec<Artist>, FetchFailure>;

    async fn locations(&self) -> Result<Vec<LocationRecord>, FetchFailure>;

    async fn dates(&self) -> Result<Vec<DateRecord>, FetchFailure>;

    async fn relations(&self) -> Result<Vec<RelationRecord>, FetchFailure>;
}

#[async_trait]
impl<S: DataSource + ?Sized> DataSource for Arc<S> {
    async fn artists(&self) -> Result<Vec<Artist>, FetchFailure> {
        (**self).artists().await
    }

    async fn locations(&self) -> Result<Vec<LocationRecord>, FetchFailure> {
        (**self).locations().await
    }

    async fn dates(&self) -> Result<Vec<DateRecord>, FetchFailure> {
        (**self).dates().await
    }

    async fn relations(&self) -> Result<Vec<RelationRecord>, FetchFailure> {
        (**self).relations().await
    }
}

/// Fetch all four datasets concurrently and build a snapshot.
///
/// All four fetches run to completion before the outcome is decided. Any
/// failure fails the whole fetch, and every failure is reported.
pub(crate) async fn fetch_snapshot<S: DataSource + ?Sized>(source: &S) -> Result<Snapshot, Error> {
    let (artists, locations, dates, relations) =
        tokio::join!(source.artists(), source.locations(), source.dates(), source.relations());

    let mut failures = Vec::new();
    let artists = settle(Dataset::Artists, artists, &mut failures);
    let locations = settle(Dataset::Locations, locations, &mut failures);
    let dates = settle(Dataset::Dates, dates, &mut failures);
    let relations = settle(Dataset::Relations, relations, &mut failures);

    match (artists, locations, dates, relations) {
        (Some(artists), Some(locations), Some(dates), Some(relations)) => {
            Ok(Snapshot::new(artists, locations, dates, relations))
        }
        _ => Err(Error::UpstreamFetch(failures)),
    }
}

fn settle<T>(dataset: Dataset, result: Result<T, FetchFailure>, failures: &mut Vec<SourceFailure>) -> Option<T> {
    match result {
        Ok(records) => Some(records),
        Err(reason) => {
            tracing::warn!(source = %dataset, error = %reason, "upstream fetch failed");
            failures.push(SourceFailure { dataset, reason });
            None
        }
    }
}
