//! MCP tool implementations.
//!
//! This module contains all tools exposed by the groupie server.

pub mod detail;
pub mod search;
pub mod status;
pub mod suggest;

pub use detail::ArtistDetailParams;
pub use search::ArtistSearchParams;
pub use suggest::ArtistSuggestParams;

use groupie_core::{DataSource, DetailAssembler, Error, Geocoder, Snapshot, SnapshotCache};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;
use std::sync::Arc;

/// Snapshot cache over whichever upstream the binary wired in.
pub type Cache = SnapshotCache<Arc<dyn DataSource>>;

/// Detail assembler over whichever geocoder the binary wired in.
pub type Assembler = DetailAssembler<Arc<dyn Geocoder>>;

/// The snapshot to answer from.
///
/// A failed refresh falls back to the last good snapshot when there is one;
/// the refresh error only reaches the caller if nothing was ever loaded.
pub(crate) async fn current_snapshot(cache: &Cache) -> Result<Arc<Snapshot>, Error> {
    match cache.get().await {
        Ok(snapshot) => Ok(snapshot),
        Err(err @ Error::UpstreamFetch(_)) => match cache.latest().await {
            Some(snapshot) => {
                tracing::warn!(
                    error = %err,
                    fetched_at = %snapshot.fetched_at(),
                    "refresh failed, serving stale snapshot"
                );
                Ok(snapshot)
            }
            None => Err(err),
        },
        Err(err) => Err(err),
    }
}

/// Wrap a tool output as pretty-printed JSON text content.
pub(crate) fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}


#[cfg(test)]
mod tests {
    use super::testing::{INTERVAL, cache, output_json};
    use super::*;
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn test_current_snapshot_loads_on_first_use() {
        let (cache, _source) = cache();
        let snapshot = current_snapshot(&cache).await.unwrap();
        assert_eq!(snapshot.len(), 3);
    }

    #[tokio::test]
    async fn test_current_snapshot_without_any_data_errors() {
        let (cache, source) = cache();
        source.failing.store(true, Ordering::SeqCst);

        let result = current_snapshot(&cache).await;
        assert!(matches!(result, Err(Error::UpstreamFetch(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_current_snapshot_falls_back_to_stale() {
        let (cache, source) = cache();
        let first = current_snapshot(&cache).await.unwrap();

        tokio::time::advance(INTERVAL + std::time::Duration::from_secs(1)).await;
        source.failing.store(true, Ordering::SeqCst);

        assert!(cache.get().await.is_err());
        let stale = current_snapshot(&cache).await.unwrap();
        assert!(Arc::ptr_eq(&first, &stale));
    }

    #[test]
    fn test_json_result_wraps_text() {
        let result = json_result(&serde_json::json!({"total": 0})).unwrap();
        assert_eq!(output_json(&result)["total"], 0);
    }
}
