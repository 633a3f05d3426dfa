//! cache_status tool implementation.
//!
//! Reports snapshot age and refresh counters without triggering a refresh.

use groupie_core::RefreshPolicy;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use serde::Serialize;

use super::{Cache, json_result};

/// Output structure for cache_status tool.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatusOutput {
    /// RFC 3339 time of the last successful refresh, if any.
    pub fetched_at: Option<String>,
    /// Seconds until the snapshot expires; 0 once expired, absent if never loaded.
    pub expires_in_secs: Option<u64>,
    pub artists: usize,
    pub refreshes: u64,
    pub failed_refreshes: u64,
    /// Callers that waited on another caller's refresh.
    pub coalesced: u64,
    pub policy: RefreshPolicy,
}

pub(crate) async fn status(cache: &Cache) -> CacheStatusOutput {
    let status = cache.status().await;
    CacheStatusOutput {
        fetched_at: status.fetched_at.map(|at| at.to_rfc3339()),
        expires_in_secs: status.expires_in.map(|d| d.as_secs()),
        artists: status.artists,
        refreshes: status.refreshes,
        failed_refreshes: status.failed_refreshes,
        coalesced: status.coalesced,
        policy: status.policy,
    }
}

/// Implementation of the cache_status tool.
pub async fn status_impl(cache: &Cache) -> Result<CallToolResult, McpError> {
    json_result(&status(cache).await)
}
