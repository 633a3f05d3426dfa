//! artist_search tool implementation.
//!
//! Filters the current snapshot by year ranges, member counts and concert
//! locations, then narrows it with a free-text query.

use groupie_core::query::filter;
use groupie_core::{Artist, Error, FilterRequest};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{Cache, current_snapshot, json_result};

/// Input parameters for artist_search tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ArtistSearchParams {
    /// Free-text query. A four-character number such as `1990` matches the
    /// creation year exactly; otherwise every whitespace-separated token must
    /// match the artist's name, a member, a concert location or the first album date.
    #[serde(default)]
    pub query: Option<String>,

    /// Structured filters. Omitted bounds default to the range of the data,
    /// capped at the current year.
    #[serde(default)]
    pub filters: Option<FilterRequest>,
}

/// Output structure for artist_search tool.
#[derive(Debug, Clone, Serialize)]
pub struct ArtistSearchOutput {
    /// Matching artists in upstream order.
    pub artists: Vec<Artist>,
    pub total: usize,
}

pub(crate) async fn search(cache: &Cache, params: ArtistSearchParams) -> Result<ArtistSearchOutput, Error> {
    let snapshot = current_snapshot(cache).await?;
    let filters = params.filters.unwrap_or_default().resolve(&snapshot)?;
    let query = params.query.as_deref().unwrap_or_default();

    let artists: Vec<Artist> = filter(&snapshot, query, &filters).into_iter().cloned().collect();

    tracing::debug!(query, matched = artists.len(), of = snapshot.len(), "artist search");

    Ok(ArtistSearchOutput { total: artists.len(), artists })
}

/// Implementation of the artist_search tool.
pub async fn search_impl(cache: &Cache, params: ArtistSearchParams) -> Result<CallToolResult, McpError> {
    let output = search(cache, params).await?;
    json_result(&output)
}
