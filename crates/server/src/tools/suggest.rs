//! artist_suggest tool implementation.

use groupie_core::query::suggest;
use groupie_core::{Error, Suggestion};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{Cache, current_snapshot, json_result};

/// Input parameters for artist_suggest tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ArtistSuggestParams {
    /// Partial text typed so far. Matched case-insensitively as a substring.
    pub query: String,
}

/// Output structure for artist_suggest tool.
#[derive(Debug, Clone, Serialize)]
pub struct ArtistSuggestOutput {
    /// Exact matches first, then by category, then shorter text first.
    pub suggestions: Vec<Suggestion>,
}

pub(crate) async fn suggestions(cache: &Cache, params: ArtistSuggestParams) -> Result<ArtistSuggestOutput, Error> {
    let snapshot = current_snapshot(cache).await?;
    Ok(ArtistSuggestOutput { suggestions: suggest(&snapshot, &params.query) })
}

/// Implementation of the artist_suggest tool.
pub async fn suggest_impl(cache: &Cache, params: ArtistSuggestParams) -> Result<CallToolResult, McpError> {
    let output = suggestions(cache, params).await?;
    json_result(&output)
}
