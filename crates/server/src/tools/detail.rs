//! artist_detail tool implementation.
//!
//! Joins one artist with its concert locations (geocoded), dates and
//! per-location date relations.

use groupie_core::{ArtistDetail, Error};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{Assembler, Cache, current_snapshot, json_result};

/// Input parameters for artist_detail tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ArtistDetailParams {
    /// Artist id as listed by artist_search.
    pub id: u32,
}

pub(crate) async fn detail(
    cache: &Cache, assembler: &Assembler, params: ArtistDetailParams,
) -> Result<ArtistDetail, Error> {
    let snapshot = current_snapshot(cache).await?;
    assembler
        .assemble(&snapshot, params.id)
        .await
        .ok_or(Error::NotFound(params.id))
}

/// Implementation of the artist_detail tool.
pub async fn detail_impl(
    cache: &Cache, assembler: &Assembler, params: ArtistDetailParams,
) -> Result<CallToolResult, McpError> {
    let output = detail(cache, assembler, params).await?;
    json_result(&output)
}
