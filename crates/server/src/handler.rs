//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use crate::tools::{
    ArtistDetailParams, ArtistSearchParams, ArtistSuggestParams, Assembler, Cache, detail::detail_impl,
    search::search_impl, status::status_impl, suggest::suggest_impl,
};

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};
use std::sync::Arc;

/// The main MCP server handler for groupie.
#[derive(Clone)]
pub struct GroupieServer {
    cache: Cache,
    assembler: Arc<Assembler>,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl GroupieServer {
    /// Create a new server handler over a shared cache and detail assembler.
    pub fn new(cache: Cache, assembler: Assembler) -> Self {
        Self { cache, assembler: Arc::new(assembler), tool_router: Self::tool_router() }
    }

    /// Search and filter artists.
    #[tool(
        description = "Search artists. Optional free-text query: a four-character number matches the creation year exactly, otherwise every token must match a name, member, concert location or first album date. Optional filters: creation/first album year ranges, member counts, concert locations. Returns {artists, total}."
    )]
    async fn artist_search(&self, params: Parameters<ArtistSearchParams>) -> Result<CallToolResult, McpError> {
        search_impl(&self.cache, params.0).await
    }

    /// Ranked completions for partially typed text.
    #[tool(
        description = "Suggest completions for partial text across artist names, members, locations, creation years and first album dates. Exact matches rank first."
    )]
    async fn artist_suggest(&self, params: Parameters<ArtistSuggestParams>) -> Result<CallToolResult, McpError> {
        suggest_impl(&self.cache, params.0).await
    }

    /// Full detail for one artist.
    #[tool(
        description = "Get one artist by id with concert locations (with coordinates when geocoding is configured), dates and per-location dates."
    )]
    async fn artist_detail(&self, params: Parameters<ArtistDetailParams>) -> Result<CallToolResult, McpError> {
        detail_impl(&self.cache, &self.assembler, params.0).await
    }

    /// Snapshot age and refresh counters.
    #[tool(description = "Report when the artist snapshot was fetched, when it expires and refresh counters.")]
    async fn cache_status(&self) -> Result<CallToolResult, McpError> {
        status_impl(&self.cache).await
    }
}

impl ServerHandler for GroupieServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "groupie-mcp".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{TableGeocoder, cache};
    use groupie_core::{DetailAssembler, Geocoder};

    #[test]
    fn test_lists_every_tool() {
        let (cache, _source) = cache();
        let server = GroupieServer::new(cache, DetailAssembler::new(Arc::new(TableGeocoder) as Arc<dyn Geocoder>));

        let mut names: Vec<String> = server
            .tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();
        names.sort();

        assert_eq!(names, vec!["artist_detail", "artist_search", "artist_suggest", "cache_status"]);
    }

    #[test]
    fn test_server_info() {
        let (cache, _source) = cache();
        let server = GroupieServer::new(cache, DetailAssembler::new(Arc::new(TableGeocoder) as Arc<dyn Geocoder>));

        assert_eq!(server.get_info().server_info.name, "groupie-mcp");
    }
}
