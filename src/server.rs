//! MCP server wrapper over the tool registry.
//!
//! `tools/list` reflects only the advertised (enabled-at-registration)
//! subset; `tools/call` dispatches through the registry, whose handlers
//! re-check enablement on every invocation.

use std::sync::Arc;

use rmcp::model::{
    CallToolRequestParam, CallToolResult, ErrorData, Implementation, ListToolsResult,
    PaginatedRequestParam, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::service::{RequestContext, RoleServer};
use rmcp::ServerHandler;

use crate::registry::ToolRegistry;

/// MCP server exposing the registered GitLab tools.
#[derive(Clone)]
pub struct GitLabMcpServer {
    registry: Arc<ToolRegistry>,
}

impl GitLabMcpServer {
    /// Wrap a fully-populated registry. Registration must be complete before
    /// the server starts serving; the registry is read-only from here on.
    #[must_use]
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    /// Access the underlying registry.
    #[must_use]
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }
}

impl ServerHandler for GitLabMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "GitLab merge request review tools. List, inspect, create and \
                 merge merge requests, manage discussion threads and \
                 approvals, and inspect CI pipelines. Identify projects by \
                 numeric ID or URL-encoded path."
                    .into(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult {
            next_cursor: None,
            tools: self.registry.advertised_tools(),
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        self.registry.call(&request.name, request.arguments).await
    }
}
