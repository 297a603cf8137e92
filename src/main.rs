// GitLab MCP server binary.
//
// Serves the GitLab merge request review tools over stdio. Configuration
// comes from the environment (GITLAB_URL, GITLAB_TOKEN, optional
// GITLAB_MCP_ENABLED_TOOLS / GITLAB_MCP_DISABLED_TOOLS / GITLAB_MCP_DEBUG).

use std::sync::Arc;

use anyhow::Result;
use gitlab_mcp::config::Config;
use gitlab_mcp::gitlab::GitLabClient;
use gitlab_mcp::registry::ToolRegistry;
use gitlab_mcp::server::GitLabMcpServer;
use rmcp::ServiceExt;
use rmcp::transport::stdio;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Logs go to stderr; stdout belongs to the MCP transport.
    let mut log_builder = env_logger::Builder::from_default_env();
    if config.debug {
        log_builder.filter_level(log::LevelFilter::Debug);
    }
    log_builder.init();

    log::debug!("configuration loaded: {config}");

    let client = GitLabClient::new(&config.gitlab_url, &config.gitlab_token)?;
    log::debug!("GitLab client initialized for {}", config.gitlab_url);

    // Registration completes before serving; the registry is read-only from
    // then on.
    let mut registry = ToolRegistry::new(Arc::new(config));
    gitlab_mcp::tool::register_all(&mut registry, &client);

    let enabled = registry.enabled_tools();
    log::debug!("registered {} enabled tools: {enabled:?}", enabled.len());

    let service = GitLabMcpServer::new(registry).serve(stdio()).await?;
    service.waiting().await?;

    Ok(())
}
