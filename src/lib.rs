//! `gitlab_mcp` - GitLab merge request review operations as MCP tools.
//!
//! This library exposes a GitLab instance's merge-request, discussion,
//! approval, and pipeline operations as schema-described MCP tools for
//! LLM-driven agents. The tool registry decides per tool whether it is
//! advertised and callable, driven by an allow/deny configuration; every
//! upstream failure is classified into a small, stable error taxonomy with
//! retry semantics.

// Module declarations
pub mod config;
pub mod gitlab;
pub mod registry;
pub mod server;
pub mod tool;

// Re-export configuration types
pub use config::{Config, ConfigError};

// Re-export GitLab client types
pub use gitlab::{GitLabClient, GitLabClientBuilder, Pagination};

// Re-export GitLab error types
pub use gitlab::{ErrorCode, GitLabError, GitLabResult};

// Re-export registry and server types
pub use registry::ToolRegistry;
pub use server::GitLabMcpServer;
