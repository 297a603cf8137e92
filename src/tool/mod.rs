//! MCP tools for GitLab merge request review.
//!
//! Four handler groups, each a pure translation layer: typed arguments in,
//! exactly one client call, typed output out. Composite workflows are left
//! to the calling agent.

pub mod approval;
pub mod discussion;
pub mod merge_request;
pub mod pipeline;

use crate::gitlab::GitLabClient;
use crate::registry::ToolRegistry;

/// Register every tool group. Must run during bootstrap, before the server
/// starts serving.
pub fn register_all(registry: &mut ToolRegistry, client: &GitLabClient) {
    merge_request::register(registry, client);
    discussion::register(registry, client);
    approval::register(registry, client);
    pipeline::register(registry, client);
}
