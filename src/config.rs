//! Process configuration loaded from environment variables.
//!
//! The configuration is read once at startup and treated as immutable for the
//! lifetime of the process. Tool enablement policy lives here: a deny-list
//! always wins over the allow-list, and an unset allow-list means
//! "unrestricted".

use std::fmt;

use thiserror::Error;

/// Errors raised while loading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is missing or empty.
    #[error("{0} environment variable is required")]
    MissingVar(&'static str),
}

/// Immutable application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the GitLab instance (e.g. `https://gitlab.com`).
    pub gitlab_url: String,
    /// Bearer token used for every upstream request.
    pub gitlab_token: String,
    /// Allow-list of tool names. `None` means every tool is allowed.
    pub enabled_tools: Option<Vec<String>>,
    /// Deny-list of tool names. Takes precedence over the allow-list.
    pub disabled_tools: Vec<String>,
    /// Verbose diagnostic logging.
    pub debug: bool,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// `GITLAB_URL` and `GITLAB_TOKEN` are required; the tool lists and the
    /// debug flag are optional.
    pub fn from_env() -> Result<Self, ConfigError> {
        let gitlab_url =
            std::env::var("GITLAB_URL").map_err(|_| ConfigError::MissingVar("GITLAB_URL"))?;
        if gitlab_url.is_empty() {
            return Err(ConfigError::MissingVar("GITLAB_URL"));
        }

        let gitlab_token =
            std::env::var("GITLAB_TOKEN").map_err(|_| ConfigError::MissingVar("GITLAB_TOKEN"))?;
        if gitlab_token.is_empty() {
            return Err(ConfigError::MissingVar("GITLAB_TOKEN"));
        }

        let enabled_tools = std::env::var("GITLAB_MCP_ENABLED_TOOLS")
            .ok()
            .filter(|v| !v.is_empty())
            .map(|v| parse_tool_list(&v));

        let disabled_tools = std::env::var("GITLAB_MCP_DISABLED_TOOLS")
            .ok()
            .map(|v| parse_tool_list(&v))
            .unwrap_or_default();

        let debug = std::env::var("GITLAB_MCP_DEBUG")
            .map(|v| parse_debug(&v))
            .unwrap_or(false);

        Ok(Self {
            gitlab_url,
            gitlab_token,
            enabled_tools,
            disabled_tools,
            debug,
        })
    }

    /// Decide whether a tool may be advertised and invoked.
    ///
    /// Precedence is a strict contract: deny-list membership yields `false`
    /// regardless of the allow-list; with a non-empty allow-list the name
    /// must appear in it; otherwise the tool is enabled.
    pub fn is_tool_enabled(&self, tool_name: &str) -> bool {
        if self.disabled_tools.iter().any(|t| t == tool_name) {
            return false;
        }

        // An empty allow-list behaves like an unset one: unrestricted.
        if let Some(enabled) = &self.enabled_tools
            && !enabled.is_empty()
        {
            return enabled.iter().any(|t| t == tool_name);
        }

        true
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let masked = if self.gitlab_token.len() > 4 {
            format!(
                "{}***{}",
                &self.gitlab_token[..2],
                &self.gitlab_token[self.gitlab_token.len() - 2..]
            )
        } else {
            "***".to_string()
        };
        write!(
            f,
            "Config {{ gitlab_url: {:?}, gitlab_token: {:?}, enabled_tools: {:?}, disabled_tools: {:?}, debug: {} }}",
            self.gitlab_url, masked, self.enabled_tools, self.disabled_tools, self.debug
        )
    }
}

fn parse_debug(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes")
}

/// Split a comma-separated tool list, trimming whitespace and dropping empty
/// segments.
fn parse_tool_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
