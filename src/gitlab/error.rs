//! GitLab API error taxonomy.
//!
//! Every upstream failure is classified into one of a closed set of codes;
//! callers branch on [`ErrorCode`], never on the message text.

use reqwest::StatusCode;
use rmcp::model::{ErrorCode as JsonRpcErrorCode, ErrorData};
use serde::Serialize;
use thiserror::Error;

/// Stable error codes surfaced to MCP clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Unauthorized,
    Forbidden,
    NotFound,
    RateLimited,
    BadRequest,
    ServerError,
    ToolDisabled,
}

impl ErrorCode {
    /// The wire form of the code.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Unauthorized => "unauthorized",
            ErrorCode::Forbidden => "forbidden",
            ErrorCode::NotFound => "not_found",
            ErrorCode::RateLimited => "rate_limited",
            ErrorCode::BadRequest => "bad_request",
            ErrorCode::ServerError => "server_error",
            ErrorCode::ToolDisabled => "tool_disabled",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error value returned by every GitLab operation.
///
/// The code is the contract; the message is diagnostic only. Retryability is
/// fixed at classification time: `rate_limited` and genuine server failures
/// may succeed on a later identical call, everything else requires the caller
/// to change the request or its context first.
#[derive(Debug, Clone, Error)]
#[error("[{code}] {message}")]
pub struct GitLabError {
    pub code: ErrorCode,
    pub message: String,
    retryable: bool,
}

/// Convenience result alias for GitLab operations.
pub type GitLabResult<T> = Result<T, GitLabError>;

impl GitLabError {
    /// Whether reissuing the same call later may succeed.
    pub fn is_retryable(&self) -> bool {
        self.retryable
    }

    /// Classify an upstream HTTP outcome.
    ///
    /// Pure function of the optional status code and diagnostic detail:
    /// `None` means the request never produced a response (network failure,
    /// abandoned call) and is retryable. An unrecognized status classifies as
    /// `server_error` but is not retryable, since the failure mode is
    /// unknown.
    pub fn from_status(status: Option<StatusCode>, detail: &str) -> Self {
        let Some(status) = status else {
            return Self {
                code: ErrorCode::ServerError,
                message: format!("GitLab API request failed: {detail}"),
                retryable: true,
            };
        };

        match status {
            StatusCode::UNAUTHORIZED => Self {
                code: ErrorCode::Unauthorized,
                message: "authentication token is invalid or expired".to_string(),
                retryable: false,
            },
            StatusCode::FORBIDDEN => Self {
                code: ErrorCode::Forbidden,
                message: "not permitted to perform this operation".to_string(),
                retryable: false,
            },
            StatusCode::NOT_FOUND => Self {
                code: ErrorCode::NotFound,
                message: "the requested resource was not found".to_string(),
                retryable: false,
            },
            StatusCode::TOO_MANY_REQUESTS => Self {
                code: ErrorCode::RateLimited,
                message: "API rate limit reached, retry after a delay".to_string(),
                retryable: true,
            },
            StatusCode::BAD_REQUEST => Self {
                code: ErrorCode::BadRequest,
                message: format!("invalid request: {detail}"),
                retryable: false,
            },
            s if s.is_server_error() => Self {
                code: ErrorCode::ServerError,
                message: "GitLab server error, retry after a delay".to_string(),
                retryable: true,
            },
            s => Self {
                code: ErrorCode::ServerError,
                message: format!("unexpected status {s}: {detail}"),
                retryable: false,
            },
        }
    }

    /// Error for a tool invocation blocked by the enablement policy.
    pub fn tool_disabled(tool_name: &str) -> Self {
        Self {
            code: ErrorCode::ToolDisabled,
            message: format!("tool '{tool_name}' is disabled"),
            retryable: false,
        }
    }

    /// Error for a client that could not be constructed or a response that
    /// could not be decoded.
    pub(crate) fn setup(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::ServerError,
            message: message.into(),
            retryable: false,
        }
    }
}

impl From<reqwest::Error> for GitLabError {
    fn from(err: reqwest::Error) -> Self {
        GitLabError::from_status(err.status(), &err.to_string())
    }
}

impl From<GitLabError> for ErrorData {
    fn from(err: GitLabError) -> Self {
        let rpc_code = match err.code {
            ErrorCode::BadRequest => JsonRpcErrorCode::INVALID_PARAMS,
            ErrorCode::ToolDisabled => JsonRpcErrorCode::INVALID_REQUEST,
            _ => JsonRpcErrorCode::INTERNAL_ERROR,
        };
        let data = serde_json::json!({
            "code": err.code.as_str(),
            "retryable": err.is_retryable(),
        });
        ErrorData::new(rpc_code, err.message, Some(data))
    }
}
