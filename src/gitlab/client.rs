//! GitLab API client wrapper.
//!
//! A thin façade over `reqwest` that owns the base-URL and pagination
//! conventions and funnels every non-2xx outcome through the error
//! classifier, so the tool layer never touches raw transport details.

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

use crate::gitlab::error::{GitLabError, GitLabResult};

/// Typed GitLab REST v4 client.
///
/// Cloning is cheap; the underlying `reqwest::Client` shares its connection
/// pool across clones.
#[derive(Debug, Clone)]
pub struct GitLabClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl GitLabClient {
    /// Create a new client builder.
    #[must_use]
    pub fn builder() -> GitLabClientBuilder {
        GitLabClientBuilder::new()
    }

    /// Convenience: create a client from a base URL and token.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> GitLabResult<Self> {
        Self::builder().base_url(base_url).token(token).build()
    }

    /// The normalized API base URL (always ends in `/api/v4`).
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL for a project-scoped path. The project identifier may be a numeric
    /// id or a `group/project` path; the latter must be percent-encoded.
    pub(crate) fn project_url(&self, project_id: &str, rest: &str) -> String {
        format!(
            "{}/projects/{}{}",
            self.base_url,
            urlencoding::encode(project_id),
            rest
        )
    }

    pub(crate) fn get(&self, url: String) -> RequestBuilder {
        self.http.get(url).bearer_auth(&self.token)
    }

    pub(crate) fn post(&self, url: String) -> RequestBuilder {
        self.http.post(url).bearer_auth(&self.token)
    }

    pub(crate) fn put(&self, url: String) -> RequestBuilder {
        self.http.put(url).bearer_auth(&self.token)
    }

    pub(crate) fn delete(&self, url: String) -> RequestBuilder {
        self.http.delete(url).bearer_auth(&self.token)
    }

    /// Send a request and decode the JSON response body.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> GitLabResult<T> {
        let response = request
            .send()
            .await
            .map_err(|e| GitLabError::from_status(e.status(), &e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(GitLabError::from_status(Some(status), &detail));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| GitLabError::setup(format!("failed to decode GitLab response: {e}")))
    }

    /// Send a request, discarding any response body.
    pub(crate) async fn send_unit(&self, request: RequestBuilder) -> GitLabResult<()> {
        let response = request
            .send()
            .await
            .map_err(|e| GitLabError::from_status(e.status(), &e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(GitLabError::from_status(Some(status), &detail));
        }

        Ok(())
    }
}

/// Builder for [`GitLabClient`].
pub struct GitLabClientBuilder {
    base_url: Option<String>,
    token: Option<String>,
}

impl GitLabClientBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_url: None,
            token: None,
        }
    }

    /// Set the GitLab instance URL (with or without the `/api/v4` suffix).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the bearer token.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Build the client. The URL and token are both required.
    pub fn build(self) -> GitLabResult<GitLabClient> {
        let base_url = self
            .base_url
            .filter(|u| !u.is_empty())
            .ok_or_else(|| GitLabError::setup("GitLab URL is required"))?;
        let token = self
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| GitLabError::setup("GitLab token is required"))?;

        Ok(GitLabClient {
            http: reqwest::Client::new(),
            base_url: normalize_base_url(&base_url),
            token,
        })
    }
}

impl Default for GitLabClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Append the REST v4 prefix unless the caller already supplied it.
fn normalize_base_url(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    if trimmed.ends_with("/api/v4") {
        trimmed.to_string()
    } else {
        format!("{trimmed}/api/v4")
    }
}

/// Page selection for list operations.
///
/// Unset (or zero) fields fall back to the platform defaults of page 1 and
/// 100 items per page; both parameters are always sent explicitly.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pagination {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl Pagination {
    pub(crate) fn page(self) -> u32 {
        self.page.filter(|p| *p >= 1).unwrap_or(1)
    }

    pub(crate) fn per_page(self) -> u32 {
        self.per_page.filter(|p| *p >= 1).unwrap_or(100)
    }

    /// Query parameters for this page selection.
    pub(crate) fn query(self) -> [(&'static str, String); 2] {
        [
            ("page", self.page().to_string()),
            ("per_page", self.per_page().to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_api_suffix() {
        assert_eq!(
            normalize_base_url("https://gitlab.example.com"),
            "https://gitlab.example.com/api/v4"
        );
        assert_eq!(
            normalize_base_url("https://gitlab.example.com/"),
            "https://gitlab.example.com/api/v4"
        );
        assert_eq!(
            normalize_base_url("https://gitlab.example.com/api/v4/"),
            "https://gitlab.example.com/api/v4"
        );
    }

    #[test]
    fn builder_requires_url_and_token() {
        assert!(GitLabClient::builder().token("t").build().is_err());
        assert!(GitLabClient::builder().base_url("https://x").build().is_err());
        assert!(GitLabClient::new("", "t").is_err());
        assert!(GitLabClient::new("https://x", "").is_err());
    }

    #[test]
    fn project_path_is_percent_encoded() {
        let client = GitLabClient::new("https://gitlab.example.com", "t").unwrap();
        assert_eq!(
            client.project_url("group/app", "/merge_requests"),
            "https://gitlab.example.com/api/v4/projects/group%2Fapp/merge_requests"
        );
        assert_eq!(
            client.project_url("42", ""),
            "https://gitlab.example.com/api/v4/projects/42"
        );
    }

    #[test]
    fn pagination_defaults() {
        let p = Pagination::default();
        assert_eq!(p.page(), 1);
        assert_eq!(p.per_page(), 100);
    }

    #[test]
    fn pagination_zero_behaves_like_unset() {
        let p = Pagination {
            page: Some(0),
            per_page: Some(0),
        };
        assert_eq!(p.page(), 1);
        assert_eq!(p.per_page(), 100);
    }

    #[test]
    fn pagination_overrides_pass_through() {
        let p = Pagination {
            page: Some(2),
            per_page: Some(20),
        };
        assert_eq!(p.query(), [("page", "2".to_string()), ("per_page", "20".to_string())]);
    }
}
