//! Merge request operations.

use serde::{Deserialize, Serialize};

use crate::gitlab::client::{GitLabClient, Pagination};
use crate::gitlab::error::GitLabResult;

/// Minimal user identity attached to upstream entities.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub username: String,
}

/// A merge request as returned by the upstream API.
///
/// Absent fields deserialize to their defaults; upstream payload sparseness
/// must never fail an operation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MergeRequest {
    #[serde(default)]
    pub iid: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub source_branch: String,
    #[serde(default)]
    pub target_branch: String,
    #[serde(default)]
    pub web_url: String,
    #[serde(default)]
    pub author: Option<Author>,
}

/// One changed file in a merge request diff.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MergeRequestDiff {
    #[serde(default)]
    pub old_path: String,
    #[serde(default)]
    pub new_path: String,
    #[serde(default)]
    pub diff: String,
    #[serde(default)]
    pub new_file: bool,
    #[serde(default)]
    pub renamed_file: bool,
    #[serde(default)]
    pub deleted_file: bool,
}

/// Filters for listing merge requests.
#[derive(Debug, Clone, Default)]
pub struct ListMergeRequestsOptions {
    /// `opened`, `closed`, `merged` or `all`.
    pub state: Option<String>,
    pub author_id: Option<i64>,
    pub assignee_id: Option<i64>,
    pub pagination: Pagination,
}

/// Fields for creating a merge request.
#[derive(Debug, Clone, Default)]
pub struct CreateMergeRequestOptions {
    pub source_branch: String,
    pub target_branch: String,
    pub title: String,
    pub description: Option<String>,
    pub assignee_ids: Vec<i64>,
    pub reviewer_ids: Vec<i64>,
    pub labels: Vec<String>,
}

/// Fields for updating a merge request. Unset fields are left untouched
/// upstream.
#[derive(Debug, Clone, Default)]
pub struct UpdateMergeRequestOptions {
    pub title: Option<String>,
    pub description: Option<String>,
    pub assignee_ids: Vec<i64>,
    pub reviewer_ids: Vec<i64>,
    pub labels: Vec<String>,
    pub target_branch: Option<String>,
}

/// Options for accepting a merge request.
#[derive(Debug, Clone, Default)]
pub struct MergeMergeRequestOptions {
    pub squash: Option<bool>,
    pub should_remove_source_branch: Option<bool>,
    pub merge_commit_message: Option<String>,
    pub squash_commit_message: Option<String>,
}

#[derive(Serialize)]
struct CreateMergeRequestBody<'a> {
    source_branch: &'a str,
    target_branch: &'a str,
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    assignee_ids: Option<&'a [i64]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reviewer_ids: Option<&'a [i64]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    labels: Option<String>,
}

#[derive(Serialize)]
struct UpdateMergeRequestBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    assignee_ids: Option<&'a [i64]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reviewer_ids: Option<&'a [i64]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    labels: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    target_branch: Option<&'a str>,
}

#[derive(Serialize)]
struct MergeMergeRequestBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    squash: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    should_remove_source_branch: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    merge_commit_message: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    squash_commit_message: Option<&'a str>,
}

/// Labels travel as a single comma-joined string.
fn join_labels(labels: &[String]) -> Option<String> {
    if labels.is_empty() {
        None
    } else {
        Some(labels.join(","))
    }
}

fn non_empty(ids: &[i64]) -> Option<&[i64]> {
    if ids.is_empty() { None } else { Some(ids) }
}

impl GitLabClient {
    /// List merge requests in a project.
    pub async fn list_merge_requests(
        &self,
        project_id: &str,
        opts: &ListMergeRequestsOptions,
    ) -> GitLabResult<Vec<MergeRequest>> {
        let url = self.project_url(project_id, "/merge_requests");
        let mut request = self.get(url).query(&opts.pagination.query());

        if let Some(state) = &opts.state {
            request = request.query(&[("state", state.as_str())]);
        }
        if let Some(author_id) = opts.author_id {
            request = request.query(&[("author_id", author_id.to_string())]);
        }
        if let Some(assignee_id) = opts.assignee_id {
            request = request.query(&[("assignee_id", assignee_id.to_string())]);
        }

        self.send_json(request).await
    }

    /// Fetch a single merge request by IID.
    pub async fn get_merge_request(
        &self,
        project_id: &str,
        mr_iid: i64,
    ) -> GitLabResult<MergeRequest> {
        let url = self.project_url(project_id, &format!("/merge_requests/{mr_iid}"));
        self.send_json(self.get(url)).await
    }

    /// Create a new merge request.
    pub async fn create_merge_request(
        &self,
        project_id: &str,
        opts: &CreateMergeRequestOptions,
    ) -> GitLabResult<MergeRequest> {
        let url = self.project_url(project_id, "/merge_requests");
        let body = CreateMergeRequestBody {
            source_branch: &opts.source_branch,
            target_branch: &opts.target_branch,
            title: &opts.title,
            description: opts.description.as_deref(),
            assignee_ids: non_empty(&opts.assignee_ids),
            reviewer_ids: non_empty(&opts.reviewer_ids),
            labels: join_labels(&opts.labels),
        };
        self.send_json(self.post(url).json(&body)).await
    }

    /// Update an existing merge request.
    pub async fn update_merge_request(
        &self,
        project_id: &str,
        mr_iid: i64,
        opts: &UpdateMergeRequestOptions,
    ) -> GitLabResult<MergeRequest> {
        let url = self.project_url(project_id, &format!("/merge_requests/{mr_iid}"));
        let body = UpdateMergeRequestBody {
            title: opts.title.as_deref(),
            description: opts.description.as_deref(),
            assignee_ids: non_empty(&opts.assignee_ids),
            reviewer_ids: non_empty(&opts.reviewer_ids),
            labels: join_labels(&opts.labels),
            target_branch: opts.target_branch.as_deref(),
        };
        self.send_json(self.put(url).json(&body)).await
    }

    /// Accept (merge) a merge request.
    pub async fn merge_merge_request(
        &self,
        project_id: &str,
        mr_iid: i64,
        opts: &MergeMergeRequestOptions,
    ) -> GitLabResult<MergeRequest> {
        let url = self.project_url(project_id, &format!("/merge_requests/{mr_iid}/merge"));
        let body = MergeMergeRequestBody {
            squash: opts.squash,
            should_remove_source_branch: opts.should_remove_source_branch,
            merge_commit_message: opts.merge_commit_message.as_deref(),
            squash_commit_message: opts.squash_commit_message.as_deref(),
        };
        self.send_json(self.put(url).json(&body)).await
    }

    /// List the changed files of a merge request.
    pub async fn get_merge_request_changes(
        &self,
        project_id: &str,
        mr_iid: i64,
        pagination: Pagination,
    ) -> GitLabResult<Vec<MergeRequestDiff>> {
        let url = self.project_url(project_id, &format!("/merge_requests/{mr_iid}/diffs"));
        self.send_json(self.get(url).query(&pagination.query())).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_join_to_comma_string() {
        assert_eq!(join_labels(&[]), None);
        assert_eq!(
            join_labels(&["bug".to_string(), "p1".to_string()]),
            Some("bug,p1".to_string())
        );
    }

    #[test]
    fn empty_id_lists_are_omitted() {
        let body = CreateMergeRequestBody {
            source_branch: "feature",
            target_branch: "main",
            title: "t",
            description: None,
            assignee_ids: non_empty(&[]),
            reviewer_ids: non_empty(&[1, 2]),
            labels: None,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert!(value.get("assignee_ids").is_none());
        assert_eq!(value["reviewer_ids"], serde_json::json!([1, 2]));
        assert!(value.get("description").is_none());
    }

    #[test]
    fn sparse_merge_request_deserializes_with_defaults() {
        let mr: MergeRequest = serde_json::from_str(r#"{"iid": 7, "title": "Fix"}"#).unwrap();
        assert_eq!(mr.iid, 7);
        assert_eq!(mr.title, "Fix");
        assert_eq!(mr.state, "");
        assert!(mr.author.is_none());
    }
}
