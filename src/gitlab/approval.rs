//! Merge request approval workflow.

use serde::Deserialize;

use crate::gitlab::client::GitLabClient;
use crate::gitlab::error::GitLabResult;
use crate::gitlab::merge_request::Author;

/// One granted approval.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApprovedBy {
    #[serde(default)]
    pub user: Author,
}

/// Approval state of a merge request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MergeRequestApprovals {
    #[serde(default)]
    pub approved: bool,
    #[serde(default)]
    pub approvals_required: i64,
    #[serde(default)]
    pub approvals_left: i64,
    #[serde(default)]
    pub user_has_approved: bool,
    #[serde(default)]
    pub user_can_approve: bool,
    #[serde(default)]
    pub approved_by: Vec<ApprovedBy>,
}

impl GitLabClient {
    /// Approve a merge request as the authenticated user.
    pub async fn approve_merge_request(
        &self,
        project_id: &str,
        mr_iid: i64,
    ) -> GitLabResult<MergeRequestApprovals> {
        let url = self.project_url(project_id, &format!("/merge_requests/{mr_iid}/approve"));
        self.send_json(self.post(url)).await
    }

    /// Withdraw the authenticated user's approval.
    pub async fn unapprove_merge_request(
        &self,
        project_id: &str,
        mr_iid: i64,
    ) -> GitLabResult<()> {
        let url = self.project_url(project_id, &format!("/merge_requests/{mr_iid}/unapprove"));
        self.send_unit(self.post(url)).await
    }

    /// Fetch the current approval state of a merge request.
    pub async fn get_merge_request_approvals(
        &self,
        project_id: &str,
        mr_iid: i64,
    ) -> GitLabResult<MergeRequestApprovals> {
        let url = self.project_url(project_id, &format!("/merge_requests/{mr_iid}/approvals"));
        self.send_json(self.get(url)).await
    }
}
