//! MCP tools for the merge request approval workflow.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::gitlab::GitLabClient;
use crate::registry::ToolRegistry;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ApproveArgs {
    /// Project ID or URL-encoded path.
    pub project_id: String,
    /// Merge request IID.
    pub merge_request_iid: i64,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct ApproveOutput {
    pub approved: bool,
    pub user_has_approved: bool,
    pub approvals_left: i64,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct UnapproveArgs {
    /// Project ID or URL-encoded path.
    pub project_id: String,
    /// Merge request IID.
    pub merge_request_iid: i64,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct UnapproveOutput {
    pub success: bool,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetApprovalsArgs {
    /// Project ID or URL-encoded path.
    pub project_id: String,
    /// Merge request IID.
    pub merge_request_iid: i64,
}

/// A user who has approved the merge request.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Approver {
    pub id: i64,
    pub username: String,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct GetApprovalsOutput {
    pub approved: bool,
    pub approvals_required: i64,
    pub approvals_left: i64,
    pub user_has_approved: bool,
    pub user_can_approve: bool,
    pub approved_by: Vec<Approver>,
}

/// Register the approval tools.
pub fn register(registry: &mut ToolRegistry, client: &GitLabClient) {
    let gitlab = client.clone();
    registry.register::<ApproveArgs, ApproveOutput, _, _>(
        "approve_merge_request",
        "Approve a GitLab merge request",
        move |args| {
            let gitlab = gitlab.clone();
            async move {
                let approvals = gitlab
                    .approve_merge_request(&args.project_id, args.merge_request_iid)
                    .await?;
                Ok(ApproveOutput {
                    approved: approvals.approved,
                    user_has_approved: approvals.user_has_approved,
                    approvals_left: approvals.approvals_left,
                })
            }
        },
    );

    let gitlab = client.clone();
    registry.register::<UnapproveArgs, UnapproveOutput, _, _>(
        "unapprove_merge_request",
        "Withdraw an approval from a GitLab merge request",
        move |args| {
            let gitlab = gitlab.clone();
            async move {
                gitlab
                    .unapprove_merge_request(&args.project_id, args.merge_request_iid)
                    .await?;
                Ok(UnapproveOutput { success: true })
            }
        },
    );

    let gitlab = client.clone();
    registry.register::<GetApprovalsArgs, GetApprovalsOutput, _, _>(
        "get_merge_request_approvals",
        "Get the approval status of a GitLab merge request",
        move |args| {
            let gitlab = gitlab.clone();
            async move {
                let approvals = gitlab
                    .get_merge_request_approvals(&args.project_id, args.merge_request_iid)
                    .await?;
                Ok(GetApprovalsOutput {
                    approved: approvals.approved,
                    approvals_required: approvals.approvals_required,
                    approvals_left: approvals.approvals_left,
                    user_has_approved: approvals.user_has_approved,
                    user_can_approve: approvals.user_can_approve,
                    approved_by: approvals
                        .approved_by
                        .into_iter()
                        .map(|a| Approver {
                            id: a.user.id,
                            username: a.user.username,
                        })
                        .collect(),
                })
            }
        },
    );
}
