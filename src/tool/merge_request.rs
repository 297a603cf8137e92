//! MCP tools for merge request operations.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::gitlab::{
    CreateMergeRequestOptions, GitLabClient, ListMergeRequestsOptions, MergeMergeRequestOptions,
    MergeRequest, Pagination, UpdateMergeRequestOptions,
};
use crate::registry::ToolRegistry;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListMergeRequestsArgs {
    /// Project ID or URL-encoded path.
    pub project_id: String,
    /// Merge request state filter: opened, closed, merged or all.
    pub state: Option<String>,
    /// Author user ID filter.
    pub author_id: Option<i64>,
    /// Assignee user ID filter.
    pub assignee_id: Option<i64>,
    /// Page number (default: 1).
    pub page: Option<u32>,
    /// Items per page (default: 100, max: 100).
    pub per_page: Option<u32>,
}

/// One merge request in a listing.
#[derive(Debug, Serialize, JsonSchema)]
pub struct MergeRequestSummary {
    pub iid: i64,
    pub title: String,
    pub state: String,
    pub source_branch: String,
    pub target_branch: String,
    pub web_url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub author_name: String,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct ListMergeRequestsOutput {
    pub merge_requests: Vec<MergeRequestSummary>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetMergeRequestArgs {
    /// Project ID or URL-encoded path.
    pub project_id: String,
    /// Merge request IID.
    pub merge_request_iid: i64,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct MergeRequestDetail {
    pub iid: i64,
    pub title: String,
    pub description: String,
    pub state: String,
    pub source_branch: String,
    pub target_branch: String,
    pub web_url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub author_name: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateMergeRequestArgs {
    /// Project ID or URL-encoded path.
    pub project_id: String,
    /// Source branch name.
    pub source_branch: String,
    /// Target branch name.
    pub target_branch: String,
    /// Merge request title.
    pub title: String,
    /// Merge request description.
    pub description: Option<String>,
    /// Assignee user IDs.
    #[serde(default)]
    pub assignee_ids: Vec<i64>,
    /// Reviewer user IDs.
    #[serde(default)]
    pub reviewer_ids: Vec<i64>,
    /// Labels to add.
    #[serde(default)]
    pub labels: Vec<String>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct CreateMergeRequestOutput {
    pub iid: i64,
    pub title: String,
    pub web_url: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateMergeRequestArgs {
    /// Project ID or URL-encoded path.
    pub project_id: String,
    /// Merge request IID.
    pub merge_request_iid: i64,
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New assignee user IDs.
    #[serde(default)]
    pub assignee_ids: Vec<i64>,
    /// New reviewer user IDs.
    #[serde(default)]
    pub reviewer_ids: Vec<i64>,
    /// New labels.
    #[serde(default)]
    pub labels: Vec<String>,
    /// New target branch.
    pub target_branch: Option<String>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct UpdateMergeRequestOutput {
    pub iid: i64,
    pub title: String,
    pub web_url: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct MergeMergeRequestArgs {
    /// Project ID or URL-encoded path.
    pub project_id: String,
    /// Merge request IID.
    pub merge_request_iid: i64,
    /// Squash commits when merging.
    pub squash: Option<bool>,
    /// Remove the source branch after merging.
    pub should_remove_source_branch: Option<bool>,
    /// Custom merge commit message.
    pub merge_commit_message: Option<String>,
    /// Custom squash commit message.
    pub squash_commit_message: Option<String>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct MergeMergeRequestOutput {
    pub iid: i64,
    pub state: String,
    pub web_url: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetMergeRequestChangesArgs {
    /// Project ID or URL-encoded path.
    pub project_id: String,
    /// Merge request IID.
    pub merge_request_iid: i64,
    /// Page number (default: 1).
    pub page: Option<u32>,
    /// Items per page (default: 100, max: 100).
    pub per_page: Option<u32>,
}

/// One changed file.
#[derive(Debug, Serialize, JsonSchema)]
pub struct ChangeInfo {
    pub old_path: String,
    pub new_path: String,
    pub diff: String,
    pub new_file: bool,
    pub renamed_file: bool,
    pub deleted_file: bool,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct GetMergeRequestChangesOutput {
    pub changes: Vec<ChangeInfo>,
}

fn author_name(mr: &MergeRequest) -> String {
    mr.author
        .as_ref()
        .map(|a| a.username.clone())
        .unwrap_or_default()
}

/// Register the merge request tools. The group holds its own reference to
/// the client; nothing is shared through process-wide state.
pub fn register(registry: &mut ToolRegistry, client: &GitLabClient) {
    let gitlab = client.clone();
    registry.register::<ListMergeRequestsArgs, ListMergeRequestsOutput, _, _>(
        "list_merge_requests",
        "List merge requests in a GitLab project",
        move |args| {
            let gitlab = gitlab.clone();
            async move {
                let opts = ListMergeRequestsOptions {
                    state: args.state,
                    author_id: args.author_id,
                    assignee_id: args.assignee_id,
                    pagination: Pagination {
                        page: args.page,
                        per_page: args.per_page,
                    },
                };
                let mrs = gitlab.list_merge_requests(&args.project_id, &opts).await?;
                Ok(ListMergeRequestsOutput {
                    merge_requests: mrs
                        .into_iter()
                        .map(|mr| MergeRequestSummary {
                            author_name: author_name(&mr),
                            iid: mr.iid,
                            title: mr.title,
                            state: mr.state,
                            source_branch: mr.source_branch,
                            target_branch: mr.target_branch,
                            web_url: mr.web_url,
                        })
                        .collect(),
                })
            }
        },
    );

    let gitlab = client.clone();
    registry.register::<GetMergeRequestArgs, MergeRequestDetail, _, _>(
        "get_merge_request",
        "Get the details of a GitLab merge request",
        move |args| {
            let gitlab = gitlab.clone();
            async move {
                let mr = gitlab
                    .get_merge_request(&args.project_id, args.merge_request_iid)
                    .await?;
                Ok(MergeRequestDetail {
                    author_name: author_name(&mr),
                    iid: mr.iid,
                    title: mr.title,
                    description: mr.description,
                    state: mr.state,
                    source_branch: mr.source_branch,
                    target_branch: mr.target_branch,
                    web_url: mr.web_url,
                })
            }
        },
    );

    let gitlab = client.clone();
    registry.register::<CreateMergeRequestArgs, CreateMergeRequestOutput, _, _>(
        "create_merge_request",
        "Create a new GitLab merge request",
        move |args| {
            let gitlab = gitlab.clone();
            async move {
                let opts = CreateMergeRequestOptions {
                    source_branch: args.source_branch,
                    target_branch: args.target_branch,
                    title: args.title,
                    description: args.description,
                    assignee_ids: args.assignee_ids,
                    reviewer_ids: args.reviewer_ids,
                    labels: args.labels,
                };
                let mr = gitlab.create_merge_request(&args.project_id, &opts).await?;
                Ok(CreateMergeRequestOutput {
                    iid: mr.iid,
                    title: mr.title,
                    web_url: mr.web_url,
                })
            }
        },
    );

    let gitlab = client.clone();
    registry.register::<UpdateMergeRequestArgs, UpdateMergeRequestOutput, _, _>(
        "update_merge_request",
        "Update an existing GitLab merge request",
        move |args| {
            let gitlab = gitlab.clone();
            async move {
                let opts = UpdateMergeRequestOptions {
                    title: args.title,
                    description: args.description,
                    assignee_ids: args.assignee_ids,
                    reviewer_ids: args.reviewer_ids,
                    labels: args.labels,
                    target_branch: args.target_branch,
                };
                let mr = gitlab
                    .update_merge_request(&args.project_id, args.merge_request_iid, &opts)
                    .await?;
                Ok(UpdateMergeRequestOutput {
                    iid: mr.iid,
                    title: mr.title,
                    web_url: mr.web_url,
                })
            }
        },
    );

    let gitlab = client.clone();
    registry.register::<MergeMergeRequestArgs, MergeMergeRequestOutput, _, _>(
        "merge_merge_request",
        "Merge a GitLab merge request",
        move |args| {
            let gitlab = gitlab.clone();
            async move {
                let opts = MergeMergeRequestOptions {
                    squash: args.squash,
                    should_remove_source_branch: args.should_remove_source_branch,
                    merge_commit_message: args.merge_commit_message,
                    squash_commit_message: args.squash_commit_message,
                };
                let mr = gitlab
                    .merge_merge_request(&args.project_id, args.merge_request_iid, &opts)
                    .await?;
                Ok(MergeMergeRequestOutput {
                    iid: mr.iid,
                    state: mr.state,
                    web_url: mr.web_url,
                })
            }
        },
    );

    let gitlab = client.clone();
    registry.register::<GetMergeRequestChangesArgs, GetMergeRequestChangesOutput, _, _>(
        "get_merge_request_changes",
        "Get the changed files of a GitLab merge request",
        move |args| {
            let gitlab = gitlab.clone();
            async move {
                let diffs = gitlab
                    .get_merge_request_changes(
                        &args.project_id,
                        args.merge_request_iid,
                        Pagination {
                            page: args.page,
                            per_page: args.per_page,
                        },
                    )
                    .await?;
                Ok(GetMergeRequestChangesOutput {
                    changes: diffs
                        .into_iter()
                        .map(|diff| ChangeInfo {
                            old_path: diff.old_path,
                            new_path: diff.new_path,
                            diff: diff.diff,
                            new_file: diff.new_file,
                            renamed_file: diff.renamed_file,
                            deleted_file: diff.deleted_file,
                        })
                        .collect(),
                })
            }
        },
    );
}
