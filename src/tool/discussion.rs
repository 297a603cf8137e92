//! MCP tools for merge request comments and discussion threads.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::gitlab::{
    CreateDiscussionOptions, DiscussionPosition, GitLabClient, Note, Pagination,
};
use crate::registry::ToolRegistry;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct AddCommentArgs {
    /// Project ID or URL-encoded path.
    pub project_id: String,
    /// Merge request IID.
    pub merge_request_iid: i64,
    /// Comment body text.
    pub body: String,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct AddCommentOutput {
    pub id: i64,
    pub body: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub author_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub created_at: String,
}

/// Position of a line comment within a merge request diff.
///
/// Every field is optional; only the set fields are sent upstream. Omitting
/// both file paths creates a general discussion instead of a line comment.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct DiffPositionArgs {
    /// Base commit SHA.
    pub base_sha: Option<String>,
    /// Start commit SHA.
    pub start_sha: Option<String>,
    /// Head commit SHA.
    pub head_sha: Option<String>,
    /// Old file path.
    pub old_path: Option<String>,
    /// New file path.
    pub new_path: Option<String>,
    /// Line number in the old file.
    pub old_line: Option<i64>,
    /// Line number in the new file.
    pub new_line: Option<i64>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct AddDiscussionArgs {
    /// Project ID or URL-encoded path.
    pub project_id: String,
    /// Merge request IID.
    pub merge_request_iid: i64,
    /// Discussion body text.
    pub body: String,
    /// Position for a line comment.
    pub position: Option<DiffPositionArgs>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct AddDiscussionOutput {
    pub id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListDiscussionsArgs {
    /// Project ID or URL-encoded path.
    pub project_id: String,
    /// Merge request IID.
    pub merge_request_iid: i64,
    /// Page number (default: 1).
    pub page: Option<u32>,
    /// Items per page (default: 100, max: 100).
    pub per_page: Option<u32>,
}

/// One note within a discussion thread.
#[derive(Debug, Serialize, JsonSchema)]
pub struct DiscussionNote {
    pub id: i64,
    pub body: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub author_name: String,
    pub resolvable: bool,
    pub resolved: bool,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct DiscussionSummary {
    pub id: String,
    pub notes: Vec<DiscussionNote>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct ListDiscussionsOutput {
    pub discussions: Vec<DiscussionSummary>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ResolveDiscussionArgs {
    /// Project ID or URL-encoded path.
    pub project_id: String,
    /// Merge request IID.
    pub merge_request_iid: i64,
    /// Discussion ID.
    pub discussion_id: String,
    /// Set to true to resolve or false to unresolve.
    pub resolved: bool,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct ResolveDiscussionOutput {
    pub id: String,
    pub resolved: bool,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DeleteCommentArgs {
    /// Project ID or URL-encoded path.
    pub project_id: String,
    /// Merge request IID.
    pub merge_request_iid: i64,
    /// Note ID to delete.
    pub note_id: i64,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct DeleteCommentOutput {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ReplyToCommentArgs {
    /// Project ID or URL-encoded path.
    pub project_id: String,
    /// Merge request IID.
    pub merge_request_iid: i64,
    /// Discussion ID of the thread to reply to.
    pub discussion_id: String,
    /// Reply body text.
    pub body: String,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct ReplyToCommentOutput {
    pub id: i64,
    pub body: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub author_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub created_at: String,
}

fn note_author(note: &Note) -> String {
    note.author
        .as_ref()
        .map(|a| a.username.clone())
        .unwrap_or_default()
}

/// Register the discussion tools.
pub fn register(registry: &mut ToolRegistry, client: &GitLabClient) {
    let gitlab = client.clone();
    registry.register::<AddCommentArgs, AddCommentOutput, _, _>(
        "add_merge_request_comment",
        "Add a general comment to a GitLab merge request",
        move |args| {
            let gitlab = gitlab.clone();
            async move {
                let note = gitlab
                    .add_merge_request_comment(&args.project_id, args.merge_request_iid, &args.body)
                    .await?;
                Ok(AddCommentOutput {
                    author_name: note_author(&note),
                    created_at: note.created_at.unwrap_or_default(),
                    id: note.id,
                    body: note.body,
                })
            }
        },
    );

    let gitlab = client.clone();
    registry.register::<AddDiscussionArgs, AddDiscussionOutput, _, _>(
        "add_merge_request_discussion",
        "Create a discussion thread on a GitLab merge request, optionally anchored to a diff line",
        move |args| {
            let gitlab = gitlab.clone();
            async move {
                let opts = CreateDiscussionOptions {
                    body: args.body,
                    position: args.position.map(|p| DiscussionPosition {
                        base_sha: p.base_sha,
                        start_sha: p.start_sha,
                        head_sha: p.head_sha,
                        old_path: p.old_path,
                        new_path: p.new_path,
                        old_line: p.old_line,
                        new_line: p.new_line,
                    }),
                };
                let discussion = gitlab
                    .create_merge_request_discussion(
                        &args.project_id,
                        args.merge_request_iid,
                        &opts,
                    )
                    .await?;
                Ok(AddDiscussionOutput { id: discussion.id })
            }
        },
    );

    let gitlab = client.clone();
    registry.register::<ListDiscussionsArgs, ListDiscussionsOutput, _, _>(
        "list_merge_request_discussions",
        "List the discussion threads of a GitLab merge request",
        move |args| {
            let gitlab = gitlab.clone();
            async move {
                let discussions = gitlab
                    .list_merge_request_discussions(
                        &args.project_id,
                        args.merge_request_iid,
                        Pagination {
                            page: args.page,
                            per_page: args.per_page,
                        },
                    )
                    .await?;
                Ok(ListDiscussionsOutput {
                    discussions: discussions
                        .into_iter()
                        .map(|d| DiscussionSummary {
                            id: d.id,
                            notes: d
                                .notes
                                .into_iter()
                                .map(|n| DiscussionNote {
                                    author_name: note_author(&n),
                                    id: n.id,
                                    body: n.body,
                                    resolvable: n.resolvable,
                                    resolved: n.resolved,
                                })
                                .collect(),
                        })
                        .collect(),
                })
            }
        },
    );

    let gitlab = client.clone();
    registry.register::<ResolveDiscussionArgs, ResolveDiscussionOutput, _, _>(
        "resolve_discussion",
        "Resolve or unresolve a discussion thread on a GitLab merge request",
        move |args| {
            let gitlab = gitlab.clone();
            async move {
                let discussion = gitlab
                    .resolve_merge_request_discussion(
                        &args.project_id,
                        args.merge_request_iid,
                        &args.discussion_id,
                        args.resolved,
                    )
                    .await?;
                // The discussion itself has no top-level resolved flag; read
                // the state from the first note.
                let resolved = discussion.notes.first().is_some_and(|n| n.resolved);
                Ok(ResolveDiscussionOutput {
                    id: discussion.id,
                    resolved,
                })
            }
        },
    );

    let gitlab = client.clone();
    registry.register::<DeleteCommentArgs, DeleteCommentOutput, _, _>(
        "delete_merge_request_comment",
        "Delete a comment from a GitLab merge request",
        move |args| {
            let gitlab = gitlab.clone();
            async move {
                gitlab
                    .delete_merge_request_note(
                        &args.project_id,
                        args.merge_request_iid,
                        args.note_id,
                    )
                    .await?;
                Ok(DeleteCommentOutput {
                    success: true,
                    message: "Comment deleted successfully".to_string(),
                })
            }
        },
    );

    let gitlab = client.clone();
    registry.register::<ReplyToCommentArgs, ReplyToCommentOutput, _, _>(
        "reply_to_merge_request_comment",
        "Reply to an existing discussion thread on a GitLab merge request",
        move |args| {
            let gitlab = gitlab.clone();
            async move {
                let note = gitlab
                    .reply_to_merge_request_discussion(
                        &args.project_id,
                        args.merge_request_iid,
                        &args.discussion_id,
                        &args.body,
                    )
                    .await?;
                Ok(ReplyToCommentOutput {
                    author_name: note_author(&note),
                    created_at: note.created_at.unwrap_or_default(),
                    id: note.id,
                    body: note.body,
                })
            }
        },
    );
}
