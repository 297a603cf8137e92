//! Merge request notes and discussion threads.

use serde::{Deserialize, Serialize};

use crate::gitlab::client::{GitLabClient, Pagination};
use crate::gitlab::error::GitLabResult;
use crate::gitlab::merge_request::Author;

/// A single note (comment) on a merge request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Note {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub resolvable: bool,
    #[serde(default)]
    pub resolved: bool,
}

/// A discussion thread on a merge request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Discussion {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub notes: Vec<Note>,
}

/// Anchor for a line-level discussion within a diff.
///
/// Every field is independently optional; only the fields that are set are
/// sent upstream. A position without any file path is treated as absent and
/// the discussion becomes a general (non-positional) one.
#[derive(Debug, Clone, Default)]
pub struct DiscussionPosition {
    pub base_sha: Option<String>,
    pub start_sha: Option<String>,
    pub head_sha: Option<String>,
    pub old_path: Option<String>,
    pub new_path: Option<String>,
    pub old_line: Option<i64>,
    pub new_line: Option<i64>,
}

impl DiscussionPosition {
    /// A position is only meaningful when it names a file.
    pub(crate) fn has_path(&self) -> bool {
        let filled = |p: &Option<String>| p.as_deref().is_some_and(|p| !p.is_empty());
        filled(&self.new_path) || filled(&self.old_path)
    }
}

/// Options for creating a discussion thread.
#[derive(Debug, Clone, Default)]
pub struct CreateDiscussionOptions {
    pub body: String,
    pub position: Option<DiscussionPosition>,
}

#[derive(Serialize)]
struct PositionBody<'a> {
    position_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    base_sha: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_sha: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    head_sha: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    old_path: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    new_path: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    old_line: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    new_line: Option<i64>,
}

impl<'a> PositionBody<'a> {
    fn from_position(position: &'a DiscussionPosition) -> Self {
        let non_empty = |p: &'a Option<String>| p.as_deref().filter(|s| !s.is_empty());
        Self {
            position_type: "text",
            base_sha: non_empty(&position.base_sha),
            start_sha: non_empty(&position.start_sha),
            head_sha: non_empty(&position.head_sha),
            old_path: non_empty(&position.old_path),
            new_path: non_empty(&position.new_path),
            old_line: position.old_line,
            new_line: position.new_line,
        }
    }
}

#[derive(Serialize)]
struct CreateDiscussionBody<'a> {
    body: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    position: Option<PositionBody<'a>>,
}

#[derive(Serialize)]
struct NoteBody<'a> {
    body: &'a str,
}

#[derive(Serialize)]
struct ResolveBody {
    resolved: bool,
}

impl GitLabClient {
    /// Add a plain comment to a merge request.
    pub async fn add_merge_request_comment(
        &self,
        project_id: &str,
        mr_iid: i64,
        body: &str,
    ) -> GitLabResult<Note> {
        let url = self.project_url(project_id, &format!("/merge_requests/{mr_iid}/notes"));
        self.send_json(self.post(url).json(&NoteBody { body })).await
    }

    /// Create a discussion thread, optionally anchored to a diff position.
    pub async fn create_merge_request_discussion(
        &self,
        project_id: &str,
        mr_iid: i64,
        opts: &CreateDiscussionOptions,
    ) -> GitLabResult<Discussion> {
        let url = self.project_url(project_id, &format!("/merge_requests/{mr_iid}/discussions"));
        let position = opts
            .position
            .as_ref()
            .filter(|p| p.has_path())
            .map(PositionBody::from_position);
        let body = CreateDiscussionBody {
            body: &opts.body,
            position,
        };
        self.send_json(self.post(url).json(&body)).await
    }

    /// List the discussion threads of a merge request.
    pub async fn list_merge_request_discussions(
        &self,
        project_id: &str,
        mr_iid: i64,
        pagination: Pagination,
    ) -> GitLabResult<Vec<Discussion>> {
        let url = self.project_url(project_id, &format!("/merge_requests/{mr_iid}/discussions"));
        self.send_json(self.get(url).query(&pagination.query())).await
    }

    /// Set the resolved state of a discussion thread.
    pub async fn resolve_merge_request_discussion(
        &self,
        project_id: &str,
        mr_iid: i64,
        discussion_id: &str,
        resolved: bool,
    ) -> GitLabResult<Discussion> {
        let url = self.project_url(
            project_id,
            &format!("/merge_requests/{mr_iid}/discussions/{discussion_id}"),
        );
        self.send_json(self.put(url).json(&ResolveBody { resolved })).await
    }

    /// Delete a note from a merge request.
    pub async fn delete_merge_request_note(
        &self,
        project_id: &str,
        mr_iid: i64,
        note_id: i64,
    ) -> GitLabResult<()> {
        let url = self.project_url(
            project_id,
            &format!("/merge_requests/{mr_iid}/notes/{note_id}"),
        );
        self.send_unit(self.delete(url)).await
    }

    /// Reply to an existing discussion thread.
    pub async fn reply_to_merge_request_discussion(
        &self,
        project_id: &str,
        mr_iid: i64,
        discussion_id: &str,
        body: &str,
    ) -> GitLabResult<Note> {
        let url = self.project_url(
            project_id,
            &format!("/merge_requests/{mr_iid}/discussions/{discussion_id}/notes"),
        );
        self.send_json(self.post(url).json(&NoteBody { body })).await
    }
}
