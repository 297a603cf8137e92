//! Pipeline and job inspection.

use serde::Deserialize;

use crate::gitlab::client::{GitLabClient, Pagination};
use crate::gitlab::error::GitLabResult;

/// Summary of a CI pipeline.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PipelineInfo {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub status: String,
    #[serde(default, rename = "ref")]
    pub ref_: String,
    #[serde(default)]
    pub sha: String,
    #[serde(default)]
    pub web_url: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A job within a pipeline.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Job {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub stage: String,
    #[serde(default)]
    pub status: String,
}

impl GitLabClient {
    /// List the pipelines associated with a merge request.
    pub async fn list_merge_request_pipelines(
        &self,
        project_id: &str,
        mr_iid: i64,
    ) -> GitLabResult<Vec<PipelineInfo>> {
        let url = self.project_url(project_id, &format!("/merge_requests/{mr_iid}/pipelines"));
        self.send_json(self.get(url)).await
    }

    /// List the jobs of a pipeline.
    pub async fn list_pipeline_jobs(
        &self,
        project_id: &str,
        pipeline_id: i64,
        pagination: Pagination,
    ) -> GitLabResult<Vec<Job>> {
        let url = self.project_url(project_id, &format!("/pipelines/{pipeline_id}/jobs"));
        self.send_json(self.get(url).query(&pagination.query())).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_ref_field_renames() {
        let pipeline: PipelineInfo =
            serde_json::from_str(r#"{"id": 9, "ref": "main", "status": "success"}"#).unwrap();
        assert_eq!(pipeline.ref_, "main");
        assert_eq!(pipeline.status, "success");
        assert!(pipeline.created_at.is_none());
    }
}
