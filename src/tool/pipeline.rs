//! MCP tools for pipeline and job inspection.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::gitlab::{GitLabClient, Pagination};
use crate::registry::ToolRegistry;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListPipelinesArgs {
    /// Project ID or URL-encoded path.
    pub project_id: String,
    /// Merge request IID.
    pub merge_request_iid: i64,
}

/// Summary of one pipeline run.
#[derive(Debug, Serialize, JsonSchema)]
pub struct PipelineSummary {
    pub id: i64,
    pub status: String,
    #[serde(rename = "ref")]
    pub ref_: String,
    pub sha: String,
    pub web_url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub created_at: String,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct ListPipelinesOutput {
    pub pipelines: Vec<PipelineSummary>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetJobsArgs {
    /// Project ID or URL-encoded path.
    pub project_id: String,
    /// Pipeline ID.
    pub pipeline_id: i64,
    /// Page number (default: 1).
    pub page: Option<u32>,
    /// Items per page (default: 100, max: 100).
    pub per_page: Option<u32>,
}

/// Summary of one pipeline job.
#[derive(Debug, Serialize, JsonSchema)]
pub struct JobSummary {
    pub id: i64,
    pub name: String,
    pub stage: String,
    pub status: String,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct GetJobsOutput {
    pub jobs: Vec<JobSummary>,
}

/// Register the pipeline tools.
pub fn register(registry: &mut ToolRegistry, client: &GitLabClient) {
    let gitlab = client.clone();
    registry.register::<ListPipelinesArgs, ListPipelinesOutput, _, _>(
        "list_merge_request_pipelines",
        "List the pipelines associated with a GitLab merge request",
        move |args| {
            let gitlab = gitlab.clone();
            async move {
                let pipelines = gitlab
                    .list_merge_request_pipelines(&args.project_id, args.merge_request_iid)
                    .await?;
                Ok(ListPipelinesOutput {
                    pipelines: pipelines
                        .into_iter()
                        .map(|p| PipelineSummary {
                            id: p.id,
                            status: p.status,
                            ref_: p.ref_,
                            sha: p.sha,
                            web_url: p.web_url,
                            created_at: p.created_at.unwrap_or_default(),
                        })
                        .collect(),
                })
            }
        },
    );

    let gitlab = client.clone();
    registry.register::<GetJobsArgs, GetJobsOutput, _, _>(
        "get_pipeline_jobs",
        "List the jobs of a GitLab pipeline",
        move |args| {
            let gitlab = gitlab.clone();
            async move {
                let jobs = gitlab
                    .list_pipeline_jobs(
                        &args.project_id,
                        args.pipeline_id,
                        Pagination {
                            page: args.page,
                            per_page: args.per_page,
                        },
                    )
                    .await?;
                Ok(GetJobsOutput {
                    jobs: jobs
                        .into_iter()
                        .map(|j| JobSummary {
                            id: j.id,
                            name: j.name,
                            stage: j.stage,
                            status: j.status,
                        })
                        .collect(),
                })
            }
        },
    );
}
