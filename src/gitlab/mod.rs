//! GitLab API operations module.
//!
//! Typed façade over the GitLab REST v4 API using reqwest. Each capability
//! area lives in its own module; every operation classifies upstream
//! failures into the [`error::GitLabError`] taxonomy.

pub mod client;
pub mod error;

// Capability areas
pub mod approval;
pub mod discussion;
pub mod merge_request;
pub mod pipeline;

// Re-export client types
pub use client::{GitLabClient, GitLabClientBuilder, Pagination};

// Re-export error types
pub use error::{ErrorCode, GitLabError, GitLabResult};

// Re-export operation options and entities
pub use approval::{ApprovedBy, MergeRequestApprovals};
pub use discussion::{CreateDiscussionOptions, Discussion, DiscussionPosition, Note};
pub use merge_request::{
    Author, CreateMergeRequestOptions, ListMergeRequestsOptions, MergeMergeRequestOptions,
    MergeRequest, MergeRequestDiff, UpdateMergeRequestOptions,
};
pub use pipeline::{Job, PipelineInfo};
