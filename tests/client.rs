//! GitLab client adapter behavior against a mock upstream.

use gitlab_mcp::gitlab::{
    CreateDiscussionOptions, DiscussionPosition, ErrorCode, GitLabClient,
    ListMergeRequestsOptions, MergeMergeRequestOptions, Pagination,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> GitLabClient {
    GitLabClient::new(server.uri(), "test-token").unwrap()
}

#[tokio::test]
async fn list_defaults_to_page_one_hundred_per_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v4/projects/42/merge_requests"))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mrs = client
        .list_merge_requests("42", &ListMergeRequestsOptions::default())
        .await
        .unwrap();
    assert!(mrs.is_empty());
}

#[tokio::test]
async fn list_pagination_overrides_pass_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v4/projects/42/merge_requests"))
        .and(query_param("page", "2"))
        .and(query_param("per_page", "20"))
        .and(query_param("state", "opened"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let opts = ListMergeRequestsOptions {
        state: Some("opened".to_string()),
        pagination: Pagination {
            page: Some(2),
            per_page: Some(20),
        },
        ..Default::default()
    };
    client.list_merge_requests("42", &opts).await.unwrap();
}

#[tokio::test]
async fn requests_carry_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v4/projects/42/merge_requests/7"))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"iid": 7})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mr = client.get_merge_request("42", 7).await.unwrap();
    assert_eq!(mr.iid, 7);
}

#[tokio::test]
async fn missing_author_degrades_to_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v4/projects/42/merge_requests/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "iid": 7,
            "title": "Fix parser",
            "state": "opened"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mr = client.get_merge_request("42", 7).await.unwrap();
    assert!(mr.author.is_none());
    assert_eq!(mr.description, "");
    assert_eq!(mr.web_url, "");
}

#[tokio::test]
async fn merge_sends_only_set_options() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/v4/projects/42/merge_requests/7/merge"))
        .and(body_partial_json(json!({"squash": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "iid": 7,
            "state": "merged",
            "web_url": "https://gitlab.example.com/mr/7"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let opts = MergeMergeRequestOptions {
        squash: Some(true),
        ..Default::default()
    };
    let mr = client.merge_merge_request("42", 7, &opts).await.unwrap();
    assert_eq!(mr.state, "merged");

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(body.get("should_remove_source_branch").is_none());
    assert!(body.get("merge_commit_message").is_none());
}

#[tokio::test]
async fn positioned_discussion_omits_unset_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v4/projects/42/merge_requests/7/discussions"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "abc123",
            "notes": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let opts = CreateDiscussionOptions {
        body: "looks off".to_string(),
        position: Some(DiscussionPosition {
            new_path: Some("src/lib.rs".to_string()),
            new_line: Some(42),
            ..Default::default()
        }),
    };
    let discussion = client
        .create_merge_request_discussion("42", 7, &opts)
        .await
        .unwrap();
    assert_eq!(discussion.id, "abc123");

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let position = &body["position"];
    assert_eq!(position["position_type"], "text");
    assert_eq!(position["new_path"], "src/lib.rs");
    assert_eq!(position["new_line"], 42);
    // Unset SHAs must be omitted, not sent as empty strings.
    assert!(position.get("base_sha").is_none());
    assert!(position.get("start_sha").is_none());
    assert!(position.get("head_sha").is_none());
    assert!(position.get("old_path").is_none());
    assert!(position.get("old_line").is_none());
}

#[tokio::test]
async fn discussion_without_file_path_is_general() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v4/projects/42/merge_requests/7/discussions"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "def456",
            "notes": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let opts = CreateDiscussionOptions {
        body: "general remark".to_string(),
        position: Some(DiscussionPosition {
            new_line: Some(3),
            ..Default::default()
        }),
    };
    client
        .create_merge_request_discussion("42", 7, &opts)
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(body.get("position").is_none());
    assert_eq!(body["body"], "general remark");
}

#[tokio::test]
async fn delete_note_returns_unit_on_no_content() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v4/projects/42/merge_requests/7/notes/99"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.delete_merge_request_note("42", 7, 99).await.unwrap();
}

#[tokio::test]
async fn unapprove_tolerates_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v4/projects/42/merge_requests/7/unapprove"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.unapprove_merge_request("42", 7).await.unwrap();
}

#[tokio::test]
async fn reply_posts_to_discussion_notes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v4/projects/42/merge_requests/7/discussions/abc123/notes"))
        .and(body_partial_json(json!({"body": "agreed"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 100,
            "body": "agreed",
            "author": {"id": 5, "username": "reviewer"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let note = client
        .reply_to_merge_request_discussion("42", 7, "abc123", "agreed")
        .await
        .unwrap();
    assert_eq!(note.id, 100);
    assert_eq!(note.author.unwrap().username, "reviewer");
}

#[tokio::test]
async fn jobs_listing_is_paginated() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v4/projects/42/pipelines/9/jobs"))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "build", "stage": "build", "status": "success"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let jobs = client
        .list_pipeline_jobs("42", 9, Pagination::default())
        .await
        .unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].name, "build");
}

#[tokio::test]
async fn http_statuses_classify_into_the_taxonomy() {
    let cases = [
        (401, ErrorCode::Unauthorized, false),
        (403, ErrorCode::Forbidden, false),
        (404, ErrorCode::NotFound, false),
        (429, ErrorCode::RateLimited, true),
        (400, ErrorCode::BadRequest, false),
        (500, ErrorCode::ServerError, true),
        (503, ErrorCode::ServerError, true),
    ];

    for (status, code, retryable) in cases {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/projects/42/merge_requests/7"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.get_merge_request("42", 7).await.unwrap_err();
        assert_eq!(err.code, code, "status {status}");
        assert_eq!(err.is_retryable(), retryable, "status {status}");
    }
}

#[tokio::test]
async fn unreachable_upstream_is_retryable_server_error() {
    // Nothing listens here; the request never gets a response.
    let client = GitLabClient::new("http://127.0.0.1:9", "test-token").unwrap();
    let err = client.get_merge_request("42", 7).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ServerError);
    assert!(err.is_retryable());
}
