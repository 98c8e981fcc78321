//! Comment reader.

use reqwest::{Method, StatusCode};
use tracing::{debug, instrument};

use super::client::{expect_status, JiraClient};
use super::error::{ApiError, Result};
use super::issues::issue_path;
use super::types::{Comment, CommentsResponse};

impl JiraClient {
    /// Fetch the comments of an issue in server order.
    ///
    /// The author shown is the last updater of each comment.
    ///
    /// # Errors
    ///
    /// `MalformedResponse` if the `comments` array or any comment's
    /// `updateAuthor` is missing.
    #[instrument(skip(self), fields(issue_key = %key))]
    pub async fn list_comments(&self, key: &str) -> Result<Vec<Comment>> {
        let path = format!("{}/comment", issue_path(key));
        let response = self.request(Method::GET, &path, None::<&()>).await?;
        let response = expect_status(response, StatusCode::OK).await?;
        let body: CommentsResponse = self.read_json(response).await?;

        let raw = body.comments.ok_or_else(|| {
            ApiError::MalformedResponse("comment response has no 'comments' array".into())
        })?;

        let comments = raw
            .into_iter()
            .map(|c| {
                let id = c.id.clone();
                c.into_comment().ok_or_else(|| {
                    ApiError::MalformedResponse(format!("comment {} has no updateAuthor", id))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!("Fetched {} comments", comments.len());
        Ok(comments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AuthMode, Config};
    use httpmock::prelude::*;
    use serde_json::json;

    fn client_for(server: &MockServer) -> JiraClient {
        let config = Config::new(&server.base_url(), "alice", "tok123", AuthMode::Basic);
        JiraClient::new(&config, false).unwrap()
    }

    #[tokio::test]
    async fn test_list_comments() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/rest/api/2/issue/ENG-1/comment");
                then.status(200).json_body(json!({
                    "startAt": 0,
                    "total": 2,
                    "comments": [
                        {
                            "id": "1",
                            "body": "First",
                            "author": {"displayName": "Writer"},
                            "updateAuthor": {"displayName": "Editor", "timeZone": "Europe/Amsterdam"},
                            "created": "2025-09-08T07:49:29.479+0200",
                            "updated": "2025-09-08T11:18:04.666+0200"
                        },
                        {
                            "id": "2",
                            "body": "Second",
                            "updateAuthor": {"displayName": "Bob", "timeZone": "UTC"},
                            "created": "2025-09-09T08:00:00.000+0000",
                            "updated": "2025-09-09T08:00:00.000+0000"
                        }
                    ]
                }));
            })
            .await;

        let comments = client_for(&server).list_comments("ENG-1").await.unwrap();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].author_display_name, "Editor");
        assert_eq!(comments[0].timezone, "Europe/Amsterdam");
        assert_eq!(comments[0].last_updated, "2025-09-08T11:18:04.666+0200");
        assert_eq!(comments[1].id, "2");
        assert_eq!(comments[1].body, "Second");
    }

    #[tokio::test]
    async fn test_no_comments() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/rest/api/2/issue/ENG-1/comment");
                then.status(200).json_body(json!({"comments": []}));
            })
            .await;

        let comments = client_for(&server).list_comments("ENG-1").await.unwrap();
        assert!(comments.is_empty());
    }

    #[tokio::test]
    async fn test_missing_update_author_is_malformed() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/rest/api/2/issue/ENG-1/comment");
                then.status(200).json_body(json!({
                    "comments": [{"id": "7", "body": "x", "created": "c", "updated": "u"}]
                }));
            })
            .await;

        let err = client_for(&server).list_comments("ENG-1").await.unwrap_err();
        match err {
            ApiError::MalformedResponse(msg) => assert!(msg.contains('7')),
            other => panic!("Expected MalformedResponse, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_server_error_keeps_raw_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/rest/api/2/issue/ENG-1/comment");
                then.status(500).body(r#"{"errorMessages":["boom"],"errors":{}}"#);
            })
            .await;

        let err = client_for(&server).list_comments("ENG-1").await.unwrap_err();
        assert_eq!(err.message(), "boom");
        match err {
            ApiError::Remote { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, r#"{"errorMessages":["boom"],"errors":{}}"#);
            }
            other => panic!("Expected Remote, got {:?}", other),
        }
    }
}
