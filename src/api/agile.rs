//! Agile board queries and the "my issues in the active sprint" search.

use reqwest::{Method, StatusCode};
use tracing::{debug, info, instrument, warn};

use super::client::{expect_status, JiraClient};
use super::error::{ApiError, Result};
use super::types::{Board, BoardProject, Issue, SearchResult, Sprint, ValuesPage};

/// One page of search results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IssuePage {
    /// The issues on this page.
    pub issues: Vec<Issue>,
    /// Total matches reported by the server, if it reported one.
    pub total: Option<u32>,
}

impl IssuePage {
    /// Whether the server holds more matches than this page carries.
    pub fn truncated(&self) -> bool {
        self.total
            .is_some_and(|total| (self.issues.len() as u64) < u64::from(total))
    }
}

/// Build the JQL selecting a user's issues in a sprint.
///
/// The sprint is matched by name inside a JQL string literal, with `\` and
/// `"` backslash-escaped.
pub fn my_issues_jql(project_key: &str, sprint_name: &str, login: &str) -> String {
    let sprint = sprint_name.replace('\\', "\\\\").replace('"', "\\\"");
    format!(
        "project = {} AND sprint = \"{}\" AND assignee in ({})",
        project_key, sprint, login
    )
}

/// Path of a JQL search with the query percent-encoded.
pub fn search_path(jql: &str) -> String {
    format!("/rest/api/2/search?jql={}", urlencoding::encode(jql))
}

/// Take the first element of an agile `values` page.
fn first_value<T>(page: ValuesPage<T>, what: &str) -> Result<T> {
    let values = page
        .values
        .ok_or_else(|| ApiError::MalformedResponse(format!("{} response has no 'values' array", what)))?;
    values
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::NotFound(what.to_string()))
}

impl JiraClient {
    /// Find a board by its exact name. The first match wins.
    #[instrument(skip(self))]
    pub async fn resolve_board_by_name(&self, name: &str) -> Result<Board> {
        let path = format!("/rest/agile/1.0/board?name={}", urlencoding::encode(name));
        let response = self.request(Method::GET, &path, None::<&()>).await?;
        let response = expect_status(response, StatusCode::OK).await?;
        let page: ValuesPage<Board> = self.read_json(response).await?;

        let board = first_value(page, &format!("board named '{}'", name))?;
        info!(board_id = board.id, "Resolved board");
        Ok(board)
    }

    /// Keys of the projects on a board, in server order.
    #[instrument(skip(self))]
    pub async fn project_keys(&self, board_id: u64) -> Result<Vec<String>> {
        let path = format!("/rest/agile/1.0/board/{}/project", board_id);
        let response = self.request(Method::GET, &path, None::<&()>).await?;
        let response = expect_status(response, StatusCode::OK).await?;
        let page: ValuesPage<BoardProject> = self.read_json(response).await?;

        let keys: Vec<String> = page
            .values
            .ok_or_else(|| ApiError::MalformedResponse("board project response has no 'values' array".into()))?
            .into_iter()
            .map(|p| p.key)
            .collect();

        if keys.is_empty() {
            return Err(ApiError::NotFound(format!("projects on board {}", board_id)));
        }
        debug!(?keys, "Board projects");
        Ok(keys)
    }

    /// The board's active sprint.
    #[instrument(skip(self))]
    pub async fn active_sprint(&self, board_id: u64) -> Result<Sprint> {
        let path = format!("/rest/agile/1.0/board/{}/sprint?state=active", board_id);
        let response = self.request(Method::GET, &path, None::<&()>).await?;
        let response = expect_status(response, StatusCode::OK).await?;
        let page: ValuesPage<Sprint> = self.read_json(response).await?;

        let sprint = first_value(page, &format!("active sprint on board {}", board_id))?;
        info!(sprint_id = sprint.id, sprint = %sprint.name, "Active sprint");
        Ok(sprint)
    }

    /// Issues assigned to `login` in the named sprint of a project.
    ///
    /// Only the first page of results is fetched; a warning is logged when
    /// the server reports more matches.
    #[instrument(skip(self))]
    pub async fn my_issues_in_sprint(
        &self,
        project_key: &str,
        sprint_name: &str,
        login: &str,
    ) -> Result<IssuePage> {
        let jql = my_issues_jql(project_key, sprint_name, login);
        debug!(%jql, "Searching issues");

        let response = self
            .request(Method::GET, &search_path(&jql), None::<&()>)
            .await?;
        let response = expect_status(response, StatusCode::OK).await?;
        let result: SearchResult = self.read_json(response).await?;

        let more = result.has_more();
        let total = result.total;
        let raw = result
            .issues
            .ok_or_else(|| ApiError::MalformedResponse("search response has no 'issues' array".into()))?;
        let issues: Vec<Issue> = raw
            .into_iter()
            .map(|r| r.into_issue(self.custom_fields()))
            .collect();

        if more {
            warn!(
                returned = issues.len(),
                total = total.unwrap_or_default(),
                "Search results truncated to the first page"
            );
        }
        debug!("Found {} issues", issues.len());
        Ok(IssuePage { issues, total })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AuthMode, Config, CustomFieldSlots};
    use httpmock::prelude::*;
    use serde_json::json;

    fn client_for(server: &MockServer) -> JiraClient {
        let config = Config::new(&server.base_url(), "aliceL", "tok123", AuthMode::Basic)
            .with_custom_fields(CustomFieldSlots {
                acceptance_criteria: None,
                story_points: Some("customfield_10002".to_string()),
            });
        JiraClient::new(&config, false).unwrap()
    }

    #[test]
    fn test_my_issues_jql() {
        assert_eq!(
            my_issues_jql("ENG", "Sprint 7", "aliceL"),
            "project = ENG AND sprint = \"Sprint 7\" AND assignee in (aliceL)"
        );
    }

    #[test]
    fn test_my_issues_jql_escapes_sprint_literal() {
        assert_eq!(
            my_issues_jql("ENG", r#"Team "A" Sprint"#, "aliceL"),
            r#"project = ENG AND sprint = "Team \"A\" Sprint" AND assignee in (aliceL)"#
        );
        assert_eq!(
            my_issues_jql("ENG", r"R\D", "aliceL"),
            r#"project = ENG AND sprint = "R\\D" AND assignee in (aliceL)"#
        );
    }

    #[test]
    fn test_search_path_escapes_spaces_and_quotes() {
        let path = search_path(&my_issues_jql("ENG", "Sprint 7", "aliceL"));
        assert!(path.starts_with("/rest/api/2/search?jql="));
        assert!(path.contains("project%20%3D%20ENG%20AND%20sprint%20%3D%20%22Sprint%207%22"));
        assert!(path.contains("assignee%20in%20%28aliceL%29"));
        assert!(!path.contains(' '));
        assert!(!path.contains('"'));
    }

    #[test]
    fn test_issue_page_truncated() {
        let page = IssuePage {
            issues: vec![Issue::default()],
            total: Some(3),
        };
        assert!(page.truncated());
        assert!(!IssuePage::default().truncated());
        let page = IssuePage {
            issues: vec![Issue::default()],
            total: Some(1),
        };
        assert!(!page.truncated());
    }

    #[tokio::test]
    async fn test_resolve_board_by_name_encodes_name() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/rest/agile/1.0/board")
                    .query_param("name", "Core Team");
                then.status(200).json_body(json!({
                    "values": [
                        {"id": 14190, "name": "Core Team", "type": "scrum"},
                        {"id": 2, "name": "Core Team", "type": "kanban"}
                    ]
                }));
            })
            .await;

        let board = client_for(&server)
            .resolve_board_by_name("Core Team")
            .await
            .unwrap();
        assert_eq!(board.id, 14190);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_resolve_board_by_name_not_found() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/rest/agile/1.0/board");
                then.status(200).json_body(json!({"values": []}));
            })
            .await;

        let err = client_for(&server)
            .resolve_board_by_name("core")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_project_keys_in_server_order() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/rest/agile/1.0/board/14190/project");
                then.status(200).json_body(json!({
                    "values": [{"key": "ENG", "id": "1"}, {"key": "OPS", "id": "2"}]
                }));
            })
            .await;

        let keys = client_for(&server).project_keys(14190).await.unwrap();
        assert_eq!(keys, vec!["ENG".to_string(), "OPS".to_string()]);
    }

    #[tokio::test]
    async fn test_project_keys_empty_is_not_found() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/rest/agile/1.0/board/1/project");
                then.status(200).json_body(json!({"values": []}));
            })
            .await;

        let err = client_for(&server).project_keys(1).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_active_sprint() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/rest/agile/1.0/board/14190/sprint")
                    .query_param("state", "active");
                then.status(200).json_body(json!({
                    "values": [{"id": 77, "name": "Sprint 7", "state": "active"}]
                }));
            })
            .await;

        let sprint = client_for(&server).active_sprint(14190).await.unwrap();
        assert_eq!(sprint.id, 77);
        assert_eq!(sprint.name, "Sprint 7");
    }

    #[tokio::test]
    async fn test_no_active_sprint_is_not_found() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/rest/agile/1.0/board/14190/sprint")
                    .query_param("state", "active");
                then.status(200).json_body(json!({"values": []}));
            })
            .await;

        let err = client_for(&server).active_sprint(14190).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_my_issues_in_sprint() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/rest/api/2/search").query_param(
                    "jql",
                    "project = ENG AND sprint = \"Sprint 7\" AND assignee in (aliceL)",
                );
                then.status(200).json_body(json!({
                    "startAt": 0,
                    "maxResults": 50,
                    "total": 2,
                    "issues": [
                        {"id": "1", "key": "ENG-1", "fields": {"summary": "A", "customfield_10002": 3}},
                        {"id": "2", "key": "ENG-2", "fields": {"summary": "B", "customfield_10002": null}}
                    ]
                }));
            })
            .await;

        let page = client_for(&server)
            .my_issues_in_sprint("ENG", "Sprint 7", "aliceL")
            .await
            .unwrap();

        assert_eq!(page.issues.len(), 2);
        assert_eq!(page.issues[0].fields.story_points, Some(3.0));
        assert_eq!(page.issues[1].fields.story_points, None);
        assert!(!page.truncated());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_my_issues_in_sprint_reports_truncation() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/rest/api/2/search");
                then.status(200).json_body(json!({
                    "startAt": 0,
                    "maxResults": 1,
                    "total": 5,
                    "issues": [{"id": "1", "key": "ENG-1", "fields": {"summary": "A"}}]
                }));
            })
            .await;

        let page = client_for(&server)
            .my_issues_in_sprint("ENG", "Sprint 7", "aliceL")
            .await
            .unwrap();
        assert!(page.truncated());
        assert_eq!(page.total, Some(5));
    }

    #[tokio::test]
    async fn test_search_without_issues_is_malformed() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/rest/api/2/search");
                then.status(200).json_body(json!({"total": 0}));
            })
            .await;

        let err = client_for(&server)
            .my_issues_in_sprint("ENG", "Sprint 7", "aliceL")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_search_rejection_is_remote() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/rest/api/2/search");
                then.status(400)
                    .body(r#"{"errorMessages":["The value 'NOPE' does not exist for the field 'project'."]}"#);
            })
            .await;

        let err = client_for(&server)
            .my_issues_in_sprint("NOPE", "S", "aliceL")
            .await
            .unwrap_err();
        match err {
            ApiError::Remote { status, body } => {
                assert_eq!(status, 400);
                assert!(body.contains("NOPE"));
            }
            other => panic!("Expected Remote, got {:?}", other),
        }
    }
}
