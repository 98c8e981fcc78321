//! Issue operations: create, get, partial update and assignee update.

use reqwest::{Method, StatusCode};
use serde_json::json;
use tracing::{debug, info, instrument};

use super::client::{expect_status, expect_write_status, JiraClient};
use super::error::{ApiError, Result};
use super::projection::project_fields;
use super::types::{CreatedIssue, Issue, IssueFields, RawIssue};

/// What an update call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The server accepted the change.
    Updated,
    /// Nothing was set, so no request was sent.
    NoOp,
}

/// Path of a single issue. Keys are escaped as one path segment.
pub(crate) fn issue_path(key: &str) -> String {
    format!("/rest/api/2/issue/{}", urlencoding::encode(key))
}

impl JiraClient {
    /// Create an issue.
    ///
    /// Only the fields the caller set are sent; see `api::projection`.
    ///
    /// # Errors
    ///
    /// - `BadRequest` if the server rejects the fields (HTTP 400).
    /// - `Remote` for any other unexpected status.
    #[instrument(skip(self, fields))]
    pub async fn create_issue(&self, fields: &IssueFields) -> Result<CreatedIssue> {
        let projected = project_fields(fields, self.custom_fields())?;
        let body = json!({ "fields": projected });

        let response = self
            .request(Method::POST, "/rest/api/2/issue", Some(&body))
            .await?;
        let response = expect_write_status(response, StatusCode::CREATED).await?;
        let created: CreatedIssue = self.read_json(response).await?;

        info!(key = %created.key, "Created issue");
        Ok(created)
    }

    /// Fetch a single issue by ID or key.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` on HTTP 404.
    #[instrument(skip(self), fields(issue_key = %key))]
    pub async fn get_issue(&self, key: &str) -> Result<Issue> {
        debug!("Fetching issue");

        let response = self
            .request(Method::GET, &issue_path(key), None::<&()>)
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(format!("Issue '{}' not found", key)));
        }
        let response = expect_status(response, StatusCode::OK).await?;
        let raw: RawIssue = self.read_json(response).await?;
        let issue = raw.into_issue(self.custom_fields());

        debug!("Fetched issue: {}", issue.key);
        Ok(issue)
    }

    /// Update the set fields of an issue.
    ///
    /// Status and assignee are never part of this request. When nothing is
    /// set the call returns `UpdateOutcome::NoOp` without contacting the server.
    #[instrument(skip(self, fields), fields(issue_key = %key))]
    pub async fn update_issue(&self, key: &str, fields: &IssueFields) -> Result<UpdateOutcome> {
        let projected = project_fields(fields, self.custom_fields())?;
        if projected.is_empty() {
            debug!("No fields set, skipping update");
            return Ok(UpdateOutcome::NoOp);
        }

        let changed: Vec<&str> = projected.keys().map(String::as_str).collect();
        debug!(fields = ?changed, "Updating issue");

        let body = json!({ "fields": projected });
        let response = self
            .request(Method::PUT, &issue_path(key), Some(&body))
            .await?;
        expect_write_status(response, StatusCode::NO_CONTENT).await?;

        info!("Updated issue");
        Ok(UpdateOutcome::Updated)
    }

    /// Assign an issue to a user by login name.
    #[instrument(skip(self), fields(issue_key = %key))]
    pub async fn update_assignee(&self, key: &str, login: &str) -> Result<()> {
        let path = format!("{}/assignee", issue_path(key));
        let body = json!({ "name": login });

        let response = self.request(Method::PUT, &path, Some(&body)).await?;
        expect_write_status(response, StatusCode::NO_CONTENT).await?;

        info!(assignee = %login, "Updated assignee");
        Ok(())
    }
}
