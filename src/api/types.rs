//! JIRA API request and response types.
//!
//! Domain values (`Issue`, `Comment`, `Board`, ...) are plain immutable data.
//! Responses whose shape varies per deployment are first decoded into `Raw*`
//! targets that keep the fields we read and ignore the rest.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::config::CustomFieldSlots;

/// A JIRA user.
///
/// Returned by `GET /rest/api/2/myself`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// The login name. This is what JQL and the assignee endpoint expect.
    #[serde(default)]
    pub name: String,
    /// The user's display name.
    #[serde(default)]
    pub display_name: String,
    /// The user's email address (may be empty if hidden).
    #[serde(default, rename = "emailAddress")]
    pub email: String,
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name)
    }
}

/// Issue type reference (Bug, Story, Task, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IssueType {
    /// The issue type ID.
    #[serde(default)]
    pub id: String,
    /// The issue type name.
    #[serde(default)]
    pub name: String,
}

impl IssueType {
    /// Reference an issue type by name.
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }
}

/// Project reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// The project key (e.g., "PROJ").
    #[serde(default)]
    pub key: String,
    /// The project ID.
    #[serde(default)]
    pub id: String,
}

impl Project {
    /// Reference a project by key.
    pub fn keyed(key: &str) -> Self {
        Self {
            key: key.to_string(),
            ..Self::default()
        }
    }
}

/// Issue priority reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Priority {
    /// The priority ID.
    #[serde(default)]
    pub id: String,
    /// The priority name (e.g., "High").
    #[serde(default)]
    pub name: String,
}

/// Issue status.
///
/// Read-only here: status changes go through transitions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Status {
    /// The status ID.
    #[serde(default)]
    pub id: String,
    /// The status name (e.g., "To Do", "In Progress", "Done").
    #[serde(default)]
    pub name: String,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// The user an issue is assigned to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignee {
    /// The assignee's login name.
    #[serde(default)]
    pub name: String,
    /// The assignee's display name.
    #[serde(default)]
    pub display_name: String,
}

/// Issue fields.
///
/// Used both for issues read from the server and for caller-supplied
/// create/update requests. On the write path empty strings and `None` mean
/// "not set"; see `api::projection`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IssueFields {
    /// The issue summary/title.
    pub summary: String,
    /// The issue description.
    pub description: String,
    /// The issue type.
    pub issue_type: Option<IssueType>,
    /// The project the issue belongs to.
    pub project: Option<Project>,
    /// The issue priority.
    pub priority: Option<Priority>,
    /// The current workflow status.
    pub status: Option<Status>,
    /// The assignee.
    pub assignee: Option<Assignee>,
    /// Acceptance criteria, stored in a deployment custom field.
    pub acceptance_criteria: String,
    /// Story point estimate, stored in a deployment custom field.
    ///
    /// `None` means unset; `Some(0.0)` is a real zero estimate.
    pub story_points: Option<f64>,
}

/// A JIRA issue.
///
/// Returned by `GET /rest/api/2/issue/{issueIdOrKey}` or as part of search results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Issue {
    /// The server-assigned issue ID.
    pub id: String,
    /// The issue key (e.g., "PROJ-123").
    pub key: String,
    /// The issue fields.
    pub fields: IssueFields,
}

impl Issue {
    /// Get the issue summary.
    pub fn summary(&self) -> &str {
        &self.fields.summary
    }

    /// Get the issue status name, if the server returned one.
    pub fn status(&self) -> Option<&str> {
        self.fields.status.as_ref().map(|s| s.name.as_str())
    }

    /// Get the issue type name, if set.
    pub fn issue_type(&self) -> Option<&str> {
        self.fields.issue_type.as_ref().map(|t| t.name.as_str())
    }

    /// Get the issue priority name, if set.
    pub fn priority(&self) -> Option<&str> {
        self.fields.priority.as_ref().map(|p| p.name.as_str())
    }

    /// Get the assignee display name, if assigned.
    pub fn assignee(&self) -> Option<&str> {
        self.fields
            .assignee
            .as_ref()
            .map(|a| a.display_name.as_str())
    }

    /// Get the assignee display name, or "Unassigned" if not set.
    pub fn assignee_name(&self) -> &str {
        self.assignee().unwrap_or("Unassigned")
    }

    /// Get the priority name, or "None" if not set.
    pub fn priority_name(&self) -> &str {
        self.priority().unwrap_or("None")
    }

    /// Get the project key, if available.
    pub fn project_key(&self) -> Option<&str> {
        self.fields.project.as_ref().map(|p| p.key.as_str())
    }

    /// Story points for display: the number, or "-" when unset.
    pub fn story_points_label(&self) -> String {
        match self.fields.story_points {
            Some(points) => format!("{}", points),
            None => "-".to_string(),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.fields.summary)
    }
}

/// Result of creating an issue.
///
/// Returned by `POST /rest/api/2/issue`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedIssue {
    /// The new issue ID.
    pub id: String,
    /// The new issue key.
    pub key: String,
    /// REST URL of the new issue.
    #[serde(rename = "self", default)]
    pub self_url: String,
}

/// A workflow transition available from an issue's current status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    /// The transition ID.
    pub id: String,
    /// The transition name (e.g., "Start Progress").
    pub name: String,
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (ID: {})", self.name, self.id)
    }
}

/// A comment on a JIRA issue.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Comment {
    /// The comment ID.
    pub id: String,
    /// The comment text.
    pub body: String,
    /// Display name of the user who last updated the comment.
    pub author_display_name: String,
    /// When the comment was created (ISO-8601 with offset).
    pub created: String,
    /// When the comment was last updated (ISO-8601 with offset).
    pub last_updated: String,
    /// IANA time zone of the updating user.
    pub timezone: String,
}

/// An agile board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    /// Board IDs are numeric, unlike most JIRA IDs.
    pub id: u64,
    /// The board name.
    #[serde(default)]
    pub name: String,
}

/// A sprint on an agile board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sprint {
    /// The sprint ID.
    pub id: u64,
    /// The sprint name.
    #[serde(default)]
    pub name: String,
    /// The sprint state ("active", "closed", "future").
    #[serde(default)]
    pub state: Option<String>,
}

// ---------------------------------------------------------------------------
// Wire decode targets
// ---------------------------------------------------------------------------

/// Issue as returned by the server.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawIssue {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub fields: RawIssueFields,
}

/// Issue fields as returned by the server.
///
/// Custom fields land in `custom` and are picked out with the deployment's
/// configured keys.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RawIssueFields {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<Value>,
    #[serde(default)]
    pub issuetype: Option<IssueType>,
    #[serde(default)]
    pub project: Option<Project>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub status: Option<Status>,
    #[serde(default)]
    pub assignee: Option<Assignee>,
    #[serde(flatten)]
    pub custom: Map<String, Value>,
}

impl RawIssue {
    /// Convert into the domain model using the deployment's custom field keys.
    pub(crate) fn into_issue(self, slots: &CustomFieldSlots) -> Issue {
        let RawIssueFields {
            summary,
            description,
            issuetype,
            project,
            priority,
            status,
            assignee,
            custom,
        } = self.fields;

        let acceptance_criteria = slots
            .acceptance_criteria
            .as_ref()
            .and_then(|key| custom.get(key))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let story_points = slots
            .story_points
            .as_ref()
            .and_then(|key| custom.get(key))
            .and_then(Value::as_f64);

        Issue {
            id: self.id,
            key: self.key,
            fields: IssueFields {
                summary: summary.unwrap_or_default(),
                description: description.map(text_value).unwrap_or_default(),
                issue_type: issuetype,
                project,
                priority,
                status,
                assignee,
                acceptance_criteria,
                story_points,
            },
        }
    }
}

/// Render a text field. API v2 returns plain strings; anything else is shown raw.
fn text_value(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Search result from a JQL query.
///
/// Returned by `GET /rest/api/2/search`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchResult {
    /// The index of the first result.
    #[serde(default)]
    pub start_at: u32,
    /// Total number of matching issues.
    #[serde(default)]
    pub total: Option<u32>,
    /// The list of issues.
    #[serde(default)]
    pub issues: Option<Vec<RawIssue>>,
}

impl SearchResult {
    /// Check if the server holds more matches than this page returned.
    pub fn has_more(&self) -> bool {
        let returned = self.issues.as_ref().map_or(0, Vec::len) as u32;
        self.total
            .is_some_and(|total| self.start_at + returned < total)
    }
}

/// Transitions response.
///
/// Returned by `GET /rest/api/2/issue/{issueIdOrKey}/transitions`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TransitionsResponse {
    #[serde(default)]
    pub transitions: Option<Vec<Transition>>,
}

/// Comments response.
///
/// Returned by `GET /rest/api/2/issue/{issueIdOrKey}/comment`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CommentsResponse {
    #[serde(default)]
    pub comments: Option<Vec<RawComment>>,
}

/// A comment as returned by the server.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawComment {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub body: Option<Value>,
    #[serde(default)]
    pub update_author: Option<RawCommentAuthor>,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub updated: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawCommentAuthor {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub time_zone: Option<String>,
}

impl RawComment {
    /// Project into a `Comment`. Returns `None` when `updateAuthor` is absent.
    pub(crate) fn into_comment(self) -> Option<Comment> {
        let author = self.update_author?;
        Some(Comment {
            id: self.id,
            body: self.body.map(text_value).unwrap_or_default(),
            author_display_name: author.display_name,
            created: self.created,
            last_updated: self.updated,
            timezone: author.time_zone.unwrap_or_default(),
        })
    }
}

/// A page of agile resources (`{"values": [...]}`).
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ValuesPage<T> {
    pub values: Option<Vec<T>>,
}

/// Project entry of `GET /rest/agile/1.0/board/{id}/project`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct BoardProject {
    pub key: String,
}
