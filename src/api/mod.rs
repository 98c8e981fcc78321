//! JIRA API client and types.
//!
//! This module provides the interface for communicating with the JIRA REST API
//! (v2) and the agile API (1.0). Operations are `async` methods on
//! `JiraClient`, grouped by concern in the submodules below.

mod agile;
mod auth;
mod client;
mod comments;
pub mod error;
mod issues;
pub mod projection;
mod types;
mod workflow;

pub use agile::{my_issues_jql, search_path, IssuePage};
pub use auth::Auth;
pub use client::JiraClient;
pub use error::ApiError;
pub use issues::UpdateOutcome;
pub use types::{
    Assignee, Board, Comment, CreatedIssue, Issue, IssueFields, IssueType, Priority, Project,
    Sprint, Status, Transition, User,
};
