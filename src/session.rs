//! Synchronous session façade over the JIRA client.
//!
//! The shell works with plain blocking calls; the session owns a small
//! runtime and drives each async client operation to completion. Each verb is
//! self-contained and may be called from several threads at once.

use tokio::runtime::{Builder, Runtime};
use tracing::{debug, info, instrument};

use crate::api::error::{ApiError, Result as ApiResult};
use crate::api::{
    Board, Comment, CreatedIssue, Issue, IssueFields, IssuePage, JiraClient, Sprint, Transition,
    UpdateOutcome, User,
};
use crate::config::{AuthMode, Config};
use crate::error::Result;

/// How the sprint report picks its board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardSelector {
    /// A known numeric board ID.
    Id(u64),
    /// An exact board name, resolved through the agile API.
    Name(String),
}

/// The operator's issues in a board's active sprint.
#[derive(Debug, Clone, PartialEq)]
pub struct SprintReport {
    /// The board the report was built for.
    pub board: Board,
    /// Every project key on the board, in server order.
    pub project_keys: Vec<String>,
    /// The project the search was restricted to.
    pub project_key: String,
    /// The board's active sprint.
    pub sprint: Sprint,
    /// Issues assigned to the operator.
    pub issues: Vec<Issue>,
    /// Total matches reported by the search, if any.
    pub total: Option<u32>,
}

impl SprintReport {
    /// Sum of the set story points. Unset estimates count as zero.
    pub fn total_story_points(&self) -> f64 {
        self.issues
            .iter()
            .filter_map(|issue| issue.fields.story_points)
            .sum()
    }

    /// Whether the server reported more matches than were fetched.
    pub fn truncated(&self) -> bool {
        self.total
            .is_some_and(|total| (self.issues.len() as u64) < u64::from(total))
    }
}

/// A connection to one JIRA instance.
pub struct Session {
    client: JiraClient,
    runtime: Runtime,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Create a session bound to `config`.
    ///
    /// `debug` additionally logs raw request and response bodies. No request
    /// is made here.
    pub fn new(config: &Config, debug: bool) -> Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        let client = JiraClient::new(config, debug)?;
        Ok(Self { client, runtime })
    }

    /// The JIRA base URL.
    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    /// The login used for JQL and assignment.
    pub fn username(&self) -> String {
        self.client.username()
    }

    /// The authentication scheme in use.
    pub fn auth_mode(&self) -> AuthMode {
        self.client.auth_mode()
    }

    /// Fetch the authenticated user and adopt the server-reported login.
    #[instrument(skip(self))]
    pub fn who_am_i(&self) -> ApiResult<User> {
        let user = self.runtime.block_on(self.client.get_current_user())?;
        if !user.name.is_empty() {
            self.client.set_username(&user.name);
        }
        Ok(user)
    }

    /// Create an issue from the set fields.
    pub fn create_issue(&self, fields: &IssueFields) -> ApiResult<CreatedIssue> {
        self.runtime.block_on(self.client.create_issue(fields))
    }

    /// Fetch an issue by ID or key.
    pub fn get_issue(&self, key: &str) -> ApiResult<Issue> {
        self.runtime.block_on(self.client.get_issue(key))
    }

    /// Update the set fields and, separately, the assignee.
    ///
    /// Returns `NoOp` without contacting the server when neither is given.
    #[instrument(skip(self, fields))]
    pub fn update_issue(
        &self,
        key: &str,
        fields: &IssueFields,
        assignee: Option<&str>,
    ) -> ApiResult<UpdateOutcome> {
        self.runtime.block_on(async {
            let mut outcome = self.client.update_issue(key, fields).await?;
            if let Some(login) = assignee.filter(|login| !login.is_empty()) {
                self.client.update_assignee(key, login).await?;
                outcome = UpdateOutcome::Updated;
            }
            if outcome == UpdateOutcome::NoOp {
                debug!("Nothing to update");
            }
            Ok(outcome)
        })
    }

    /// Assign an issue to a login.
    pub fn update_assignee(&self, key: &str, login: &str) -> ApiResult<()> {
        self.runtime.block_on(self.client.update_assignee(key, login))
    }

    /// Transitions available from the issue's current status.
    pub fn list_transitions(&self, key: &str) -> ApiResult<Vec<Transition>> {
        self.runtime.block_on(self.client.list_transitions(key))
    }

    /// Execute a transition.
    pub fn do_transition(&self, key: &str, transition_id: &str) -> ApiResult<()> {
        self.runtime
            .block_on(self.client.do_transition(key, transition_id))
    }

    /// Comments of an issue.
    pub fn list_comments(&self, key: &str) -> ApiResult<Vec<Comment>> {
        self.runtime.block_on(self.client.list_comments(key))
    }

    /// Find a board by exact name.
    pub fn resolve_board_by_name(&self, name: &str) -> ApiResult<Board> {
        self.runtime.block_on(self.client.resolve_board_by_name(name))
    }

    /// Project keys on a board.
    pub fn project_keys(&self, board_id: u64) -> ApiResult<Vec<String>> {
        self.runtime.block_on(self.client.project_keys(board_id))
    }

    /// The active sprint of a board.
    pub fn active_sprint(&self, board_id: u64) -> ApiResult<Sprint> {
        self.runtime.block_on(self.client.active_sprint(board_id))
    }

    /// The session user's issues in a sprint, first page only.
    pub fn my_issues_in_sprint(&self, project_key: &str, sprint_name: &str) -> ApiResult<Vec<Issue>> {
        let page = self.search_my_issues(project_key, sprint_name)?;
        Ok(page.issues)
    }

    fn search_my_issues(&self, project_key: &str, sprint_name: &str) -> ApiResult<IssuePage> {
        let login = self.username();
        self.runtime
            .block_on(self.client.my_issues_in_sprint(project_key, sprint_name, &login))
    }

    /// Build the "my work" report for a board's active sprint.
    ///
    /// `project` picks one of the board's projects; the first is used otherwise.
    #[instrument(skip(self))]
    pub fn sprint_report(&self, board: BoardSelector, project: Option<&str>) -> ApiResult<SprintReport> {
        let board = match board {
            BoardSelector::Id(id) => Board {
                id,
                name: String::new(),
            },
            BoardSelector::Name(name) => self.resolve_board_by_name(&name)?,
        };

        let project_keys = self.project_keys(board.id)?;
        let project_key = choose_project(&project_keys, project, board.id)?;
        let sprint = self.active_sprint(board.id)?;
        let page = self.search_my_issues(&project_key, &sprint.name)?;

        info!(
            board_id = board.id,
            project = %project_key,
            sprint = %sprint.name,
            issues = page.issues.len(),
            "Built sprint report"
        );

        Ok(SprintReport {
            board,
            project_keys,
            project_key,
            sprint,
            issues: page.issues,
            total: page.total,
        })
    }
}

fn choose_project(keys: &[String], wanted: Option<&str>, board_id: u64) -> ApiResult<String> {
    match wanted {
        Some(wanted) => keys
            .iter()
            .find(|key| key.as_str() == wanted)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("project {} on board {}", wanted, board_id))),
        None => keys
            .first()
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("projects on board {}", board_id))),
    }
}
