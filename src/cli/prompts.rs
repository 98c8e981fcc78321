//! Interactive prompts.

use std::io;

use dialoguer::{theme::ColorfulTheme, Input, Select};

use crate::api::{IssueFields, IssueType, Project, Transition};

fn prompt_error(err: dialoguer::Error) -> io::Error {
    io::Error::new(io::ErrorKind::Other, err)
}

/// Read a trimmed line. Empty input is allowed.
pub fn text(prompt: &str) -> io::Result<String> {
    let value: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_error)?;
    Ok(value.trim().to_string())
}

/// Ask for an issue ID or key.
pub fn issue_key() -> io::Result<String> {
    text("Issue ID or Key")
}

/// Collect the fields of a new issue.
pub fn new_issue() -> io::Result<IssueFields> {
    let project = text("Project Key")?;
    let issue_type = text("Issue Type (e.g., Bug, Task, Story)")?;
    let summary = text("Summary")?;
    let description = text("Description (optional)")?;

    Ok(IssueFields {
        project: Some(Project::keyed(&project)),
        issue_type: Some(IssueType::named(&issue_type)),
        summary,
        description,
        ..IssueFields::default()
    })
}

/// Changes collected by the update prompt.
#[derive(Debug, Default)]
pub struct UpdateRequest {
    pub fields: IssueFields,
    pub assignee: Option<String>,
    /// Rejected story point input, reported to the user.
    pub invalid_story_points: Option<String>,
}

/// Collect the changes for an existing issue. Blank answers keep the current value.
pub fn issue_update() -> io::Result<UpdateRequest> {
    let summary = text("New Summary (leave empty to keep current)")?;
    let description = text("New Description (leave empty to keep current)")?;
    let acceptance_criteria = text("New Acceptance Criteria (leave empty to keep current)")?;
    let story_points = text("New Story Points (leave empty to keep current)")?;
    let assignee = text("New Assignee login (leave empty to keep current)")?;

    let (story_points, invalid_story_points) = match parse_story_points(&story_points) {
        Ok(points) => (points, None),
        Err(msg) => (None, Some(msg)),
    };

    Ok(UpdateRequest {
        fields: IssueFields {
            summary,
            description,
            acceptance_criteria,
            story_points,
            ..IssueFields::default()
        },
        assignee: Some(assignee).filter(|a| !a.is_empty()),
        invalid_story_points,
    })
}

/// Parse a story point answer. Blank means unset.
pub fn parse_story_points(input: &str) -> Result<Option<f64>, String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    match input.parse::<f64>() {
        Ok(points) if points.is_finite() && points >= 0.0 => Ok(Some(points)),
        Ok(_) => Err(format!("'{}' is not a non-negative number", input)),
        Err(err) => Err(format!("'{}': {}", input, err)),
    }
}

/// Pick one transition. `None` when the user cancels.
pub fn transition(transitions: &[Transition]) -> io::Result<Option<&Transition>> {
    let choice = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Select transition")
        .items(transitions)
        .default(0)
        .interact_opt()
        .map_err(prompt_error)?;
    Ok(choice.and_then(|i| transitions.get(i)))
}
