//! Terminal output formatting.
//!
//! Every function returns the text to print so output stays testable.

use std::fmt::Write;

use colored::*;

use crate::api::{Comment, CreatedIssue, Issue, User};
use crate::config::AuthMode;
use crate::session::SprintReport;

const RULE: &str = "--------------------------------";

/// Startup banner.
pub fn banner(debug: bool) -> String {
    let title = format!("jeera v{}", env!("CARGO_PKG_VERSION"));
    let mut out = if debug {
        format!("{} {}", title, "(Running in Debug Mode)".bold())
    } else {
        title
    };
    out.push_str("\n=================================");
    out
}

/// Connection summary printed after `whoAmI`.
pub fn connection(base_url: &str, user: Option<&User>, login: &str, auth_mode: AuthMode) -> String {
    let mut out = format!("Connected to: {}\n", base_url);
    if let Some(user) = user {
        let _ = writeln!(out, "Display Name: {}", user.display_name);
    }
    let _ = writeln!(out, "Name: {}", login);
    let _ = writeln!(out, "Authentication: {}", auth_mode.describe());
    out
}

/// An error line: red `[ERROR] <operation>:` prefix and the message.
pub fn error(operation: &str, message: &str) -> String {
    format!("{} {}", format!("[ERROR] {}:", operation).red().bold(), message)
}

/// A success line with a green check.
pub fn success(message: &str) -> String {
    format!("{} {}", "✅".green(), message.green())
}

/// Section header for an interactive flow.
pub fn section(title: &str) -> String {
    format!("\n--- {} ---", title).cyan().bold().to_string()
}

/// The "my work" sprint report.
pub fn sprint_report(report: &SprintReport) -> String {
    let mut out = String::new();

    if !report.board.name.is_empty() {
        let _ = writeln!(out, "Board ID: {}", report.board.id);
        let _ = writeln!(out, "Board Name: {}", report.board.name);
    }
    out.push_str("Associated Project Keys: -\n");
    for (i, key) in report.project_keys.iter().enumerate() {
        let marker = if *key == report.project_key { " *" } else { "" };
        let _ = writeln!(out, "Key {}: {}{}", i + 1, key, marker);
    }
    let _ = writeln!(out, "Active Sprint: {} (ID: {})", report.sprint.name, report.sprint.id);
    out.push_str("Your issues in the active sprint:-\n");

    for issue in &report.issues {
        let _ = writeln!(
            out,
            "{}\n{} : {}\n\t{}",
            issue.key.bright_white().bold(),
            issue.summary(),
            issue.story_points_label(),
            issue.status().unwrap_or("-")
        );
        let _ = writeln!(out, "{}\n", RULE);
    }

    let _ = writeln!(
        out,
        "Total Story Points assigned to you in this sprint: {}",
        report.total_story_points()
    );
    if report.truncated() {
        let _ = writeln!(
            out,
            "{}",
            format!(
                "Showing {} of {} matching issues.",
                report.issues.len(),
                report.total.unwrap_or_default()
            )
            .dimmed()
        );
    }
    out
}

/// Details of a single issue.
pub fn issue(issue: &Issue) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Key: {}", issue.key);
    let _ = writeln!(out, "ID: {}", issue.id);
    let _ = writeln!(out, "Summary: {}", issue.summary());
    let _ = writeln!(out, "Description: {}", issue.fields.description);
    let _ = writeln!(out, "Issue Type: {}", issue.issue_type().unwrap_or("-"));
    let _ = writeln!(out, "Assignee: {}", issue.assignee_name());
    if let Some(status) = issue.status() {
        let _ = writeln!(out, "Status: {}", status);
    }
    if let Some(priority) = issue.priority() {
        let _ = writeln!(out, "Priority: {}", priority);
    }
    if !issue.fields.acceptance_criteria.is_empty() {
        let _ = writeln!(out, "Acceptance Criteria: {}", issue.fields.acceptance_criteria);
    }
    let _ = writeln!(out, "Story Points: {}", issue.story_points_label());
    out
}

/// Result of a create.
pub fn created(created: &CreatedIssue) -> String {
    format!(
        "{}\nKey: {}\nID: {}",
        success("Issue created successfully!"),
        created.key,
        created.id
    )
}

/// A list of comments, oldest first.
pub fn comments(comments: &[Comment]) -> String {
    let mut out = String::new();
    for c in comments {
        let _ = writeln!(out, "\nCommentID {}", c.id);
        let _ = writeln!(out, "Author: {}", c.author_display_name);
        let _ = writeln!(out, "Created: {}", c.created);
        let _ = writeln!(out, "Last Updated: {}", c.last_updated);
        if !c.timezone.is_empty() {
            let _ = writeln!(out, "Timezone: {}", c.timezone);
        }
        let _ = writeln!(out, "------------------------------------------\n{}", c.body);
    }
    out
}
