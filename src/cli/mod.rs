//! Command-line shell.
//!
//! Parses arguments, then runs the requested flows against a `Session`.
//! Failures are printed and logged; a failed flow never stops the next one.

pub mod prompts;
pub mod render;

use clap::Parser;
use colored::*;
use tracing::error;

use crate::api::UpdateOutcome;
use crate::error::{AppError, Result};
use crate::session::{BoardSelector, Session};

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "jeera", version, about = "Interactive command-line assistant for JIRA")]
pub struct Args {
    /// JIRA board ID; shows your issues in its active sprint
    #[arg(long, value_name = "ID", conflicts_with = "board_name")]
    pub board: Option<u64>,

    /// JIRA board name, if the board ID is not known
    #[arg(long, value_name = "NAME")]
    pub board_name: Option<String>,

    /// Project key to use when the board has several projects
    #[arg(long, value_name = "KEY")]
    pub project: Option<String>,

    /// Create a new issue
    #[arg(long)]
    pub create: bool,

    /// Get an existing issue
    #[arg(long)]
    pub get: bool,

    /// Update an existing issue
    #[arg(long)]
    pub update: bool,

    /// Transition an existing issue
    #[arg(long)]
    pub trans: bool,

    /// Show the comments of an issue
    #[arg(long, value_name = "ISSUE")]
    pub comments: Option<String>,

    /// Verbose logging to stderr and raw HTTP bodies in the log
    #[arg(long)]
    pub debug: bool,
}

impl Args {
    /// The board to report on, if one was requested.
    pub fn board_selector(&self) -> Option<BoardSelector> {
        match (&self.board, &self.board_name) {
            (Some(id), _) => Some(BoardSelector::Id(*id)),
            (None, Some(name)) if !name.is_empty() => Some(BoardSelector::Name(name.clone())),
            _ => None,
        }
    }
}

/// Print and log a failed operation.
pub fn report_error(operation: &str, err: &AppError) {
    error!(operation, error = %err, "Operation failed");
    eprintln!("{}", render::error(operation, &err.user_message()));
}

/// Run every flow the arguments ask for, in a fixed order.
pub fn run(session: &Session, args: &Args) {
    if let Some(board) = args.board_selector() {
        if let Err(err) = sprint_report(session, board, args.project.as_deref()) {
            report_error("getting issues in active sprint", &err);
        }
    }
    if args.create {
        if let Err(err) = create_issue(session) {
            report_error("creating issue", &err);
        }
    }
    if args.get {
        if let Err(err) = get_issue(session) {
            report_error("getting issue", &err);
        }
    }
    if args.update {
        if let Err(err) = update_issue(session) {
            report_error("updating issue", &err);
        }
    }
    if args.trans {
        if let Err(err) = transition_issue(session) {
            report_error("performing transition", &err);
        }
    }
    if let Some(key) = &args.comments {
        if let Err(err) = show_comments(session, key) {
            report_error("getting comments", &err);
        }
    }
}

fn sprint_report(session: &Session, board: BoardSelector, project: Option<&str>) -> Result<()> {
    let report = session.sprint_report(board, project)?;
    print!("{}", render::sprint_report(&report));
    Ok(())
}

fn create_issue(session: &Session) -> Result<()> {
    println!("{}", render::section("Create New Issue"));
    let fields = prompts::new_issue()?;
    let created = session.create_issue(&fields)?;
    println!("{}", render::created(&created));
    Ok(())
}

fn get_issue(session: &Session) -> Result<()> {
    println!("{}", render::section("Get Issue"));
    let key = prompts::issue_key()?;
    let issue = session.get_issue(&key)?;
    println!("{}", render::success("Issue retrieved successfully!"));
    print!("{}", render::issue(&issue));
    Ok(())
}

fn update_issue(session: &Session) -> Result<()> {
    println!("{}", render::section("Update Issue"));
    let key = prompts::issue_key()?;
    let request = prompts::issue_update()?;
    if let Some(msg) = &request.invalid_story_points {
        eprintln!("{}", render::error("Invalid story points value", msg));
    }

    let outcome = session.update_issue(&key, &request.fields, request.assignee.as_deref())?;
    match outcome {
        UpdateOutcome::Updated => {
            println!("{}", render::success(&format!("Issue {} updated successfully!", key)));
        }
        UpdateOutcome::NoOp => println!("{}", "No changes specified.".yellow()),
    }
    Ok(())
}

fn transition_issue(session: &Session) -> Result<()> {
    println!("{}", render::section("Transition Issue"));
    let key = prompts::issue_key()?;

    let transitions = session.list_transitions(&key)?;
    if transitions.is_empty() {
        println!("No transitions available for this issue.");
        return Ok(());
    }

    let Some(chosen) = prompts::transition(&transitions)? else {
        println!("{}", "No transition selected".yellow());
        return Ok(());
    };

    session.do_transition(&key, &chosen.id)?;
    println!(
        "{}",
        render::success(&format!("Issue {} transitioned to '{}' successfully!", key, chosen.name))
    );
    Ok(())
}

fn show_comments(session: &Session, key: &str) -> Result<()> {
    println!("{}", render::section("Get Comments"));
    let key = if key.trim().is_empty() {
        prompts::issue_key()?
    } else {
        key.trim().to_string()
    };

    let comments = session.list_comments(&key)?;
    if comments.is_empty() {
        println!("No comments found for this issue.");
        return Ok(());
    }

    println!(
        "{}",
        render::success(&format!("Comments retrieved successfully! Total: {}", comments.len()))
    );
    print!("{}", render::comments(&comments));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_are_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_board_selector() {
        let args = Args::parse_from(["jeera", "--board", "14190"]);
        assert_eq!(args.board_selector(), Some(BoardSelector::Id(14190)));

        let args = Args::parse_from(["jeera", "--board-name", "Core Team", "--project", "OPS"]);
        assert_eq!(
            args.board_selector(),
            Some(BoardSelector::Name("Core Team".to_string()))
        );
        assert_eq!(args.project.as_deref(), Some("OPS"));

        let args = Args::parse_from(["jeera", "--get"]);
        assert_eq!(args.board_selector(), None);
        assert!(args.get);
    }

    #[test]
    fn test_board_and_board_name_conflict() {
        let result = Args::try_parse_from(["jeera", "--board", "1", "--board-name", "Core"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_comments_takes_issue() {
        let args = Args::parse_from(["jeera", "--comments", "ENG-1", "--debug"]);
        assert_eq!(args.comments.as_deref(), Some("ENG-1"));
        assert!(args.debug);
    }
}
