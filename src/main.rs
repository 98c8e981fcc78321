//! Jeera - an interactive command-line assistant for JIRA.

use std::process::ExitCode;

use clap::Parser;

use jeera::cli::{self, render, Args};
use jeera::config::{self, Config, HELP_TEXT};
use jeera::{logging, AppError, Session};

fn main() -> ExitCode {
    let args = Args::parse();

    // Load .env first so RUST_LOG set there reaches the log filter.
    let dotenv = std::env::current_dir()
        .map_err(AppError::from)
        .and_then(|dir| config::load_dotenv(&dir).map_err(AppError::from));

    if let Err(e) = logging::init(args.debug) {
        eprintln!("Warning: could not initialize logging: {}", e);
    }

    match dotenv {
        Ok(Some(path)) => tracing::info!(path = %path.display(), "Loaded environment file"),
        Ok(None) => tracing::debug!("No .env file found"),
        Err(err) => cli::report_error("loading .env", &err),
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            let err = AppError::from(e);
            tracing::error!(error = %err, "Invalid configuration");
            eprintln!("{}", render::error("Missing required configuration", &err.user_message()));
            eprintln!("{}", HELP_TEXT);
            return ExitCode::from(1);
        }
    };
    tracing::debug!(?config, "Resolved configuration");

    println!("{}", render::banner(args.debug));

    let session = match Session::new(&config, args.debug) {
        Ok(session) => session,
        Err(err) => {
            cli::report_error("starting session", &err);
            return exit_code(&err);
        }
    };

    let user = match session.who_am_i() {
        Ok(user) => Some(user),
        Err(e) => {
            cli::report_error("fetching user details", &AppError::from(e));
            None
        }
    };
    println!(
        "{}",
        render::connection(
            session.base_url(),
            user.as_ref(),
            &session.username(),
            session.auth_mode()
        )
    );

    cli::run(&session, &args);

    logging::shutdown();
    ExitCode::SUCCESS
}

fn exit_code(err: &AppError) -> ExitCode {
    if err.is_fatal() {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}
