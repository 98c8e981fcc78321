//! Jeera - an interactive command-line assistant for JIRA.
//!
//! The library exposes the JIRA interaction layer (`api`), configuration
//! resolution (`config`) and the blocking `Session` façade the shell drives.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod session;

pub use error::{AppError, Result};
pub use session::{BoardSelector, Session, SprintReport};
