//! Configuration management for Jeera.
//!
//! Connection details are read from the process environment, which may first
//! be seeded from a `.env` file in the working directory.

mod env_file;
mod settings;

use std::path::PathBuf;

use thiserror::Error;

pub use env_file::{load_dotenv, EnvFileParser, DOTENV_FILES};
pub use settings::{AuthMode, Config, CustomFieldSlots, HELP_TEXT};

/// Errors that can occur while resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// One or more required options are unset or empty.
    #[error("missing required configuration: {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    /// A dotenv file exists but could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
