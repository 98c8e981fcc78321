//! `.env` file parsing and loading.
//!
//! Files use the usual `KEY=value` format. Values found in a file never
//! override variables that are already set in the process environment.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{ConfigError, Result};

/// Dotenv file names, tried in order. The first one that exists is loaded.
pub const DOTENV_FILES: &[&str] = &[".env", ".env.local"];

/// Parses dotenv content into a map of variables.
///
/// # Supported Formats
///
/// - Simple: `KEY=value`
/// - Quoted: `KEY="value with spaces"` or `KEY='single quoted'`
/// - Empty: `KEY=`
/// - Comments: `# This is a comment`
/// - Whitespace around equals: `KEY = value`
/// - Shell style: `export KEY=value`
/// - Values with equals signs: `URL=https://example.com?foo=bar`
pub struct EnvFileParser;

impl EnvFileParser {
    /// Parse dotenv content. Lines that are not assignments are skipped.
    pub fn parse(content: &str) -> HashMap<String, String> {
        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(Self::parse_line)
            .collect()
    }

    fn parse_line(line: &str) -> Option<(String, String)> {
        let line = line.strip_prefix("export ").unwrap_or(line);
        let (key, value) = line.split_once('=')?;
        let key = key.trim();
        if key.is_empty() {
            return None;
        }
        Some((key.to_string(), Self::unquote(value.trim())))
    }

    fn unquote(value: &str) -> String {
        let quoted = value.len() >= 2
            && ((value.starts_with('"') && value.ends_with('"'))
                || (value.starts_with('\'') && value.ends_with('\'')));
        if quoted {
            value[1..value.len() - 1].to_string()
        } else {
            value.to_string()
        }
    }
}

/// Load the first dotenv file found in `dir` into the process environment.
///
/// Returns the path that was loaded, or `None` when no candidate exists.
///
/// # Errors
///
/// Returns `ConfigError::ReadError` if a candidate exists but cannot be read.
pub fn load_dotenv(dir: &Path) -> Result<Option<PathBuf>> {
    for name in DOTENV_FILES {
        let path = dir.join(name);
        if !path.is_file() {
            continue;
        }

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::ReadError {
            path: path.clone(),
            source,
        })?;

        let vars = EnvFileParser::parse(&content);
        let applied = apply_missing(&vars);
        info!(path = %path.display(), applied, "Loaded dotenv file");
        return Ok(Some(path));
    }

    info!("No .env file found, using environment variables only");
    Ok(None)
}

/// Set every variable that the process environment does not define yet.
fn apply_missing(vars: &HashMap<String, String>) -> usize {
    let mut applied = 0;
    for (key, value) in vars {
        if std::env::var_os(key).is_some() {
            debug!(key = %key, "Keeping existing environment value");
            continue;
        }
        std::env::set_var(key, value);
        applied += 1;
    }
    applied
}
