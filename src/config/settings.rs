//! JIRA connection settings resolved from the environment.

use std::fmt;

use super::{ConfigError, Result};

/// Base URL of the JIRA instance.
pub const ENV_BASE_URL: &str = "JIRA_BASE_URL";
/// Login used for Basic auth until the server reports the real one.
pub const ENV_USERNAME: &str = "JIRA_USERNAME";
/// Personal access token. Takes precedence over `JIRA_API_TOKEN`.
pub const ENV_PAT: &str = "JIRA_PAT";
/// Legacy API token.
pub const ENV_API_TOKEN: &str = "JIRA_API_TOKEN";
/// Forces Bearer auth when set to exactly `"true"`.
pub const ENV_USE_PAT: &str = "JIRA_USE_PAT";
/// Custom field key holding acceptance criteria, e.g. `customfield_11028`.
pub const ENV_ACCEPTANCE_CRITERIA_FIELD: &str = "JIRA_ACCEPTANCE_CRITERIA_FIELD";
/// Custom field key holding story points, e.g. `customfield_10002`.
pub const ENV_STORY_POINTS_FIELD: &str = "JIRA_STORY_POINTS_FIELD";

/// Credentials longer than this are assumed to be personal access tokens.
const PAT_LENGTH_THRESHOLD: usize = 50;

/// Printed when required configuration is missing.
pub const HELP_TEXT: &str = "\
Please create a .env file or set environment variables:
  JIRA_BASE_URL  - Your JIRA instance URL (e.g., https://yourcompany.atlassian.net)
  JIRA_USERNAME  - Your JIRA username/email (e.g., your.email@company.com)
  JIRA_PAT       - Your JIRA Personal Access Token (recommended)
    OR
  JIRA_API_TOKEN - Your JIRA API token (legacy)

Optional:
  JIRA_USE_PAT                   - set to \"true\" to force Bearer authentication
  JIRA_ACCEPTANCE_CRITERIA_FIELD - custom field key for acceptance criteria
  JIRA_STORY_POINTS_FIELD        - custom field key for story points

Option 1 - Create .env file:
  cp .env.example .env
  # Edit .env file with your actual values

Option 2 - Use environment variables:
  export JIRA_BASE_URL=https://yourcompany.atlassian.net
  export JIRA_USERNAME=your.email@company.com
  export JIRA_PAT=your-personal-access-token";

/// How requests authenticate against the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// `Authorization: Basic base64(username:credential)`.
    Basic,
    /// `Authorization: Bearer credential`.
    Bearer,
}

impl AuthMode {
    /// Human readable description for the startup banner.
    pub fn describe(&self) -> &'static str {
        match self {
            AuthMode::Basic => "API Token (Basic)",
            AuthMode::Bearer => "Personal Access Token (Bearer)",
        }
    }
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMode::Basic => write!(f, "basic"),
            AuthMode::Bearer => write!(f, "bearer"),
        }
    }
}

/// Deployment-specific custom field keys.
///
/// JIRA tenants store acceptance criteria and story points under opaque
/// `customfield_NNNNN` keys. An unset slot means the value is neither read
/// from responses nor writable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomFieldSlots {
    /// Key for the acceptance criteria text.
    pub acceptance_criteria: Option<String>,
    /// Key for the story point estimate.
    pub story_points: Option<String>,
}

/// Resolved connection settings.
///
/// Created once at startup and read-only afterwards.
#[derive(Clone)]
pub struct Config {
    /// Origin of the JIRA host, without a trailing slash.
    pub base_url: String,
    /// Login name used for Basic auth.
    pub username: String,
    /// Opaque API token or PAT.
    pub credential: String,
    /// Authentication scheme.
    pub auth_mode: AuthMode,
    /// Custom field keys of this deployment.
    pub custom_fields: CustomFieldSlots,
}

impl Config {
    /// Create a configuration from explicit values.
    pub fn new(base_url: &str, username: &str, credential: &str, auth_mode: AuthMode) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            username: username.to_string(),
            credential: credential.to_string(),
            auth_mode,
            custom_fields: CustomFieldSlots::default(),
        }
    }

    /// Attach the deployment's custom field keys.
    pub fn with_custom_fields(mut self, custom_fields: CustomFieldSlots) -> Self {
        self.custom_fields = custom_fields;
        self
    }

    /// Resolve the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` when the base URL, username or
    /// credential is unset.
    pub fn from_env() -> Result<Self> {
        Self::resolve(|key| std::env::var(key).ok())
    }

    /// Resolve the configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated the same as unset ones.
    pub fn resolve<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let pat = var(ENV_PAT);
        let credential = pat.clone().or_else(|| var(ENV_API_TOKEN)).unwrap_or_default();
        let auth_mode = detect_auth_mode(pat.as_deref(), var(ENV_USE_PAT).as_deref(), &credential);

        let config = Self {
            base_url: var(ENV_BASE_URL)
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_default(),
            username: var(ENV_USERNAME).unwrap_or_default(),
            credential,
            auth_mode,
            custom_fields: CustomFieldSlots {
                acceptance_criteria: var(ENV_ACCEPTANCE_CRITERIA_FIELD),
                story_points: var(ENV_STORY_POINTS_FIELD),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate that every required option is present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` listing every absent option.
    pub fn validate(&self) -> Result<()> {
        let mut missing = Vec::new();
        if self.base_url.is_empty() {
            missing.push(ENV_BASE_URL);
        }
        if self.username.is_empty() {
            missing.push(ENV_USERNAME);
        }
        if self.credential.is_empty() {
            missing.push("JIRA_PAT or JIRA_API_TOKEN");
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Missing(missing))
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("credential", &"<redacted>")
            .field("auth_mode", &self.auth_mode)
            .field("custom_fields", &self.custom_fields)
            .finish()
    }
}

/// Pick Bearer when a PAT is given, forced, or the credential is PAT-sized.
fn detect_auth_mode(pat: Option<&str>, use_pat: Option<&str>, credential: &str) -> AuthMode {
    if pat.is_some() || use_pat == Some("true") || credential.len() > PAT_LENGTH_THRESHOLD {
        AuthMode::Bearer
    } else {
        AuthMode::Basic
    }
}
