//! Authentication handling for the JIRA API.
//!
//! Supports Basic auth (username + API token) and Bearer auth (personal
//! access token). The header value is computed once; the raw token is never
//! kept on the `Auth` value.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use crate::config::AuthMode;

/// Authentication credentials for JIRA.
#[derive(Clone)]
pub struct Auth {
    /// The scheme in use.
    mode: AuthMode,
    /// The login this header was built for.
    username: String,
    /// The complete `Authorization` header value.
    auth_header: String,
}

impl Auth {
    /// Create credentials for the given scheme.
    ///
    /// The username only takes part in the header for `AuthMode::Basic`.
    pub fn new(mode: AuthMode, username: &str, credential: &str) -> Self {
        let auth_header = match mode {
            AuthMode::Basic => build_basic_header(username, credential),
            AuthMode::Bearer => build_bearer_header(credential),
        };
        Self {
            mode,
            username: username.to_string(),
            auth_header,
        }
    }

    /// Get the authorization header value for HTTP requests.
    pub fn header_value(&self) -> &str {
        &self.auth_header
    }

    /// Get the scheme.
    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    /// Get the login the header was built for.
    pub fn username(&self) -> &str {
        &self.username
    }
}

impl std::fmt::Debug for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Auth")
            .field("mode", &self.mode)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Encode "username:token" in Base64 and prepend "Basic ".
fn build_basic_header(username: &str, token: &str) -> String {
    let credentials = format!("{}:{}", username, token);
    let encoded = BASE64.encode(credentials.as_bytes());
    format!("Basic {}", encoded)
}

fn build_bearer_header(token: &str) -> String {
    format!("Bearer {}", token)
}
