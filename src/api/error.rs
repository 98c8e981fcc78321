//! API error types for the JIRA client.

use thiserror::Error;

/// Errors that can occur when interacting with the JIRA API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure: DNS, TLS, connection refused or timeout.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The request body could not be serialized.
    #[error("Failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// The response body could not be parsed.
    #[error("Failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),

    /// The server answered with an unexpected status.
    #[error("JIRA returned HTTP {status}: {body}")]
    Remote { status: u16, body: String },

    /// A lookup returned nothing where at least one result was required.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The server rejected a create, update or transition request.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A success response lacked an expected field.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// A custom field value was set but this deployment has no key for it.
    #[error("No custom field is configured for {field}")]
    UnmappedField { field: &'static str },

    /// A caller-supplied field value cannot be sent.
    #[error("Invalid value for {field}: {reason}")]
    InvalidField {
        field: &'static str,
        reason: String,
    },
}

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// Create a `Remote` error from a status and response body.
    pub fn remote(status: reqwest::StatusCode, body: impl Into<String>) -> Self {
        ApiError::Remote {
            status: status.as_u16(),
            body: body.into(),
        }
    }

    /// The HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Remote { status, .. } => Some(*status),
            ApiError::BadRequest(_) => Some(400),
            ApiError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the server refused our credentials.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }

    /// Readable detail for display.
    ///
    /// Server bodies are condensed with [`condense_body`]; the variant itself
    /// keeps the raw text.
    pub fn message(&self) -> String {
        match self {
            ApiError::Remote { body, .. } | ApiError::BadRequest(body) => condense_body(body),
            other => other.to_string(),
        }
    }
}

/// Condense a JIRA error body into one line.
///
/// Joins `errorMessages` and the `field: text` pairs of `errors` with ", ".
/// Bodies that are not JSON or carry neither are returned unchanged.
pub fn condense_body(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.to_string();
    };

    let mut parts: Vec<String> = Vec::new();
    if let Some(messages) = value.get("errorMessages").and_then(|v| v.as_array()) {
        parts.extend(messages.iter().filter_map(|m| m.as_str()).map(str::to_string));
    }
    if let Some(errors) = value.get("errors").and_then(|v| v.as_object()) {
        for (field, text) in errors {
            let text = text.as_str().map_or_else(|| text.to_string(), str::to_string);
            parts.push(format!("{}: {}", field, text));
        }
    }

    if parts.is_empty() {
        body.to_string()
    } else {
        parts.join(", ")
    }
}
