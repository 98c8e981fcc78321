//! JIRA API client implementation.
//!
//! This module provides the transport for the JIRA REST API v2 and the agile
//! API 1.0: it builds authenticated JSON requests, executes them with a fixed
//! timeout and hands the raw response back. Status interpretation is left to
//! each operation because success codes differ (200, 201, 204).

use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use reqwest::{header, Client, Method, Request, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use super::auth::Auth;
use super::error::{ApiError, Result};
use super::types::User;
use crate::config::{AuthMode, Config, CustomFieldSlots};

/// Overall per-request timeout.
pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// The JIRA API client.
///
/// Cheap to share by reference; concurrent requests are independent.
#[derive(Debug)]
pub struct JiraClient {
    /// The HTTP client.
    client: Client,
    /// The base URL for the JIRA instance.
    base_url: String,
    /// The credential, kept so the header can be rebuilt for a new login.
    credential: Credential,
    /// Authentication header for the current login.
    auth: RwLock<Auth>,
    /// Deployment custom field keys.
    custom_fields: CustomFieldSlots,
    /// Overall per-request timeout.
    timeout: Duration,
    /// Log raw request and response bodies.
    debug: bool,
}

/// Opaque credential wrapper that never prints its value.
#[derive(Clone)]
struct Credential(String);

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

impl JiraClient {
    /// Create a new JIRA client from resolved configuration.
    ///
    /// Does not contact the server.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Network` if the HTTP client cannot be built.
    pub fn new(config: &Config, debug: bool) -> Result<Self> {
        Self::with_timeout(config, debug, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom per-request timeout.
    pub(crate) fn with_timeout(config: &Config, debug: bool, timeout: Duration) -> Result<Self> {
        let client = Self::build_http_client(timeout)?;
        let base_url = normalize_base_url(&config.base_url);
        let auth = Auth::new(config.auth_mode, &config.username, &config.credential);

        debug!(base_url = %base_url, auth_mode = %config.auth_mode, "Created JIRA client");

        Ok(Self {
            client,
            base_url,
            credential: Credential(config.credential.clone()),
            auth: RwLock::new(auth),
            custom_fields: config.custom_fields.clone(),
            timeout,
            debug,
        })
    }

    /// Build the HTTP client with appropriate settings.
    fn build_http_client(timeout: Duration) -> Result<Client> {
        Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::Network)
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Get the deployment custom field keys.
    pub fn custom_fields(&self) -> &CustomFieldSlots {
        &self.custom_fields
    }

    /// Get the login currently used for JQL and assignment.
    pub fn username(&self) -> String {
        self.auth
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .username()
            .to_string()
    }

    /// Get the authentication scheme.
    pub fn auth_mode(&self) -> AuthMode {
        self.auth
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .mode()
    }

    /// Replace the configured login with the one the server reported.
    ///
    /// Idempotent. Basic auth headers are rebuilt for the new login.
    pub fn set_username(&self, login: &str) {
        let mut auth = self.auth.write().unwrap_or_else(PoisonError::into_inner);
        if auth.username() == login {
            return;
        }
        info!(from = %auth.username(), to = %login, "Using server-reported login");
        *auth = Auth::new(auth.mode(), login, &self.credential.0);
    }

    /// Get the current authenticated user.
    ///
    /// Calls `GET /rest/api/2/myself`.
    #[instrument(skip(self))]
    pub async fn get_current_user(&self) -> Result<User> {
        let response = self.request(Method::GET, "/rest/api/2/myself", None::<&()>).await?;
        let response = expect_status(response, StatusCode::OK).await?;
        let user: User = self.read_json(response).await?;
        info!(login = %user.name, "Connected as user: {}", user.display_name);
        Ok(user)
    }

    /// Build an authenticated request.
    ///
    /// `path` must already be URL-escaped.
    ///
    /// # Errors
    ///
    /// - `Encode` if the body cannot be serialized.
    /// - `Network` if the URL is invalid.
    pub fn build_request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Request> {
        let url = format!("{}{}", self.base_url, path);
        let auth_header = self
            .auth
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .header_value()
            .to_string();

        let mut builder = self
            .client
            .request(method, &url)
            .header(header::AUTHORIZATION, auth_header)
            .header(header::ACCEPT, "application/json")
            .header(header::CONTENT_TYPE, "application/json");

        if let Some(body) = body {
            let bytes = serde_json::to_vec(body).map_err(ApiError::Encode)?;
            if self.debug {
                debug!(body = %String::from_utf8_lossy(&bytes), "Request body");
            }
            builder = builder.body(bytes);
        }

        Ok(builder.build()?)
    }

    /// Perform an authenticated request and return the raw response.
    ///
    /// Does not interpret the status code.
    #[instrument(skip(self, body), fields(method = %method, path = %path))]
    pub async fn request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response> {
        let request = self.build_request(method, path, body)?;
        let response = self.client.execute(request).await?;
        debug!(status = %response.status(), "Response received");
        Ok(response)
    }

    /// Read a success response body as JSON.
    pub(crate) async fn read_json<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        let bytes = response.bytes().await?;
        if self.debug {
            debug!(body = %String::from_utf8_lossy(&bytes), "Response body");
        }
        serde_json::from_slice(&bytes).map_err(ApiError::Decode)
    }
}

/// Accept `expected` from a read, otherwise return `Remote` with the raw body.
pub(crate) async fn expect_status(response: Response, expected: StatusCode) -> Result<Response> {
    check_status(response, expected, false).await
}

/// Accept `expected` from a create, update or transition.
///
/// A 400 means the server rejected the submitted data and becomes
/// `BadRequest`; any other status becomes `Remote`.
pub(crate) async fn expect_write_status(response: Response, expected: StatusCode) -> Result<Response> {
    check_status(response, expected, true).await
}

async fn check_status(response: Response, expected: StatusCode, write: bool) -> Result<Response> {
    let status = response.status();
    if status == expected {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    debug!("Error response body: {}", body);

    if write && status == StatusCode::BAD_REQUEST {
        Err(ApiError::BadRequest(body))
    } else {
        Err(ApiError::remote(status, body))
    }
}

/// Normalize the base URL by removing trailing slashes and warning on plain HTTP.
fn normalize_base_url(url: &str) -> String {
    let url = url.trim_end_matches('/');

    if !url.starts_with("https://") && !url.contains("localhost") && !url.contains("127.0.0.1") {
        warn!("URL does not use HTTPS: {}. This is insecure for production use.", url);
    }

    url.to_string()
}
