//! Workflow operations.
//!
//! Transitions are discovered per issue and never cached: the available set
//! depends on the issue's current status, so callers re-query before moving.

use reqwest::{Method, StatusCode};
use serde_json::json;
use tracing::{debug, info, instrument};

use super::client::{expect_status, expect_write_status, JiraClient};
use super::error::{ApiError, Result};
use super::issues::issue_path;
use super::types::{Transition, TransitionsResponse};

impl JiraClient {
    /// List the transitions available from the issue's current status.
    ///
    /// An empty list is a valid answer.
    #[instrument(skip(self), fields(issue_key = %key))]
    pub async fn list_transitions(&self, key: &str) -> Result<Vec<Transition>> {
        let path = format!("{}/transitions", issue_path(key));
        let response = self.request(Method::GET, &path, None::<&()>).await?;
        let response = expect_status(response, StatusCode::OK).await?;
        let body: TransitionsResponse = self.read_json(response).await?;

        let transitions = body.transitions.ok_or_else(|| {
            ApiError::MalformedResponse("transitions response has no 'transitions' array".into())
        })?;

        debug!("Found {} transitions", transitions.len());
        Ok(transitions)
    }

    /// Move an issue along the given transition.
    ///
    /// The server decides whether the transition is legal from the current
    /// status; a rejection is reported as `BadRequest`.
    #[instrument(skip(self), fields(issue_key = %key, transition_id = %transition_id))]
    pub async fn do_transition(&self, key: &str, transition_id: &str) -> Result<()> {
        let path = format!("{}/transitions", issue_path(key));
        let body = json!({ "transition": { "id": transition_id } });

        let response = self.request(Method::POST, &path, Some(&body)).await?;
        expect_write_status(response, StatusCode::NO_CONTENT).await?;

        info!("Transitioned issue");
        Ok(())
    }
}
