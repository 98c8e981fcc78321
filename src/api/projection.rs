//! Partial-field projection for issue writes.
//!
//! Turns caller-supplied `IssueFields` into the `fields` object of a create or
//! update request, containing only what the caller actually set. Status and
//! assignee are never written here: status moves through transitions and the
//! assignee has its own endpoint.

use serde_json::{Map, Number, Value};

use super::error::{ApiError, Result};
use super::types::IssueFields;
use crate::config::CustomFieldSlots;

/// Build the JSON `fields` object for a write request.
///
/// An empty map means the caller set nothing.
///
/// # Errors
///
/// - `UnmappedField` if acceptance criteria or story points are set but the
///   deployment has no custom field key for them.
/// - `InvalidField` if story points are negative or not finite.
pub fn project_fields(fields: &IssueFields, slots: &CustomFieldSlots) -> Result<Map<String, Value>> {
    let mut out = Map::new();

    if !fields.summary.is_empty() {
        out.insert("summary".into(), Value::String(fields.summary.clone()));
    }
    if !fields.description.is_empty() {
        out.insert("description".into(), Value::String(fields.description.clone()));
    }
    if let Some(issue_type) = &fields.issue_type {
        if let Some(value) = reference(&[("id", &issue_type.id), ("name", &issue_type.name)]) {
            out.insert("issuetype".into(), value);
        }
    }
    if let Some(project) = &fields.project {
        if let Some(value) = reference(&[("key", &project.key), ("id", &project.id)]) {
            out.insert("project".into(), value);
        }
    }
    if let Some(priority) = &fields.priority {
        if let Some(value) = reference(&[("id", &priority.id), ("name", &priority.name)]) {
            out.insert("priority".into(), value);
        }
    }

    if !fields.acceptance_criteria.is_empty() {
        let key = slots
            .acceptance_criteria
            .as_ref()
            .ok_or(ApiError::UnmappedField {
                field: "acceptance criteria",
            })?;
        out.insert(key.clone(), Value::String(fields.acceptance_criteria.clone()));
    }

    if let Some(points) = fields.story_points {
        let key = slots.story_points.as_ref().ok_or(ApiError::UnmappedField {
            field: "story points",
        })?;
        out.insert(key.clone(), story_points_value(points)?);
    }

    Ok(out)
}

/// An `{id?, name?}` style reference holding only the non-empty members.
fn reference(pairs: &[(&str, &str)]) -> Option<Value> {
    let members: Map<String, Value> = pairs
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(name, value)| (name.to_string(), Value::String(value.to_string())))
        .collect();

    if members.is_empty() {
        None
    } else {
        Some(Value::Object(members))
    }
}

/// Whole numbers go out as integers so `5` is not sent as `5.0`.
fn story_points_value(points: f64) -> Result<Value> {
    if !points.is_finite() || points < 0.0 {
        return Err(ApiError::InvalidField {
            field: "story points",
            reason: format!("{} is not a non-negative number", points),
        });
    }

    if points.fract() == 0.0 && points <= u64::MAX as f64 {
        return Ok(Value::Number(Number::from(points as u64)));
    }

    Number::from_f64(points)
        .map(Value::Number)
        .ok_or_else(|| ApiError::InvalidField {
            field: "story points",
            reason: format!("{} cannot be represented in JSON", points),
        })
}
