use serde::Deserialize;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use ryde_shared::types::pagination::PaginationParams;

use crate::models::{IncidentStatus, IncidentType};

/// Body of `POST /incidents`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateIncidentRequest {
    #[serde(rename = "type")]
    #[validate(custom = "validate_incident_type")]
    pub incident_type: String,
    #[validate(length(min = 5, max = 100, message = "title must be between 5 and 100 characters"))]
    pub title: String,
    #[validate(length(
        min = 10,
        max = 2000,
        message = "description must be between 10 and 2000 characters"
    ))]
    pub description: String,
    pub reported_user_id: Option<Uuid>,
    #[validate(url(message = "attachmentUrl must be a valid URL"))]
    pub attachment_url: Option<String>,
}

/// Body of `PATCH /incidents/admin/:id/status`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIncidentStatusRequest {
    #[validate(custom = "validate_incident_status")]
    pub status: String,
    #[validate(length(max = 1000, message = "adminNotes must be at most 1000 characters"))]
    pub admin_notes: Option<String>,
}

/// Query string of the admin listing, filters plus page controls.
#[derive(Debug, Deserialize, Validate)]
pub struct ListIncidentsParams {
    #[validate(custom = "validate_incident_status")]
    pub status: Option<String>,
    #[serde(rename = "type")]
    #[validate(custom = "validate_incident_type")]
    pub incident_type: Option<String>,
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_page() -> u64 {
    1
}

fn default_limit() -> u64 {
    10
}

impl ListIncidentsParams {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            limit: self.limit,
        }
    }
}

fn validate_incident_type(value: &str) -> Result<(), ValidationError> {
    if value.parse::<IncidentType>().is_ok() {
        return Ok(());
    }
    let mut error = ValidationError::new("incident_type");
    error.message = Some(format!("type must be one of: {}", IncidentType::ALL.join(", ")).into());
    Err(error)
}

fn validate_incident_status(value: &str) -> Result<(), ValidationError> {
    if value.parse::<IncidentStatus>().is_ok() {
        return Ok(());
    }
    let mut error = ValidationError::new("incident_status");
    error.message =
        Some(format!("status must be one of: {}", IncidentStatus::ALL.join(", ")).into());
    Err(error)
}

/// Flattens validator output into a single client-facing message, one
/// clause per violated constraint. Sorted so the wording is stable.
pub fn validation_message(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, field_errors)| {
            field_errors.iter().map(move |error| match &error.message {
                Some(message) => message.to_string(),
                None => format!("{field} is invalid"),
            })
        })
        .collect();
    parts.sort();
    parts.join("; ")
}
