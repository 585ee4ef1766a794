use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::schema::{incidents, users};

// --- Vocabularies ---

/// Incident categories. Stored as text so the set can grow without a
/// database migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncidentType {
    DriverBehavior,
    SafetyIssue,
    VehicleIssue,
    PassengerBehavior,
    Harassment,
    Other,
}

impl IncidentType {
    pub const ALL: [&'static str; 6] = [
        "DRIVER_BEHAVIOR",
        "SAFETY_ISSUE",
        "VEHICLE_ISSUE",
        "PASSENGER_BEHAVIOR",
        "HARASSMENT",
        "OTHER",
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IncidentType::DriverBehavior => "DRIVER_BEHAVIOR",
            IncidentType::SafetyIssue => "SAFETY_ISSUE",
            IncidentType::VehicleIssue => "VEHICLE_ISSUE",
            IncidentType::PassengerBehavior => "PASSENGER_BEHAVIOR",
            IncidentType::Harassment => "HARASSMENT",
            IncidentType::Other => "OTHER",
        }
    }
}

impl FromStr for IncidentType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DRIVER_BEHAVIOR" => Ok(IncidentType::DriverBehavior),
            "SAFETY_ISSUE" => Ok(IncidentType::SafetyIssue),
            "VEHICLE_ISSUE" => Ok(IncidentType::VehicleIssue),
            "PASSENGER_BEHAVIOR" => Ok(IncidentType::PassengerBehavior),
            "HARASSMENT" => Ok(IncidentType::Harassment),
            "OTHER" => Ok(IncidentType::Other),
            _ => Err(()),
        }
    }
}

impl fmt::Display for IncidentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Triage lifecycle of an incident.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncidentStatus {
    Pending,
    Reviewed,
    Resolved,
    Closed,
}

impl IncidentStatus {
    pub const ALL: [&'static str; 4] = ["PENDING", "REVIEWED", "RESOLVED", "CLOSED"];

    pub fn as_str(&self) -> &'static str {
        match self {
            IncidentStatus::Pending => "PENDING",
            IncidentStatus::Reviewed => "REVIEWED",
            IncidentStatus::Resolved => "RESOLVED",
            IncidentStatus::Closed => "CLOSED",
        }
    }
}

impl FromStr for IncidentStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(IncidentStatus::Pending),
            "REVIEWED" => Ok(IncidentStatus::Reviewed),
            "RESOLVED" => Ok(IncidentStatus::Resolved),
            "CLOSED" => Ok(IncidentStatus::Closed),
            _ => Err(()),
        }
    }
}

impl fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Incident ---

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = incidents)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    pub id: Uuid,
    pub reporter_id: Uuid,
    pub reported_user_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub incident_type: String,
    pub title: String,
    pub description: String,
    pub attachment_url: Option<String>,
    pub status: String,
    pub admin_notes: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = incidents)]
pub struct NewIncident {
    pub reporter_id: Uuid,
    pub reported_user_id: Option<Uuid>,
    pub incident_type: String,
    pub title: String,
    pub description: String,
    pub attachment_url: Option<String>,
    pub status: String,
}

/// Changeset for an admin status update. `None` fields are left untouched,
/// so resolution timestamps written by an earlier transition survive.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = incidents)]
pub struct IncidentStatusChange {
    pub status: String,
    pub admin_notes: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
}

// --- User ---

/// Account row as the incident service sees it. Never serialized directly;
/// responses go through the per-view summary projection instead.
#[derive(Debug, Queryable, Identifiable, Clone)]
#[diesel(table_name = users)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incident_type_round_trips() {
        for name in IncidentType::ALL {
            let parsed: IncidentType = name.parse().unwrap();
            assert_eq!(parsed.as_str(), name);
        }
    }

    #[test]
    fn incident_status_round_trips() {
        for name in IncidentStatus::ALL {
            let parsed: IncidentStatus = name.parse().unwrap();
            assert_eq!(parsed.as_str(), name);
        }
    }

    #[test]
    fn unknown_vocabulary_values_are_rejected() {
        assert!("ROAD_RAGE".parse::<IncidentType>().is_err());
        assert!("pending".parse::<IncidentStatus>().is_err());
        assert!("".parse::<IncidentStatus>().is_err());
    }

    #[test]
    fn incident_serializes_with_wire_field_names() {
        let incident = Incident {
            id: Uuid::nil(),
            reporter_id: Uuid::nil(),
            reported_user_id: None,
            incident_type: "SAFETY_ISSUE".to_string(),
            title: "Unsafe lane change on highway".to_string(),
            description: "Driver repeatedly changed lanes without signaling.".to_string(),
            attachment_url: None,
            status: "PENDING".to_string(),
            admin_notes: None,
            resolved_at: None,
            closed_at: None,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&incident).unwrap();
        assert_eq!(json["type"], "SAFETY_ISSUE");
        assert_eq!(json["status"], "PENDING");
        assert!(json.get("reporterId").is_some());
        assert!(json.get("reportedUserId").is_some());
        assert!(json.get("attachmentUrl").is_some());
        assert!(json.get("adminNotes").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("incident_type").is_none());
        assert!(json.get("reporter_id").is_none());
    }
}
