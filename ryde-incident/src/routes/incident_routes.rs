use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;
use validator::Validate;

use ryde_shared::errors::{AppError, AppResult};
use ryde_shared::middleware::{AppJson, AppPath, AppQuery};
use ryde_shared::types::api::ApiResponse;
use ryde_shared::types::auth::{AuthUser, UserRole};
use ryde_shared::types::pagination::PaginationParams;

use crate::models::Incident;
use crate::services::incident_service::{self, IncidentDetail};
use crate::validation::{validation_message, CreateIncidentRequest};
use crate::AppState;

/// POST /incidents
pub async fn create_incident(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    AppJson(req): AppJson<CreateIncidentRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<IncidentDetail>>)> {
    req.validate()
        .map_err(|e| AppError::Validation(validation_message(&e)))?;

    let incident = incident_service::create_incident(&state.db, auth.id, &req)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok_with_message(
            incident,
            "Incident reported successfully",
        )),
    ))
}

/// GET /incidents/me
pub async fn list_my_incidents(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    AppQuery(params): AppQuery<PaginationParams>,
) -> AppResult<Json<ApiResponse<Vec<IncidentDetail>>>> {
    let (items, pagination) = incident_service::get_my_incidents(&state.db, auth.id, &params)?;

    Ok(Json(ApiResponse::paginated(
        items,
        "My incidents retrieved successfully",
        pagination,
    )))
}

/// Reporter, reported user, or any admin.
fn can_view_incident(user: &AuthUser, incident: &Incident) -> bool {
    user.role == UserRole::Admin
        || incident.reporter_id == user.id
        || incident.reported_user_id == Some(user.id)
}

/// GET /incidents/:id
pub async fn get_incident(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<IncidentDetail>>> {
    let incident = incident_service::get_incident_by_id(&state.db, id)?;

    if !can_view_incident(&auth, &incident.incident) {
        return Err(AppError::forbidden(
            "You do not have permission to view this incident",
        ));
    }

    Ok(Json(ApiResponse::ok_with_message(
        incident,
        "Incident retrieved successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn incident_between(reporter_id: Uuid, reported_user_id: Option<Uuid>) -> Incident {
        Incident {
            id: Uuid::new_v4(),
            reporter_id,
            reported_user_id,
            incident_type: "OTHER".to_string(),
            title: "Phone left in the car".to_string(),
            description: "Left my phone on the back seat after drop-off.".to_string(),
            attachment_url: None,
            status: "PENDING".to_string(),
            admin_notes: None,
            resolved_at: None,
            closed_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn reporter_can_view_their_incident() {
        let reporter = AuthUser {
            id: Uuid::new_v4(),
            role: UserRole::User,
        };
        let incident = incident_between(reporter.id, None);
        assert!(can_view_incident(&reporter, &incident));
    }

    #[test]
    fn reported_user_can_view_the_incident() {
        let reported = AuthUser {
            id: Uuid::new_v4(),
            role: UserRole::Driver,
        };
        let incident = incident_between(Uuid::new_v4(), Some(reported.id));
        assert!(can_view_incident(&reported, &incident));
    }

    #[test]
    fn admins_can_view_any_incident() {
        let admin = AuthUser {
            id: Uuid::new_v4(),
            role: UserRole::Admin,
        };
        let incident = incident_between(Uuid::new_v4(), Some(Uuid::new_v4()));
        assert!(can_view_incident(&admin, &incident));
    }

    #[test]
    fn unrelated_users_are_denied() {
        let stranger = AuthUser {
            id: Uuid::new_v4(),
            role: UserRole::User,
        };
        let incident = incident_between(Uuid::new_v4(), Some(Uuid::new_v4()));
        assert!(!can_view_incident(&stranger, &incident));
    }

    #[test]
    fn unrelated_user_is_denied_when_no_one_is_reported() {
        let stranger = AuthUser {
            id: Uuid::new_v4(),
            role: UserRole::Driver,
        };
        let incident = incident_between(Uuid::new_v4(), None);
        assert!(!can_view_incident(&stranger, &incident));
    }

    #[tokio::test]
    async fn body_missing_a_field_gets_the_error_envelope() {
        use axum::extract::FromRequest;
        use axum::response::IntoResponse;

        let req = axum::http::Request::builder()
            .method("POST")
            .uri("/incidents")
            .header("content-type", "application/json")
            .body(axum::body::Body::from(
                r#"{"type": "HARASSMENT", "description": "The passenger shouted insults for most of the trip."}"#,
            ))
            .unwrap();

        let err = AppJson::<CreateIncidentRequest>::from_request(req, &())
            .await
            .err()
            .unwrap();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["success"], false);
        assert!(value["message"].as_str().unwrap().contains("title"));
    }
}
