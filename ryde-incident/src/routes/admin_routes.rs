use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use uuid::Uuid;
use validator::Validate;

use ryde_shared::errors::{AppError, AppResult};
use ryde_shared::middleware::{AdminUser, AppJson, AppPath, AppQuery};
use ryde_shared::types::api::ApiResponse;
use ryde_shared::types::pagination::PaginationParams;

use crate::services::incident_service::{self, IncidentDetail, IncidentFilters};
use crate::validation::{validation_message, ListIncidentsParams, UpdateIncidentStatusRequest};
use crate::AppState;

/// GET /incidents/admin/all
pub async fn list_all_incidents(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    AppQuery(params): AppQuery<ListIncidentsParams>,
) -> AppResult<Json<ApiResponse<Vec<IncidentDetail>>>> {
    params
        .validate()
        .map_err(|e| AppError::Validation(validation_message(&e)))?;

    let filters = IncidentFilters {
        status: params.status.clone(),
        incident_type: params.incident_type.clone(),
    };
    let (items, pagination) =
        incident_service::get_all_incidents(&state.db, &filters, &params.pagination())?;

    Ok(Json(ApiResponse::paginated(
        items,
        "All incidents retrieved successfully",
        pagination,
    )))
}

/// PATCH /incidents/admin/:id/status
pub async fn update_incident_status(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(req): AppJson<UpdateIncidentStatusRequest>,
) -> AppResult<Json<ApiResponse<IncidentDetail>>> {
    req.validate()
        .map_err(|e| AppError::Validation(validation_message(&e)))?;

    let updated =
        incident_service::update_incident_status(&state.db, id, &req.status, req.admin_notes)?;

    Ok(Json(ApiResponse::ok_with_message(
        updated,
        "Incident status updated successfully",
    )))
}

/// DELETE /incidents/admin/:id
pub async fn delete_incident(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    incident_service::delete_incident(&state.db, id)?;

    Ok(Json(ApiResponse::message_only(
        "Incident deleted successfully",
    )))
}

/// GET /incidents/admin/user/:user_id
pub async fn list_incidents_against_user(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    AppPath(user_id): AppPath<Uuid>,
    AppQuery(params): AppQuery<PaginationParams>,
) -> AppResult<Json<ApiResponse<Vec<IncidentDetail>>>> {
    let (items, pagination) =
        incident_service::get_incidents_against_user(&state.db, user_id, &params)?;

    Ok(Json(ApiResponse::paginated(
        items,
        "Incidents against user retrieved successfully",
        pagination,
    )))
}
