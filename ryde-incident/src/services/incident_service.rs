use std::collections::HashMap;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use ryde_shared::clients::db::DbPool;
use ryde_shared::errors::{AppError, AppResult};
use ryde_shared::types::pagination::{Pagination, PaginationParams};

use crate::models::{Incident, IncidentStatus, IncidentStatusChange, NewIncident, User};
use crate::schema::{incidents, users};
use crate::validation::CreateIncidentRequest;

// --- Response projections ---

/// How much of the involved users each operation exposes.
///
/// The reporter-facing list stays minimal, admin views carry contact and
/// role details, and the create/status-update confirmations sit in
/// between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryView {
    /// id, username and name only.
    Basic,
    /// Basic plus email.
    WithEmail,
    /// Basic plus role.
    WithRole,
    /// Basic plus email and role.
    Full,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl UserSummary {
    fn project(user: &User, view: SummaryView) -> Self {
        let email = matches!(view, SummaryView::WithEmail | SummaryView::Full)
            .then(|| user.email.clone());
        let role =
            matches!(view, SummaryView::WithRole | SummaryView::Full).then(|| user.role.clone());

        Self {
            id: user.id,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email,
            role,
        }
    }
}

/// An incident with its involved users attached. `reporter` and
/// `reportedUser` are `null` when the account no longer exists.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentDetail {
    #[serde(flatten)]
    pub incident: Incident,
    pub reporter: Option<UserSummary>,
    pub reported_user: Option<UserSummary>,
}

/// Optional admin listing filters; `None` means no restriction.
#[derive(Debug, Default)]
pub struct IncidentFilters {
    pub status: Option<String>,
    pub incident_type: Option<String>,
}

// --- Pure cores ---

/// Insert payload for a new report. Every report starts out `PENDING`.
pub fn new_incident(reporter_id: Uuid, req: &CreateIncidentRequest) -> NewIncident {
    NewIncident {
        reporter_id,
        reported_user_id: req.reported_user_id,
        incident_type: req.incident_type.clone(),
        title: req.title.clone(),
        description: req.description.clone(),
        attachment_url: req.attachment_url.clone(),
        status: IncidentStatus::Pending.as_str().to_string(),
    }
}

/// Builds the changeset for a status transition.
///
/// `resolved_at` / `closed_at` are stamped only on the first entry into
/// RESOLVED / CLOSED; revisiting a state keeps the original timestamp.
/// `None` notes leave the stored notes untouched.
pub fn status_change(
    incident: &Incident,
    status: &str,
    admin_notes: Option<String>,
    now: DateTime<Utc>,
) -> IncidentStatusChange {
    let newly_resolved =
        status == IncidentStatus::Resolved.as_str() && incident.resolved_at.is_none();
    let newly_closed = status == IncidentStatus::Closed.as_str() && incident.closed_at.is_none();

    IncidentStatusChange {
        status: status.to_string(),
        admin_notes,
        resolved_at: newly_resolved.then_some(now),
        closed_at: newly_closed.then_some(now),
    }
}

// --- User enrichment ---

fn load_users(conn: &mut PgConnection, ids: &[Uuid]) -> AppResult<HashMap<Uuid, User>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows: Vec<User> = users::table.filter(users::id.eq_any(ids)).load(conn)?;
    Ok(rows.into_iter().map(|user| (user.id, user)).collect())
}

fn build_detail(
    incident: Incident,
    users: &HashMap<Uuid, User>,
    view: SummaryView,
) -> IncidentDetail {
    let reporter = users
        .get(&incident.reporter_id)
        .map(|user| UserSummary::project(user, view));
    let reported_user = incident
        .reported_user_id
        .and_then(|id| users.get(&id))
        .map(|user| UserSummary::project(user, view));

    IncidentDetail {
        incident,
        reporter,
        reported_user,
    }
}

fn detail_for(
    conn: &mut PgConnection,
    incident: Incident,
    view: SummaryView,
) -> AppResult<IncidentDetail> {
    let mut ids = vec![incident.reporter_id];
    if let Some(id) = incident.reported_user_id {
        ids.push(id);
    }
    let users = load_users(conn, &ids)?;
    Ok(build_detail(incident, &users, view))
}

/// One batched user lookup for a whole page of incidents.
fn attach_user_summaries(
    conn: &mut PgConnection,
    incidents: Vec<Incident>,
    view: SummaryView,
) -> AppResult<Vec<IncidentDetail>> {
    let mut ids: Vec<Uuid> = Vec::with_capacity(incidents.len() * 2);
    for incident in &incidents {
        ids.push(incident.reporter_id);
        if let Some(id) = incident.reported_user_id {
            ids.push(id);
        }
    }
    ids.sort_unstable();
    ids.dedup();

    let users = load_users(conn, &ids)?;
    Ok(incidents
        .into_iter()
        .map(|incident| build_detail(incident, &users, view))
        .collect())
}

// --- Operations ---

pub fn create_incident(
    pool: &DbPool,
    reporter_id: Uuid,
    req: &CreateIncidentRequest,
) -> AppResult<IncidentDetail> {
    let mut conn = pool
        .get()
        .map_err(|e| AppError::internal(format!("db pool error: {e}")))?;

    let incident: Incident = diesel::insert_into(incidents::table)
        .values(&new_incident(reporter_id, req))
        .get_result(&mut conn)?;

    tracing::info!(
        incident_id = %incident.id,
        reporter_id = %reporter_id,
        incident_type = %incident.incident_type,
        "incident reported"
    );

    detail_for(&mut conn, incident, SummaryView::WithEmail)
}

pub fn get_incident_by_id(pool: &DbPool, id: Uuid) -> AppResult<IncidentDetail> {
    let mut conn = pool
        .get()
        .map_err(|e| AppError::internal(format!("db pool error: {e}")))?;

    let incident = incidents::table
        .find(id)
        .first::<Incident>(&mut conn)
        .optional()?
        .ok_or_else(|| AppError::not_found("Incident not found"))?;

    detail_for(&mut conn, incident, SummaryView::Full)
}

pub fn get_my_incidents(
    pool: &DbPool,
    user_id: Uuid,
    params: &PaginationParams,
) -> AppResult<(Vec<IncidentDetail>, Pagination)> {
    let mut conn = pool
        .get()
        .map_err(|e| AppError::internal(format!("db pool error: {e}")))?;

    let items = incidents::table
        .filter(incidents::reporter_id.eq(user_id))
        .order(incidents::created_at.desc())
        .offset(params.offset() as i64)
        .limit(params.limit() as i64)
        .load::<Incident>(&mut conn)?;

    let total: i64 = incidents::table
        .filter(incidents::reporter_id.eq(user_id))
        .count()
        .get_result(&mut conn)?;

    let details = attach_user_summaries(&mut conn, items, SummaryView::Basic)?;
    Ok((details, Pagination::new(total as u64, params)))
}

pub fn get_all_incidents(
    pool: &DbPool,
    filters: &IncidentFilters,
    params: &PaginationParams,
) -> AppResult<(Vec<IncidentDetail>, Pagination)> {
    let mut conn = pool
        .get()
        .map_err(|e| AppError::internal(format!("db pool error: {e}")))?;
    let offset = params.offset() as i64;
    let limit = params.limit() as i64;

    let (items, total): (Vec<Incident>, i64) = match (&filters.status, &filters.incident_type) {
        (Some(status), Some(kind)) => {
            let items = incidents::table
                .filter(incidents::status.eq(status))
                .filter(incidents::incident_type.eq(kind))
                .order(incidents::created_at.desc())
                .offset(offset)
                .limit(limit)
                .load::<Incident>(&mut conn)?;
            let total = incidents::table
                .filter(incidents::status.eq(status))
                .filter(incidents::incident_type.eq(kind))
                .count()
                .get_result(&mut conn)?;
            (items, total)
        }
        (Some(status), None) => {
            let items = incidents::table
                .filter(incidents::status.eq(status))
                .order(incidents::created_at.desc())
                .offset(offset)
                .limit(limit)
                .load::<Incident>(&mut conn)?;
            let total = incidents::table
                .filter(incidents::status.eq(status))
                .count()
                .get_result(&mut conn)?;
            (items, total)
        }
        (None, Some(kind)) => {
            let items = incidents::table
                .filter(incidents::incident_type.eq(kind))
                .order(incidents::created_at.desc())
                .offset(offset)
                .limit(limit)
                .load::<Incident>(&mut conn)?;
            let total = incidents::table
                .filter(incidents::incident_type.eq(kind))
                .count()
                .get_result(&mut conn)?;
            (items, total)
        }
        (None, None) => {
            let items = incidents::table
                .order(incidents::created_at.desc())
                .offset(offset)
                .limit(limit)
                .load::<Incident>(&mut conn)?;
            let total = incidents::table.count().get_result(&mut conn)?;
            (items, total)
        }
    };

    let details = attach_user_summaries(&mut conn, items, SummaryView::Full)?;
    Ok((details, Pagination::new(total as u64, params)))
}

pub fn update_incident_status(
    pool: &DbPool,
    id: Uuid,
    status: &str,
    admin_notes: Option<String>,
) -> AppResult<IncidentDetail> {
    let mut conn = pool
        .get()
        .map_err(|e| AppError::internal(format!("db pool error: {e}")))?;

    let incident = incidents::table
        .find(id)
        .first::<Incident>(&mut conn)
        .optional()?
        .ok_or_else(|| AppError::not_found("Incident not found"))?;

    let change = status_change(&incident, status, admin_notes, Utc::now());
    let updated: Incident = diesel::update(incidents::table.find(id))
        .set(&change)
        .get_result(&mut conn)?;

    tracing::info!(incident_id = %id, status = %updated.status, "incident status updated");

    detail_for(&mut conn, updated, SummaryView::WithEmail)
}

pub fn delete_incident(pool: &DbPool, id: Uuid) -> AppResult<()> {
    let mut conn = pool
        .get()
        .map_err(|e| AppError::internal(format!("db pool error: {e}")))?;

    let existing = incidents::table
        .find(id)
        .first::<Incident>(&mut conn)
        .optional()?;
    if existing.is_none() {
        return Err(AppError::not_found("Incident not found"));
    }

    diesel::delete(incidents::table.find(id)).execute(&mut conn)?;
    tracing::info!(incident_id = %id, "incident deleted");
    Ok(())
}

pub fn get_incidents_against_user(
    pool: &DbPool,
    user_id: Uuid,
    params: &PaginationParams,
) -> AppResult<(Vec<IncidentDetail>, Pagination)> {
    let mut conn = pool
        .get()
        .map_err(|e| AppError::internal(format!("db pool error: {e}")))?;

    let items = incidents::table
        .filter(incidents::reported_user_id.eq(Some(user_id)))
        .order(incidents::created_at.desc())
        .offset(params.offset() as i64)
        .limit(params.limit() as i64)
        .load::<Incident>(&mut conn)?;

    let total: i64 = incidents::table
        .filter(incidents::reported_user_id.eq(Some(user_id)))
        .count()
        .get_result(&mut conn)?;

    let details = attach_user_summaries(&mut conn, items, SummaryView::WithRole)?;
    Ok((details, Pagination::new(total as u64, params)))
}
