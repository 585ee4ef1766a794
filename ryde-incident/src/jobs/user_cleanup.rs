use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use diesel::prelude::*;

use ryde_shared::clients::db::DbPool;

use crate::models::User;
use crate::schema::users;
use crate::AppState;

/// Days a soft-deleted account is retained before permanent erasure.
pub const RETENTION_DAYS: i64 = 90;
/// Wall-clock hour (UTC) of the daily run.
pub const RUN_HOUR_UTC: u32 = 3;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct CleanupOutcome {
    pub deleted: u64,
    pub failed: u64,
}

/// Accounts soft-deleted at or before this instant are eligible for purge.
pub fn retention_cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(RETENTION_DAYS)
}

/// Permanently removes users whose soft deletion has aged past the
/// retention window.
///
/// Rows are deleted one at a time; a failure on one account is logged and
/// the run continues with the rest. Only the candidate query can fail the
/// run as a whole.
pub fn purge_deleted_users(pool: &DbPool, now: DateTime<Utc>) -> anyhow::Result<CleanupOutcome> {
    let mut conn = pool.get()?;
    let cutoff = retention_cutoff(now);

    let expired: Vec<User> = users::table
        .filter(users::is_deleted.eq(true))
        .filter(users::deleted_at.le(Some(cutoff)))
        .load(&mut conn)?;

    let mut outcome = CleanupOutcome::default();
    for user in &expired {
        match diesel::delete(users::table.find(user.id)).execute(&mut conn) {
            Ok(_) => outcome.deleted += 1,
            Err(e) => {
                outcome.failed += 1;
                tracing::error!(user_id = %user.id, error = %e, "failed to purge user");
            }
        }
    }

    Ok(outcome)
}

/// Time until the next run at `RUN_HOUR_UTC`. A call exactly on the hour
/// schedules the following day.
pub fn next_run_delay(now: DateTime<Utc>) -> StdDuration {
    let todays_run = now
        .date_naive()
        .and_hms_opt(RUN_HOUR_UTC, 0, 0)
        .unwrap()
        .and_utc();
    let next = if now < todays_run {
        todays_run
    } else {
        todays_run + Duration::days(1)
    };
    (next - now).to_std().unwrap_or_default()
}

/// Spawns the daily purge loop.
pub fn spawn_user_cleanup_task(state: Arc<AppState>) {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(next_run_delay(Utc::now())).await;

            tracing::info!("running user deletion cleanup");
            match purge_deleted_users(&state.db, Utc::now()) {
                Ok(outcome) => {
                    tracing::info!(
                        deleted = outcome.deleted,
                        failed = outcome.failed,
                        "user cleanup completed"
                    );
                }
                Err(e) => {
                    tracing::error!(error = %e, "user cleanup run failed");
                }
            }
        }
    });
}
