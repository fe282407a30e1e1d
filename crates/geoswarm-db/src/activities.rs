//! Database operations for the `agent_activities` table: the append-only
//! campaign timeline and sole progress-reporting channel.

use chrono::{DateTime, Utc};
use geoswarm_core::ActivityKind;
use sqlx::PgPool;

use crate::DbError;

/// A row from the `agent_activities` table.
#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct ActivityRow {
    pub id: i64,
    pub campaign_id: i64,
    pub agent_type: String,
    pub activity_type: String,
    pub message: Option<String>,
    pub status: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One timeline event to append.
#[derive(Debug, Clone)]
pub struct NewActivity<'a> {
    pub campaign_id: i64,
    pub agent_type: &'a str,
    pub kind: ActivityKind,
    pub message: &'a str,
    pub status: Option<&'a str>,
}

/// Append one activity event. Events are never updated or deleted.
///
/// Emission order within a campaign is preserved because the worker awaits
/// each append before issuing the next; reads order by `(created_at, id)` so
/// same-timestamp events keep insertion order.
///
/// # Errors
///
/// Returns [`DbError`] on database query failure.
pub async fn append_activity(pool: &PgPool, new: &NewActivity<'_>) -> Result<i64, DbError> {
    Ok(sqlx::query_scalar::<_, i64>(
        "INSERT INTO agent_activities (campaign_id, agent_type, activity_type, message, status) \
         VALUES ($1, $2, $3, $4, $5) RETURNING id",
    )
    .bind(new.campaign_id)
    .bind(new.agent_type)
    .bind(new.kind.as_str())
    .bind(new.message)
    .bind(new.status)
    .fetch_one(pool)
    .await?)
}

/// List a campaign's activity events in emission order.
///
/// # Errors
///
/// Returns [`DbError`] on database query failure.
pub async fn list_activities(pool: &PgPool, campaign_id: i64) -> Result<Vec<ActivityRow>, DbError> {
    Ok(sqlx::query_as::<_, ActivityRow>(
        "SELECT id, campaign_id, agent_type, activity_type, message, status, created_at \
         FROM agent_activities WHERE campaign_id = $1 ORDER BY created_at, id",
    )
    .bind(campaign_id)
    .fetch_all(pool)
    .await?)
}
