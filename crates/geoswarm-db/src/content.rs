//! Database operations for the `generated_content` table. Rows are
//! append-only: inserted during a run, never mutated.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `generated_content` table.
#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct ContentRow {
    pub id: i64,
    pub campaign_id: i64,
    pub agent_type: String,
    pub platform: String,
    pub content_type: Option<String>,
    pub title: Option<String>,
    pub body: String,
    pub metadata: Option<String>,
    pub estimated_reach: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Fields for one generated artifact. The reach estimate is committed in the
/// same INSERT as the content itself.
#[derive(Debug, Clone)]
pub struct NewContent<'a> {
    pub campaign_id: i64,
    pub agent_type: &'a str,
    pub platform: &'a str,
    pub content_type: &'a str,
    pub title: &'a str,
    pub body: &'a str,
    pub metadata: Option<&'a str>,
    pub estimated_reach: i32,
}

/// Insert a generated artifact and return its id.
///
/// # Errors
///
/// Returns [`DbError`] on database query failure.
pub async fn insert_content(pool: &PgPool, new: &NewContent<'_>) -> Result<i64, DbError> {
    Ok(sqlx::query_scalar::<_, i64>(
        "INSERT INTO generated_content \
           (campaign_id, agent_type, platform, content_type, title, body, metadata, estimated_reach) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING id",
    )
    .bind(new.campaign_id)
    .bind(new.agent_type)
    .bind(new.platform)
    .bind(new.content_type)
    .bind(new.title)
    .bind(new.body)
    .bind(new.metadata)
    .bind(new.estimated_reach)
    .fetch_one(pool)
    .await?)
}

/// List a campaign's artifacts in creation order.
///
/// # Errors
///
/// Returns [`DbError`] on database query failure.
pub async fn list_content(pool: &PgPool, campaign_id: i64) -> Result<Vec<ContentRow>, DbError> {
    Ok(sqlx::query_as::<_, ContentRow>(
        "SELECT id, campaign_id, agent_type, platform, content_type, title, body, metadata, \
                estimated_reach, created_at \
         FROM generated_content WHERE campaign_id = $1 ORDER BY created_at, id",
    )
    .bind(campaign_id)
    .fetch_all(pool)
    .await?)
}
