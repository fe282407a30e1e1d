//! Database operations for the `campaigns` table.
//!
//! The campaign row is mutated only by its own worker task, so the
//! transition guards here are about correctness of the lifecycle, not
//! concurrency control.

use chrono::{DateTime, Utc};
use geoswarm_core::CampaignStatus;
use sqlx::PgPool;

use crate::DbError;

/// A row from the `campaigns` table.
#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct CampaignRow {
    pub id: i64,
    pub user_id: i64,
    pub brand_profile_id: i64,
    pub goal: String,
    pub status: String,
    pub strategy: Option<String>,
    pub keywords: Option<String>,
    pub estimated_reach: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl CampaignRow {
    /// Typed view of the stored status label.
    #[must_use]
    pub fn status(&self) -> Option<CampaignStatus> {
        CampaignStatus::parse(&self.status)
    }
}

const SELECT_COLUMNS: &str = "id, user_id, brand_profile_id, goal, status, strategy, keywords, \
     estimated_reach, created_at, completed_at";

/// Insert a campaign row and return its id.
///
/// The launch path creates campaigns directly in `running`: the row must be
/// visible in that state before the launch response is sent.
///
/// # Errors
///
/// Returns [`DbError`] on database query failure.
pub async fn create_campaign(
    pool: &PgPool,
    user_id: i64,
    brand_profile_id: i64,
    goal: &str,
    status: CampaignStatus,
) -> Result<i64, DbError> {
    Ok(sqlx::query_scalar::<_, i64>(
        "INSERT INTO campaigns (user_id, brand_profile_id, goal, status) \
         VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(user_id)
    .bind(brand_profile_id)
    .bind(goal)
    .bind(status.as_str())
    .fetch_one(pool)
    .await?)
}

/// Get a campaign by id.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row exists, or [`DbError`] on query failure.
pub async fn get_campaign(pool: &PgPool, id: i64) -> Result<CampaignRow, DbError> {
    sqlx::query_as::<_, CampaignRow>(&format!(
        "SELECT {SELECT_COLUMNS} FROM campaigns WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)
}

/// List a user's campaigns, newest first.
///
/// # Errors
///
/// Returns [`DbError`] on database query failure.
pub async fn list_campaigns_by_user(
    pool: &PgPool,
    user_id: i64,
) -> Result<Vec<CampaignRow>, DbError> {
    Ok(sqlx::query_as::<_, CampaignRow>(&format!(
        "SELECT {SELECT_COLUMNS} FROM campaigns \
         WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?)
}

/// Persist the strategy narrative and keyword summary onto a running campaign.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row exists, or [`DbError`] on query failure.
pub async fn set_campaign_strategy(
    pool: &PgPool,
    id: i64,
    strategy: &str,
    keywords: Option<&str>,
) -> Result<(), DbError> {
    let result = sqlx::query("UPDATE campaigns SET strategy = $2, keywords = $3 WHERE id = $1")
        .bind(id)
        .bind(strategy)
        .bind(keywords)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

/// Transition a running campaign to `completed`.
///
/// Sets `completed_at = NOW()` and `estimated_reach` to the sum of the
/// per-artifact reach values persisted for this campaign. Computing the
/// total in SQL keeps the stored aggregate consistent with the stored
/// artifact rows even if a generation unit failed mid-assignment.
///
/// # Errors
///
/// Returns [`DbError::InvalidStatusTransition`] if the campaign is not
/// `running`, [`DbError::NotFound`] if it does not exist, or [`DbError`]
/// on query failure.
pub async fn complete_campaign(pool: &PgPool, id: i64) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE campaigns SET \
           status = 'completed', \
           completed_at = NOW(), \
           estimated_reach = (SELECT COALESCE(SUM(estimated_reach), 0)::int \
                              FROM generated_content WHERE campaign_id = $1) \
         WHERE id = $1 AND status = 'running'",
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(transition_error(pool, id, CampaignStatus::Completed).await);
    }
    Ok(())
}

/// Transition a running campaign to `failed`. `completed_at` stays null: it
/// is set if and only if the campaign completed.
///
/// Only `running` campaigns can fail; the guard matches
/// [`CampaignStatus::can_transition_to`].
///
/// # Errors
///
/// Returns [`DbError::InvalidStatusTransition`] if the campaign is not
/// `running`, [`DbError::NotFound`] if it does not exist, or [`DbError`] on
/// query failure.
pub async fn fail_campaign(pool: &PgPool, id: i64) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE campaigns SET status = 'failed' \
         WHERE id = $1 AND status = 'running'",
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(transition_error(pool, id, CampaignStatus::Failed).await);
    }
    Ok(())
}

/// Distinguish "no such campaign" from "campaign in the wrong state" after a
/// guarded UPDATE matched zero rows.
async fn transition_error(pool: &PgPool, id: i64, to: CampaignStatus) -> DbError {
    match get_campaign(pool, id).await {
        Ok(row) => DbError::InvalidStatusTransition {
            from: row.status,
            to: to.as_str().to_string(),
        },
        Err(e) => e,
    }
}
