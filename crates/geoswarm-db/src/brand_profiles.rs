//! Database operations for the `brand_profiles` table.

use chrono::{DateTime, Utc};
use geoswarm_core::{BrandContext, BrandVoice};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `brand_profiles` table.
#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct BrandProfileRow {
    pub id: i64,
    pub user_id: i64,
    pub company_name: String,
    pub industry: Option<String>,
    pub description: Option<String>,
    pub product_service: Option<String>,
    pub target_audience: Option<String>,
    pub brand_voice: String,
    pub value_propositions: Option<String>,
    pub competitors: Option<String>,
    pub marketing_goals: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BrandProfileRow {
    /// Snapshot this row into the immutable [`BrandContext`] consumed by a
    /// campaign run. An unparseable stored voice falls back to the default;
    /// the column CHECK constraint makes that unreachable in practice.
    #[must_use]
    pub fn to_context(&self) -> BrandContext {
        BrandContext {
            company_name: self.company_name.clone(),
            industry: self.industry.clone(),
            description: self.description.clone(),
            product_service: self.product_service.clone(),
            target_audience: self.target_audience.clone(),
            brand_voice: BrandVoice::parse(&self.brand_voice).unwrap_or_default(),
            value_propositions: self.value_propositions.clone(),
            competitors: self.competitors.clone(),
            marketing_goals: self.marketing_goals.clone(),
        }
    }
}

/// Fields for creating a brand profile.
#[derive(Debug, Clone)]
pub struct NewBrandProfile {
    pub user_id: i64,
    pub company_name: String,
    pub industry: Option<String>,
    pub description: Option<String>,
    pub product_service: Option<String>,
    pub target_audience: Option<String>,
    pub brand_voice: BrandVoice,
    pub value_propositions: Option<String>,
    pub competitors: Option<String>,
    pub marketing_goals: Option<String>,
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct BrandProfileUpdate {
    pub company_name: Option<String>,
    pub industry: Option<String>,
    pub description: Option<String>,
    pub product_service: Option<String>,
    pub target_audience: Option<String>,
    pub brand_voice: Option<BrandVoice>,
    pub value_propositions: Option<String>,
    pub competitors: Option<String>,
    pub marketing_goals: Option<String>,
}

const SELECT_COLUMNS: &str = "id, user_id, company_name, industry, description, product_service, \
     target_audience, brand_voice, value_propositions, competitors, marketing_goals, \
     created_at, updated_at";

/// Insert a brand profile and return its id.
///
/// # Errors
///
/// Returns [`DbError`] on database query failure.
pub async fn create_brand_profile(pool: &PgPool, new: &NewBrandProfile) -> Result<i64, DbError> {
    Ok(sqlx::query_scalar::<_, i64>(
        "INSERT INTO brand_profiles \
           (user_id, company_name, industry, description, product_service, target_audience, \
            brand_voice, value_propositions, competitors, marketing_goals) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING id",
    )
    .bind(new.user_id)
    .bind(&new.company_name)
    .bind(&new.industry)
    .bind(&new.description)
    .bind(&new.product_service)
    .bind(&new.target_audience)
    .bind(new.brand_voice.as_str())
    .bind(&new.value_propositions)
    .bind(&new.competitors)
    .bind(&new.marketing_goals)
    .fetch_one(pool)
    .await?)
}

/// Get a brand profile by id.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row exists, or [`DbError`] on query failure.
pub async fn get_brand_profile(pool: &PgPool, id: i64) -> Result<BrandProfileRow, DbError> {
    sqlx::query_as::<_, BrandProfileRow>(&format!(
        "SELECT {SELECT_COLUMNS} FROM brand_profiles WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)
}

/// Get the most recently created brand profile for a user, if any.
///
/// # Errors
///
/// Returns [`DbError`] on database query failure.
pub async fn get_brand_profile_by_user(
    pool: &PgPool,
    user_id: i64,
) -> Result<Option<BrandProfileRow>, DbError> {
    Ok(sqlx::query_as::<_, BrandProfileRow>(&format!(
        "SELECT {SELECT_COLUMNS} FROM brand_profiles \
         WHERE user_id = $1 ORDER BY created_at DESC, id DESC LIMIT 1"
    ))
    .bind(user_id)
    .fetch_optional(pool)
    .await?)
}

/// Apply a partial update to a brand profile. Absent fields keep their
/// current values (COALESCE semantics).
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row exists, or [`DbError`] on query failure.
pub async fn update_brand_profile(
    pool: &PgPool,
    id: i64,
    update: &BrandProfileUpdate,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE brand_profiles SET \
           company_name       = COALESCE($2, company_name), \
           industry           = COALESCE($3, industry), \
           description        = COALESCE($4, description), \
           product_service    = COALESCE($5, product_service), \
           target_audience    = COALESCE($6, target_audience), \
           brand_voice        = COALESCE($7, brand_voice), \
           value_propositions = COALESCE($8, value_propositions), \
           competitors        = COALESCE($9, competitors), \
           marketing_goals    = COALESCE($10, marketing_goals), \
           updated_at         = NOW() \
         WHERE id = $1",
    )
    .bind(id)
    .bind(&update.company_name)
    .bind(&update.industry)
    .bind(&update.description)
    .bind(&update.product_service)
    .bind(&update.target_audience)
    .bind(update.brand_voice.map(BrandVoice::as_str))
    .bind(&update.value_propositions)
    .bind(&update.competitors)
    .bind(&update.marketing_goals)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}
