//! Brand profile handlers: create, fetch by user, partial update.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use geoswarm_core::BrandVoice;
use geoswarm_db::{BrandProfileRow, BrandProfileUpdate, NewBrandProfile};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(in crate::api) struct CreateBrandProfileRequest {
    pub user_id: i64,
    pub company_name: String,
    pub industry: Option<String>,
    pub description: Option<String>,
    pub product_service: Option<String>,
    pub target_audience: Option<String>,
    pub brand_voice: Option<String>,
    pub value_propositions: Option<String>,
    pub competitors: Option<String>,
    pub marketing_goals: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(in crate::api) struct UpdateBrandProfileRequest {
    pub company_name: Option<String>,
    pub industry: Option<String>,
    pub description: Option<String>,
    pub product_service: Option<String>,
    pub target_audience: Option<String>,
    pub brand_voice: Option<String>,
    pub value_propositions: Option<String>,
    pub competitors: Option<String>,
    pub marketing_goals: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(in crate::api) struct UserIdQuery {
    pub user_id: i64,
}

#[derive(Debug, serde::Serialize)]
pub(in crate::api) struct CreateBrandProfileResponse {
    pub id: i64,
}

fn parse_voice(req_id: &str, value: &str) -> Result<BrandVoice, ApiError> {
    BrandVoice::parse(value).ok_or_else(|| {
        ApiError::new(
            req_id,
            "validation_error",
            format!(
                "brand_voice must be one of 'professional', 'casual', 'friendly', \
                 'authoritative', got '{value}'"
            ),
        )
    })
}

fn validate_company_name(req_id: &str, name: &str) -> Result<String, ApiError> {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed.len() > 200 {
        return Err(ApiError::new(
            req_id,
            "validation_error",
            "company_name must be 1-200 characters",
        ));
    }
    Ok(trimmed.to_owned())
}

/// POST /api/v1/brand-profiles — create a brand profile.
pub(in crate::api) async fn create_brand_profile(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<CreateBrandProfileRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CreateBrandProfileResponse>>), ApiError> {
    let rid = &req_id.0;

    let company_name = validate_company_name(rid, &body.company_name)?;
    let brand_voice = match body.brand_voice.as_deref() {
        Some(raw) => parse_voice(rid, raw)?,
        None => BrandVoice::default(),
    };

    let new = NewBrandProfile {
        user_id: body.user_id,
        company_name,
        industry: body.industry,
        description: body.description,
        product_service: body.product_service,
        target_audience: body.target_audience,
        brand_voice,
        value_propositions: body.value_propositions,
        competitors: body.competitors,
        marketing_goals: body.marketing_goals,
    };

    let id = geoswarm_db::create_brand_profile(&state.pool, &new)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: CreateBrandProfileResponse { id },
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

/// GET /api/v1/brand-profiles?user_id= — fetch the caller's profile.
pub(in crate::api) async fn get_brand_profile(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<UserIdQuery>,
) -> Result<Json<ApiResponse<BrandProfileRow>>, ApiError> {
    let rid = &req_id.0;

    let profile = geoswarm_db::get_brand_profile_by_user(&state.pool, query.user_id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?
        .ok_or_else(|| ApiError::new(rid, "not_found", "no brand profile for this user"))?;

    Ok(Json(ApiResponse {
        data: profile,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// PATCH /api/v1/brand-profiles/:id — partial update; absent fields are kept.
pub(in crate::api) async fn update_brand_profile(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateBrandProfileRequest>,
) -> Result<Json<ApiResponse<BrandProfileRow>>, ApiError> {
    let rid = &req_id.0;

    let company_name = body
        .company_name
        .as_deref()
        .map(|n| validate_company_name(rid, n))
        .transpose()?;
    let brand_voice = body
        .brand_voice
        .as_deref()
        .map(|v| parse_voice(rid, v))
        .transpose()?;

    let update = BrandProfileUpdate {
        company_name,
        industry: body.industry,
        description: body.description,
        product_service: body.product_service,
        target_audience: body.target_audience,
        brand_voice,
        value_propositions: body.value_propositions,
        competitors: body.competitors,
        marketing_goals: body.marketing_goals,
    };

    geoswarm_db::update_brand_profile(&state.pool, id, &update)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    let profile = geoswarm_db::get_brand_profile(&state.pool, id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: profile,
        meta: ResponseMeta::new(req_id.0),
    }))
}
