//! Campaign handlers: launch, list, detail, artifact/timeline reads, the
//! feedback channel, and the one-shot demo setup.
//!
//! Launch is fire-and-forget: the campaign row is committed as `running`
//! before the 202 goes out, then the pipeline runs in a detached task. The
//! response never waits on content generation.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use geoswarm_core::{ActivityKind, CampaignStatus, ACTOR_USER};
use geoswarm_db::{ActivityRow, CampaignRow, ContentRow, NewActivity, NewBrandProfile};
use serde::Deserialize;

use crate::middleware::RequestId;
use crate::worker;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

use super::brand_profiles::UserIdQuery;

#[derive(Debug, Deserialize)]
pub(in crate::api) struct LaunchCampaignRequest {
    pub user_id: i64,
    pub brand_profile_id: i64,
    pub goal: String,
}

#[derive(Debug, Deserialize)]
pub(in crate::api) struct CampaignMessageRequest {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(in crate::api) struct DemoRequest {
    pub user_id: i64,
}

#[derive(Debug, serde::Serialize)]
pub(in crate::api) struct LaunchCampaignResponse {
    pub campaign_id: i64,
}

#[derive(Debug, serde::Serialize)]
pub(in crate::api) struct DemoResponse {
    pub campaign_id: i64,
    pub brand_profile_id: i64,
}

#[derive(Debug, serde::Serialize)]
pub(in crate::api) struct CampaignMessageResponse {
    pub activity_id: i64,
}

#[derive(Debug, serde::Serialize)]
pub(in crate::api) struct CampaignDetail {
    #[serde(flatten)]
    pub campaign: CampaignRow,
    pub activities: Vec<ActivityRow>,
    pub content: Vec<ContentRow>,
}

const DEMO_GOAL: &str = "Launch a one-day awareness campaign showcasing TechFlow AI's ability to \
     automate 90% of manual tasks and achieve 10x productivity gains for mid-sized businesses";

fn demo_profile(user_id: i64) -> NewBrandProfile {
    NewBrandProfile {
        user_id,
        company_name: "TechFlow AI".to_string(),
        industry: Some("B2B SaaS - Workflow Automation".to_string()),
        description: Some(
            "AI-powered workflow automation platform that helps mid-sized businesses achieve \
             10x productivity gains"
                .to_string(),
        ),
        product_service: None,
        target_audience: Some(
            "Operations Managers and IT Directors at mid-sized B2B companies (50-500 employees) \
             struggling with manual processes and scaling challenges"
                .to_string(),
        ),
        brand_voice: geoswarm_core::BrandVoice::Professional,
        value_propositions: Some(
            "Achieve 10x workflow speed, reduce manual tasks by 90%, seamless integration with \
             existing tools, enterprise-grade security"
                .to_string(),
        ),
        competitors: None,
        marketing_goals: Some(
            "Increase brand awareness in the B2B automation space, generate qualified leads, \
             establish thought leadership"
                .to_string(),
        ),
    }
}

/// Create the campaign row as `running` and detach the pipeline task.
async fn launch(
    state: &AppState,
    rid: &str,
    user_id: i64,
    brand_profile_id: i64,
    goal: &str,
) -> Result<i64, ApiError> {
    let profile = geoswarm_db::get_brand_profile(&state.pool, brand_profile_id)
        .await
        .map_err(|e| map_db_error(rid.to_owned(), &e))?;

    // Ownership mismatch reads the same as a missing profile; callers learn
    // nothing about other users' profile ids.
    if profile.user_id != user_id {
        return Err(ApiError::new(rid, "not_found", "record not found"));
    }

    let campaign_id = geoswarm_db::create_campaign(
        &state.pool,
        user_id,
        brand_profile_id,
        goal,
        CampaignStatus::Running,
    )
    .await
    .map_err(|e| map_db_error(rid.to_owned(), &e))?;

    worker::spawn_campaign(
        state.pool.clone(),
        state.llm.clone(),
        campaign_id,
        goal.to_owned(),
        profile.to_context(),
    );

    Ok(campaign_id)
}

/// POST /api/v1/campaigns — launch a campaign; 202 with the new id.
pub(in crate::api) async fn launch_campaign(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<LaunchCampaignRequest>,
) -> Result<(StatusCode, Json<ApiResponse<LaunchCampaignResponse>>), ApiError> {
    let rid = &req_id.0;

    let goal = body.goal.trim();
    if goal.is_empty() {
        return Err(ApiError::new(
            rid,
            "validation_error",
            "goal must not be empty",
        ));
    }

    let campaign_id = launch(&state, rid, body.user_id, body.brand_profile_id, goal).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(ApiResponse {
            data: LaunchCampaignResponse { campaign_id },
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

/// POST /api/v1/demo — create the fixed demo profile and launch the fixed
/// demo goal through the ordinary launch path.
pub(in crate::api) async fn launch_demo(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<DemoRequest>,
) -> Result<(StatusCode, Json<ApiResponse<DemoResponse>>), ApiError> {
    let rid = &req_id.0;

    let brand_profile_id = geoswarm_db::create_brand_profile(&state.pool, &demo_profile(body.user_id))
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    let campaign_id = launch(&state, rid, body.user_id, brand_profile_id, DEMO_GOAL).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(ApiResponse {
            data: DemoResponse {
                campaign_id,
                brand_profile_id,
            },
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

/// GET /api/v1/campaigns?user_id= — the caller's campaigns, newest first.
pub(in crate::api) async fn list_campaigns(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<UserIdQuery>,
) -> Result<Json<ApiResponse<Vec<CampaignRow>>>, ApiError> {
    let campaigns = geoswarm_db::list_campaigns_by_user(&state.pool, query.user_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: campaigns,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// GET /api/v1/campaigns/:id — campaign with its timeline and artifacts.
pub(in crate::api) async fn get_campaign(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<CampaignDetail>>, ApiError> {
    let rid = &req_id.0;

    let campaign = geoswarm_db::get_campaign(&state.pool, id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;
    let activities = geoswarm_db::list_activities(&state.pool, id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;
    let content = geoswarm_db::list_content(&state.pool, id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: CampaignDetail {
            campaign,
            activities,
            content,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// GET /api/v1/campaigns/:id/content — the append-only artifact sequence.
pub(in crate::api) async fn list_campaign_content(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<ContentRow>>>, ApiError> {
    let rid = &req_id.0;

    // 404 for a missing campaign, not an empty list.
    geoswarm_db::get_campaign(&state.pool, id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;
    let content = geoswarm_db::list_content(&state.pool, id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: content,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// GET /api/v1/campaigns/:id/activities — the activity timeline.
pub(in crate::api) async fn list_campaign_activities(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<ActivityRow>>>, ApiError> {
    let rid = &req_id.0;

    geoswarm_db::get_campaign(&state.pool, id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;
    let activities = geoswarm_db::list_activities(&state.pool, id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: activities,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/campaigns/:id/messages — the feedback channel.
///
/// The user message lands on the timeline synchronously; the orchestrator's
/// acknowledgment is generated by a detached task and appended whenever it
/// arrives (or the canned fallback, on failure).
pub(in crate::api) async fn send_campaign_message(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
    Json(body): Json<CampaignMessageRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CampaignMessageResponse>>), ApiError> {
    let rid = &req_id.0;

    let message = body.message.trim().to_owned();
    if message.is_empty() {
        return Err(ApiError::new(
            rid,
            "validation_error",
            "message must not be empty",
        ));
    }

    let campaign = geoswarm_db::get_campaign(&state.pool, id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    let activity_id = geoswarm_db::append_activity(
        &state.pool,
        &NewActivity {
            campaign_id: id,
            agent_type: ACTOR_USER,
            kind: ActivityKind::Message,
            message: &message,
            status: None,
        },
    )
    .await
    .map_err(|e| map_db_error(rid.clone(), &e))?;

    worker::spawn_feedback_ack(
        state.pool.clone(),
        state.llm.clone(),
        id,
        campaign.goal,
        campaign.strategy,
        message,
    );

    Ok((
        StatusCode::ACCEPTED,
        Json(ApiResponse {
            data: CampaignMessageResponse { activity_id },
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}
