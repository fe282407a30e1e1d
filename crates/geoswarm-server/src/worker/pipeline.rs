//! The campaign pipeline: keyword research, strategy, sequential per-platform
//! content generation, completion.
//!
//! Strictly sequential within a task. Every stage reports to the activity
//! timeline before and after doing its work, so the timeline is a faithful
//! replay of the run. Errors are caught exactly once, at the top: the
//! campaign is marked `failed`, a terminal event explains why, and nothing
//! already written is rolled back.

use geoswarm_agents::{create_strategy, generate_content, research_keywords, AgentError};
use geoswarm_core::{
    ActivityKind, BrandContext, Platform, UnknownPlatform, ACTOR_KEYWORD_RESEARCHER, ACTOR_SUPER,
};
use geoswarm_db::{DbError, NewActivity, NewContent};
use geoswarm_llm::LlmClient;
use sqlx::PgPool;
use thiserror::Error;

#[derive(Debug, Error)]
enum PipelineError {
    #[error(transparent)]
    Agent(#[from] AgentError),
    #[error(transparent)]
    Store(#[from] DbError),
    #[error(transparent)]
    Platform(#[from] UnknownPlatform),
}

async fn emit(
    pool: &PgPool,
    campaign_id: i64,
    agent_type: &str,
    kind: ActivityKind,
    message: &str,
    status: Option<&str>,
) -> Result<(), DbError> {
    geoswarm_db::append_activity(
        pool,
        &NewActivity {
            campaign_id,
            agent_type,
            kind,
            message,
            status,
        },
    )
    .await?;
    Ok(())
}

/// Run the full pipeline for one campaign. Never returns an error: the
/// failure path is absorbed here because the launch response has already
/// been sent and there is nobody left to re-raise to.
pub async fn run_campaign(
    pool: &PgPool,
    llm: &LlmClient,
    campaign_id: i64,
    goal: &str,
    context: &BrandContext,
) {
    if let Err(e) = execute(pool, llm, campaign_id, goal, context).await {
        tracing::error!(campaign_id, error = %e, "campaign pipeline failed");

        if let Err(fail_err) = geoswarm_db::fail_campaign(pool, campaign_id).await {
            tracing::error!(campaign_id, error = %fail_err, "failed to mark campaign failed");
        }

        let message = format!("Campaign failed: {e}");
        if let Err(emit_err) = emit(
            pool,
            campaign_id,
            ACTOR_SUPER,
            ActivityKind::StatusUpdate,
            &message,
            Some("failed"),
        )
        .await
        {
            tracing::error!(campaign_id, error = %emit_err, "failed to record terminal failure event");
        }
    }
}

async fn execute(
    pool: &PgPool,
    llm: &LlmClient,
    campaign_id: i64,
    goal: &str,
    context: &BrandContext,
) -> Result<(), PipelineError> {
    emit(
        pool,
        campaign_id,
        ACTOR_SUPER,
        ActivityKind::StatusUpdate,
        "Analyzing campaign goal and creating strategy...",
        Some("strategizing"),
    )
    .await?;

    let research = research_keywords(llm, goal, context).await?;
    let keyword_string = research.display_string();
    emit(
        pool,
        campaign_id,
        ACTOR_KEYWORD_RESEARCHER,
        ActivityKind::Message,
        &research.timeline_message(),
        None,
    )
    .await?;

    let plan = create_strategy(llm, goal, context, Some(&keyword_string)).await?;
    geoswarm_db::set_campaign_strategy(pool, campaign_id, &plan.strategy, Some(&keyword_string))
        .await?;
    emit(
        pool,
        campaign_id,
        ACTOR_SUPER,
        ActivityKind::Message,
        &format!("Strategy created: {}", plan.strategy),
        Some("delegating"),
    )
    .await?;

    let mut piece_count: i64 = 0;
    for assignment in &plan.assignments {
        let platform = Platform::parse(&assignment.platform)?;

        emit(
            pool,
            campaign_id,
            ACTOR_SUPER,
            ActivityKind::Message,
            &format!("Assigning to {}: {}", platform.key(), assignment.task),
            Some("delegating"),
        )
        .await?;
        emit(
            pool,
            campaign_id,
            platform.key(),
            ActivityKind::StatusUpdate,
            &format!("Working on: {}", assignment.task),
            Some("generating"),
        )
        .await?;

        for _ in 0..assignment.count {
            let draft = generate_content(llm, platform, &assignment.task, context).await?;

            geoswarm_db::insert_content(
                pool,
                &NewContent {
                    campaign_id,
                    agent_type: platform.key(),
                    platform: platform.key(),
                    content_type: platform.content_type(),
                    title: &draft.title,
                    body: &draft.body,
                    metadata: draft.metadata.as_deref(),
                    estimated_reach: platform.estimated_reach(),
                },
            )
            .await?;

            emit(
                pool,
                campaign_id,
                platform.key(),
                ActivityKind::ContentGenerated,
                &format!("Generated: {}", draft.title),
                Some("completed"),
            )
            .await?;

            piece_count += 1;
        }
    }

    geoswarm_db::complete_campaign(pool, campaign_id).await?;
    emit(
        pool,
        campaign_id,
        ACTOR_SUPER,
        ActivityKind::StatusUpdate,
        &format!("Campaign completed! Generated {piece_count} pieces of content."),
        Some("completed"),
    )
    .await?;

    Ok(())
}
