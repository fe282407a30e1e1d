//! Detached background tasks: the campaign pipeline and feedback
//! acknowledgment.
//!
//! Tasks are fire-and-forget. Each holds its own pool and client handles,
//! outlives the HTTP request that started it, and reports progress only
//! through the activity timeline. Join handles are dropped deliberately —
//! there is no cancellation and no caller waiting on the result.

mod pipeline;

use std::sync::Arc;

use geoswarm_agents::FALLBACK_ACK;
use geoswarm_core::{ActivityKind, BrandContext, ACTOR_SUPER};
use geoswarm_db::NewActivity;
use geoswarm_llm::LlmClient;
use sqlx::PgPool;

pub use pipeline::run_campaign;

/// Spawn the content-generation pipeline for a freshly launched campaign.
pub fn spawn_campaign(
    pool: PgPool,
    llm: Arc<LlmClient>,
    campaign_id: i64,
    goal: String,
    context: BrandContext,
) {
    tokio::spawn(async move {
        run_campaign(&pool, &llm, campaign_id, &goal, &context).await;
    });
}

/// Spawn the acknowledgment task for a recorded feedback message.
///
/// The user's message is already on the timeline; this task only produces
/// the orchestrator's reply. On any failure the canned fallback is appended
/// instead, so the user always gets a visible response. Campaign state is
/// never touched from here.
pub fn spawn_feedback_ack(
    pool: PgPool,
    llm: Arc<LlmClient>,
    campaign_id: i64,
    goal: String,
    strategy: Option<String>,
    message: String,
) {
    tokio::spawn(async move {
        let ack =
            match geoswarm_agents::acknowledge_feedback(&llm, &goal, strategy.as_deref(), &message)
                .await
            {
                Ok(ack) => ack,
                Err(e) => {
                    tracing::warn!(campaign_id, error = %e, "feedback ack generation failed, using fallback");
                    FALLBACK_ACK.to_owned()
                }
            };

        let result = geoswarm_db::append_activity(
            &pool,
            &NewActivity {
                campaign_id,
                agent_type: ACTOR_SUPER,
                kind: ActivityKind::Message,
                message: &ack,
                status: None,
            },
        )
        .await;

        if let Err(e) = result {
            tracing::error!(campaign_id, error = %e, "failed to append feedback acknowledgment");
        }
    });
}
