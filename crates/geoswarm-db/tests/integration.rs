//! Tests for geoswarm-db. Pure row/config tests run offline; everything
//! touching a pool uses `#[sqlx::test]` against the embedded migrations.

use geoswarm_core::{ActivityKind, AppConfig, BrandVoice, CampaignStatus, Environment};
use geoswarm_db::{
    append_activity, complete_campaign, create_brand_profile, create_campaign, fail_campaign,
    get_brand_profile, get_campaign, insert_content, list_activities, list_campaigns_by_user,
    list_content, set_campaign_strategy, update_brand_profile, BrandProfileUpdate, DbError,
    NewActivity, NewBrandProfile, NewContent, PoolConfig,
};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let app_config = AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000),
        log_level: "info".to_string(),
        llm_base_url: "https://api.openai.com".to_string(),
        llm_api_key: "key".to_string(),
        llm_model: "gpt-4o-mini".to_string(),
        llm_timeout_secs: 120,
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
    };

    let pool_config = PoolConfig::from_app_config(&app_config);
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

fn demo_profile(user_id: i64) -> NewBrandProfile {
    NewBrandProfile {
        user_id,
        company_name: "Acme".to_string(),
        industry: Some("B2B SaaS".to_string()),
        description: None,
        product_service: None,
        target_audience: None,
        brand_voice: BrandVoice::Professional,
        value_propositions: None,
        competitors: None,
        marketing_goals: None,
    }
}

async fn seed_campaign(pool: &sqlx::PgPool, user_id: i64) -> i64 {
    let profile_id = create_brand_profile(pool, &demo_profile(user_id))
        .await
        .expect("create profile");
    create_campaign(
        pool,
        user_id,
        profile_id,
        "Get cited as the authority on X",
        CampaignStatus::Running,
    )
    .await
    .expect("create campaign")
}

#[sqlx::test(migrations = "../../migrations")]
async fn brand_profile_round_trip(pool: sqlx::PgPool) {
    let id = create_brand_profile(&pool, &demo_profile(1)).await.expect("create");
    let row = get_brand_profile(&pool, id).await.expect("get");

    assert_eq!(row.user_id, 1);
    assert_eq!(row.company_name, "Acme");
    assert_eq!(row.brand_voice, "professional");

    let ctx = row.to_context();
    assert_eq!(ctx.brand_voice, BrandVoice::Professional);
    assert!(ctx.render().contains("Industry: B2B SaaS"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn brand_profile_partial_update_keeps_absent_fields(pool: sqlx::PgPool) {
    let id = create_brand_profile(&pool, &demo_profile(1)).await.expect("create");

    let update = BrandProfileUpdate {
        brand_voice: Some(BrandVoice::Casual),
        competitors: Some("MegaCorp".to_string()),
        ..BrandProfileUpdate::default()
    };
    update_brand_profile(&pool, id, &update).await.expect("update");

    let row = get_brand_profile(&pool, id).await.expect("get");
    assert_eq!(row.brand_voice, "casual");
    assert_eq!(row.competitors.as_deref(), Some("MegaCorp"));
    // Untouched by the partial update.
    assert_eq!(row.company_name, "Acme");
    assert_eq!(row.industry.as_deref(), Some("B2B SaaS"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn update_missing_brand_profile_is_not_found(pool: sqlx::PgPool) {
    let result = update_brand_profile(&pool, 9999, &BrandProfileUpdate::default()).await;
    assert!(matches!(result, Err(DbError::NotFound)));
}

#[sqlx::test(migrations = "../../migrations")]
async fn campaign_is_created_running_with_null_completion(pool: sqlx::PgPool) {
    let id = seed_campaign(&pool, 1).await;
    let row = get_campaign(&pool, id).await.expect("get");

    assert_eq!(row.status(), Some(CampaignStatus::Running));
    assert!(row.completed_at.is_none());
    assert!(row.strategy.is_none());
    assert!(row.estimated_reach.is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn completion_sets_timestamp_and_sums_artifact_reach(pool: sqlx::PgPool) {
    let id = seed_campaign(&pool, 1).await;

    for (platform, reach) in [("blog", 1000), ("twitter", 500), ("linkedin", 800)] {
        insert_content(
            &pool,
            &NewContent {
                campaign_id: id,
                agent_type: platform,
                platform,
                content_type: "article",
                title: "t",
                body: "b",
                metadata: None,
                estimated_reach: reach,
            },
        )
        .await
        .expect("insert content");
    }

    complete_campaign(&pool, id).await.expect("complete");
    let row = get_campaign(&pool, id).await.expect("get");

    assert_eq!(row.status(), Some(CampaignStatus::Completed));
    assert!(row.completed_at.is_some());
    assert_eq!(row.estimated_reach, Some(2300));
}

#[sqlx::test(migrations = "../../migrations")]
async fn completion_with_no_artifacts_records_zero_reach(pool: sqlx::PgPool) {
    let id = seed_campaign(&pool, 1).await;
    complete_campaign(&pool, id).await.expect("complete");
    let row = get_campaign(&pool, id).await.expect("get");
    assert_eq!(row.estimated_reach, Some(0));
}

#[sqlx::test(migrations = "../../migrations")]
async fn failed_campaign_keeps_completed_at_null(pool: sqlx::PgPool) {
    let id = seed_campaign(&pool, 1).await;
    fail_campaign(&pool, id).await.expect("fail");
    let row = get_campaign(&pool, id).await.expect("get");

    assert_eq!(row.status(), Some(CampaignStatus::Failed));
    assert!(row.completed_at.is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn terminal_campaigns_reject_further_transitions(pool: sqlx::PgPool) {
    let id = seed_campaign(&pool, 1).await;
    fail_campaign(&pool, id).await.expect("fail");

    let result = complete_campaign(&pool, id).await;
    assert!(
        matches!(result, Err(DbError::InvalidStatusTransition { ref from, .. }) if from == "failed"),
        "expected InvalidStatusTransition, got: {result:?}"
    );

    let result = fail_campaign(&pool, id).await;
    assert!(matches!(result, Err(DbError::InvalidStatusTransition { .. })));
}

#[sqlx::test(migrations = "../../migrations")]
async fn pending_campaign_cannot_fail_directly(pool: sqlx::PgPool) {
    let profile_id = create_brand_profile(&pool, &demo_profile(1))
        .await
        .expect("create profile");
    let id = create_campaign(&pool, 1, profile_id, "goal", CampaignStatus::Pending)
        .await
        .expect("create campaign");

    // pending → failed skips running; the guard matches can_transition_to.
    let result = fail_campaign(&pool, id).await;
    assert!(
        matches!(result, Err(DbError::InvalidStatusTransition { ref from, .. }) if from == "pending"),
        "expected InvalidStatusTransition, got: {result:?}"
    );
    assert_eq!(
        get_campaign(&pool, id).await.expect("get").status(),
        Some(CampaignStatus::Pending)
    );
}

#[sqlx::test(migrations = "../../migrations")]
async fn completing_missing_campaign_is_not_found(pool: sqlx::PgPool) {
    let result = complete_campaign(&pool, 424_242).await;
    assert!(matches!(result, Err(DbError::NotFound)));
}

#[sqlx::test(migrations = "../../migrations")]
async fn strategy_and_keywords_are_persisted(pool: sqlx::PgPool) {
    let id = seed_campaign(&pool, 1).await;
    set_campaign_strategy(&pool, id, "Own the citation graph.", Some("geo, ai search"))
        .await
        .expect("set strategy");

    let row = get_campaign(&pool, id).await.expect("get");
    assert_eq!(row.strategy.as_deref(), Some("Own the citation graph."));
    assert_eq!(row.keywords.as_deref(), Some("geo, ai search"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn activities_read_back_in_emission_order(pool: sqlx::PgPool) {
    let id = seed_campaign(&pool, 1).await;

    for (i, kind) in [
        ActivityKind::StatusUpdate,
        ActivityKind::Message,
        ActivityKind::ContentGenerated,
        ActivityKind::StatusUpdate,
    ]
    .iter()
    .enumerate()
    {
        append_activity(
            &pool,
            &NewActivity {
                campaign_id: id,
                agent_type: "super",
                kind: *kind,
                message: &format!("event {i}"),
                status: None,
            },
        )
        .await
        .expect("append");
    }

    let activities = list_activities(&pool, id).await.expect("list");
    assert_eq!(activities.len(), 4);
    for (i, row) in activities.iter().enumerate() {
        assert_eq!(row.message.as_deref(), Some(format!("event {i}").as_str()));
    }
    // Non-decreasing creation times.
    for pair in activities.windows(2) {
        assert!(pair[0].created_at <= pair[1].created_at);
    }
}

#[sqlx::test(migrations = "../../migrations")]
async fn identical_launches_produce_independent_campaigns(pool: sqlx::PgPool) {
    let first = seed_campaign(&pool, 7).await;
    let second = seed_campaign(&pool, 7).await;
    assert_ne!(first, second);

    append_activity(
        &pool,
        &NewActivity {
            campaign_id: first,
            agent_type: "super",
            kind: ActivityKind::StatusUpdate,
            message: "only on the first",
            status: None,
        },
    )
    .await
    .expect("append");

    assert_eq!(list_activities(&pool, first).await.expect("list").len(), 1);
    assert!(list_activities(&pool, second).await.expect("list").is_empty());
    assert_eq!(list_campaigns_by_user(&pool, 7).await.expect("list").len(), 2);
}

#[sqlx::test(migrations = "../../migrations")]
async fn content_lists_in_creation_order(pool: sqlx::PgPool) {
    let id = seed_campaign(&pool, 1).await;

    for title in ["first", "second"] {
        insert_content(
            &pool,
            &NewContent {
                campaign_id: id,
                agent_type: "blog",
                platform: "blog",
                content_type: "article",
                title,
                body: "body",
                metadata: Some("{\"hashtags\":[]}"),
                estimated_reach: 1000,
            },
        )
        .await
        .expect("insert");
    }

    let rows = list_content(&pool, id).await.expect("list");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].title.as_deref(), Some("first"));
    assert_eq!(rows[1].title.as_deref(), Some("second"));
}
