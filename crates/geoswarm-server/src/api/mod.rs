mod brand_profiles;
mod campaigns;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use geoswarm_llm::LlmClient;
use serde::Serialize;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::middleware::{
    enforce_rate_limit, request_id, require_bearer_auth, AuthState, RateLimitState, RequestId,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub llm: Arc<LlmClient>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "unauthorized" => StatusCode::UNAUTHORIZED,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "conflict" => StatusCode::CONFLICT,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_db_error(request_id: String, error: &geoswarm_db::DbError) -> ApiError {
    if matches!(error, geoswarm_db::DbError::NotFound) {
        return ApiError::new(request_id, "not_found", "record not found");
    }
    tracing::error!(error = %error, "database query failed");
    ApiError::new(request_id, "internal_error", "database query failed")
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
}

fn protected_router(auth: AuthState, rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/brand-profiles",
            get(brand_profiles::get_brand_profile).post(brand_profiles::create_brand_profile),
        )
        .route(
            "/api/v1/brand-profiles/{id}",
            axum::routing::patch(brand_profiles::update_brand_profile),
        )
        .route(
            "/api/v1/campaigns",
            get(campaigns::list_campaigns).post(campaigns::launch_campaign),
        )
        .route("/api/v1/campaigns/{id}", get(campaigns::get_campaign))
        .route(
            "/api/v1/campaigns/{id}/content",
            get(campaigns::list_campaign_content),
        )
        .route(
            "/api/v1/campaigns/{id}/activities",
            get(campaigns::list_campaign_activities),
        )
        .route(
            "/api/v1/campaigns/{id}/messages",
            post(campaigns::send_campaign_message),
        )
        .route("/api/v1/demo", post(campaigns::launch_demo))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn_with_state(
                    rate_limit,
                    enforce_rate_limit,
                ))
                .layer(axum::middleware::from_fn_with_state(
                    auth,
                    require_bearer_auth,
                )),
        )
}

pub fn build_app(state: AppState, auth: AuthState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new().route("/api/v1/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(protected_router(auth, rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    match geoswarm_db::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    database: "ok",
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        database: "unavailable",
                    },
                    meta,
                }),
            )
        }
    }
}

pub fn default_rate_limit_state() -> RateLimitState {
    RateLimitState::new(120, Duration::from_secs(60))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn test_state(pool: PgPool) -> AppState {
        let llm = LlmClient::new("http://localhost:9", "test-key", "test-model", 5)
            .expect("client construction");
        AppState {
            pool,
            llm: Arc::new(llm),
        }
    }

    fn test_app(pool: PgPool) -> Router {
        let auth = AuthState::from_env(true).expect("auth");
        build_app(test_state(pool), auth, default_rate_limit_state())
    }

    #[test]
    fn api_error_validation_error_maps_to_bad_request() {
        let response = ApiError::new("req-1", "validation_error", "invalid input").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn api_error_not_found_maps_to_404() {
        let response = ApiError::new("req-1", "not_found", "no such campaign").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn map_db_error_distinguishes_not_found() {
        let err = map_db_error("r".to_string(), &geoswarm_db::DbError::NotFound);
        assert_eq!(err.error.code, "not_found");

        let err = map_db_error("r".to_string(), &geoswarm_db::DbError::MissingDatabaseUrl);
        assert_eq!(err.error.code, "internal_error");
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn auth_rejection_uses_response_envelope(pool: sqlx::PgPool) {
        let auth = AuthState::from_keys(std::collections::HashSet::from(["secret".to_owned()]));
        let app = build_app(test_state(pool), auth, default_rate_limit_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/campaigns?user_id=1")
                    .header("x-request-id", "envelope-check")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
        assert_eq!(json["error"]["code"].as_str(), Some("unauthorized"));
        assert_eq!(json["meta"]["request_id"].as_str(), Some("envelope-check"));
        assert!(json["meta"]["timestamp"].is_string());
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn rate_limit_rejection_uses_response_envelope(pool: sqlx::PgPool) {
        let auth = AuthState::from_env(true).expect("auth");
        let rate_limit = crate::middleware::RateLimitState::new(0, Duration::from_secs(60));
        let app = build_app(test_state(pool), auth, rate_limit);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/campaigns?user_id=1")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
        assert_eq!(json["error"]["code"].as_str(), Some("rate_limited"));
        assert!(json["meta"]["request_id"].is_string());
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn health_returns_ok_with_live_pool(pool: sqlx::PgPool) {
        let response = test_app(pool)
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
        assert_eq!(json["data"]["status"].as_str(), Some("ok"));
        assert!(json["meta"]["request_id"].is_string());
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn request_id_header_is_echoed(pool: sqlx::PgPool) {
        let response = test_app(pool)
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .header("x-request-id", "fixed-id-1")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(
            response
                .headers()
                .get("x-request-id")
                .map(|v| v.to_str().expect("header value is valid ascii")),
            Some("fixed-id-1")
        );
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn create_brand_profile_round_trips_through_api(pool: sqlx::PgPool) {
        let app = test_app(pool);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/brand-profiles")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        serde_json::json!({
                            "user_id": 7,
                            "company_name": "Acme Robotics",
                            "industry": "Industrial automation",
                            "brand_voice": "professional"
                        })
                        .to_string(),
                    ))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
        assert!(json["data"]["id"].as_i64().is_some());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/brand-profiles?user_id=7")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
        assert_eq!(json["data"]["company_name"].as_str(), Some("Acme Robotics"));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn create_brand_profile_rejects_empty_company_name(pool: sqlx::PgPool) {
        let response = test_app(pool)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/brand-profiles")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        serde_json::json!({ "user_id": 1, "company_name": "   " }).to_string(),
                    ))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn create_brand_profile_rejects_unknown_voice(pool: sqlx::PgPool) {
        let response = test_app(pool)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/brand-profiles")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        serde_json::json!({
                            "user_id": 1,
                            "company_name": "Acme",
                            "brand_voice": "sarcastic"
                        })
                        .to_string(),
                    ))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn get_brand_profile_returns_404_when_absent(pool: sqlx::PgPool) {
        let response = test_app(pool)
            .oneshot(
                Request::builder()
                    .uri("/api/v1/brand-profiles?user_id=404404")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn launch_rejects_empty_goal(pool: sqlx::PgPool) {
        let profile_id = geoswarm_db::create_brand_profile(
            &pool,
            &geoswarm_db::NewBrandProfile {
                user_id: 3,
                company_name: "Acme".to_string(),
                industry: None,
                description: None,
                product_service: None,
                target_audience: None,
                brand_voice: geoswarm_core::BrandVoice::Professional,
                value_propositions: None,
                competitors: None,
                marketing_goals: None,
            },
        )
        .await
        .expect("profile");

        let response = test_app(pool)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/campaigns")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        serde_json::json!({
                            "user_id": 3,
                            "brand_profile_id": profile_id,
                            "goal": "  "
                        })
                        .to_string(),
                    ))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn launch_rejects_foreign_brand_profile(pool: sqlx::PgPool) {
        let profile_id = geoswarm_db::create_brand_profile(
            &pool,
            &geoswarm_db::NewBrandProfile {
                user_id: 10,
                company_name: "Owner Co".to_string(),
                industry: None,
                description: None,
                product_service: None,
                target_audience: None,
                brand_voice: geoswarm_core::BrandVoice::Professional,
                value_propositions: None,
                competitors: None,
                marketing_goals: None,
            },
        )
        .await
        .expect("profile");

        // user 11 tries to launch against user 10's profile
        let response = test_app(pool)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/campaigns")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        serde_json::json!({
                            "user_id": 11,
                            "brand_profile_id": profile_id,
                            "goal": "a real goal"
                        })
                        .to_string(),
                    ))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn campaign_detail_returns_404_for_unknown_id(pool: sqlx::PgPool) {
        let response = test_app(pool)
            .oneshot(
                Request::builder()
                    .uri("/api/v1/campaigns/987654")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn feedback_rejects_empty_message(pool: sqlx::PgPool) {
        let profile_id = geoswarm_db::create_brand_profile(
            &pool,
            &geoswarm_db::NewBrandProfile {
                user_id: 5,
                company_name: "Acme".to_string(),
                industry: None,
                description: None,
                product_service: None,
                target_audience: None,
                brand_voice: geoswarm_core::BrandVoice::Professional,
                value_propositions: None,
                competitors: None,
                marketing_goals: None,
            },
        )
        .await
        .expect("profile");
        let campaign_id = geoswarm_db::create_campaign(
            &pool,
            5,
            profile_id,
            "goal",
            geoswarm_core::CampaignStatus::Running,
        )
        .await
        .expect("campaign");

        let response = test_app(pool)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/api/v1/campaigns/{campaign_id}/messages"))
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::json!({ "message": "" }).to_string()))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
