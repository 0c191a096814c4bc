mod apps;
mod github;
mod refresh;
mod social;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, MethodRouter},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use folio_db::KvStore;
use folio_refresh::{AppsRefresher, GithubRefresher, SocialRefresher};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{
    enforce_rate_limit, preflight_no_content, request_id, require_bearer_auth, AuthState,
    RateLimitState, RequestId,
};

/// `Cache-Control` for the social and GitHub read endpoints.
pub(crate) const READ_CACHE_CONTROL: &str = "public, max-age=3600";

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn KvStore>,
    pub social: Arc<SocialRefresher>,
    /// `None` when no GitHub username is configured.
    pub github: Option<Arc<GithubRefresher>>,
    pub apps: Arc<AppsRefresher>,
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

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

/// `{"error": "..."}`, the body of every JSON failure response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

pub(crate) fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    store: &'static str,
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(Duration::from_secs(86_400))
}

/// A GET route that answers bare `OPTIONS` with 204 and any other method
/// with `not_allowed`.
fn read_route<H, T>(handler: H, not_allowed: fn() -> Response) -> MethodRouter<AppState>
where
    H: axum::handler::Handler<T, AppState>,
    T: 'static,
{
    get(handler)
        .options(|| async { StatusCode::NO_CONTENT })
        .fallback(move || async move { not_allowed() })
}

fn json_method_not_allowed() -> Response {
    json_error(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

fn text_method_not_allowed() -> Response {
    (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed").into_response()
}

fn protected_router(auth: AuthState, rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/internal/refresh/social", post(refresh::refresh_social))
        .route("/internal/refresh/github", post(refresh::refresh_github))
        .route("/internal/refresh/apps", post(refresh::refresh_apps))
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
    let public_routes = Router::new()
        .route(
            "/api/v1/social-media-stats",
            read_route(social::latest_counts, json_method_not_allowed),
        )
        .route(
            "/stats",
            read_route(social::latest_counts, json_method_not_allowed),
        )
        .route(
            "/api/v1/github-stats",
            read_route(github::card, text_method_not_allowed),
        )
        .route(
            "/api/v1/app-store-data",
            read_route(apps::app_data, json_method_not_allowed),
        )
        .route("/api/v1/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(protected_router(auth, rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(axum::middleware::from_fn(request_id))
                .layer(axum::middleware::from_fn(preflight_no_content))
                .layer(build_cors()),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    match state.store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    store: state.store.backend(),
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, backend = state.store.backend(), "health check: store unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        store: "unavailable",
                    },
                    meta,
                }),
            )
        }
    }
}

pub fn default_rate_limit_state() -> RateLimitState {
    RateLimitState::new(30, Duration::from_secs(60))
}
