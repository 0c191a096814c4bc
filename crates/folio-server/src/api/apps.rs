use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use folio_core::{is_numeric_id, AppCacheEntry};
use folio_refresh::APP_CACHE_TTL_MS;
use serde::Deserialize;

use super::{json_error, AppState};

/// `Cache-Control` on responses fetched live from iTunes. Cached responses
/// carry none.
const LIVE_CACHE_CONTROL: &str = "public, max-age=43200, stale-while-revalidate=86400";

#[derive(Debug, Deserialize)]
pub(super) struct AppQuery {
    id: Option<String>,
}

/// Serve an app's lookup payload, read-through over the cache.
///
/// A cache entry younger than the TTL is served as is. Otherwise the app is
/// looked up live and re-cached; if that fails, a stale entry is still
/// better than an error.
pub(super) async fn app_data(State(state): State<AppState>, Query(query): Query<AppQuery>) -> Response {
    let Some(app_id) = query.id.filter(|id| !id.is_empty()) else {
        return json_error(StatusCode::BAD_REQUEST, "Missing app ID parameter");
    };
    if !is_numeric_id(&app_id) {
        return json_error(StatusCode::BAD_REQUEST, "Invalid app ID format");
    }

    let cached = match state.apps.cached(&app_id).await {
        Ok(entry) => entry,
        Err(e) => {
            tracing::warn!(app_id = %app_id, error = %e, "app cache read failed; fetching live");
            None
        }
    };

    if let Some(entry) = &cached {
        if entry.is_fresh(Utc::now().timestamp_millis(), APP_CACHE_TTL_MS) {
            return from_cache(entry);
        }
    }

    match state.apps.fetch_live(&app_id).await {
        Ok(entry) => (
            StatusCode::OK,
            [(header::CACHE_CONTROL, LIVE_CACHE_CONTROL)],
            Json(entry.data),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(app_id = %app_id, error = %e, stale = cached.is_some(), "live app lookup failed");
            match &cached {
                Some(entry) => from_cache(entry),
                None => json_error(StatusCode::INTERNAL_SERVER_ERROR, e.detail()),
            }
        }
    }
}

fn from_cache(entry: &AppCacheEntry) -> Response {
    (StatusCode::OK, Json(entry.data.clone())).into_response()
}
