use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use folio_core::SOCIAL_SNAPSHOT_KEY;

use super::{json_error, AppState, READ_CACHE_CONTROL};

/// Serve the stored snapshot exactly as written by the last refresh.
pub(super) async fn latest_counts(State(state): State<AppState>) -> Response {
    match state.store.get(SOCIAL_SNAPSHOT_KEY).await {
        Ok(Some(entry)) => (
            StatusCode::OK,
            [(header::CACHE_CONTROL, READ_CACHE_CONTROL)],
            Json(entry.value),
        )
            .into_response(),
        Ok(None) => json_error(StatusCode::SERVICE_UNAVAILABLE, "No cached data yet"),
        Err(e) => {
            tracing::error!(error = %e, "social stats read failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}
