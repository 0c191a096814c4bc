use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use folio_core::{GITHUB_LANGUAGES_SVG_KEY, GITHUB_STATS_SVG_KEY};
use serde::Deserialize;
use serde_json::Value;

use super::{AppState, READ_CACHE_CONTROL};

#[derive(Debug, Deserialize)]
pub(super) struct CardQuery {
    #[serde(rename = "type")]
    kind: Option<String>,
}

fn card_key(kind: Option<&str>) -> Option<&'static str> {
    match kind? {
        "stats" => Some(GITHUB_STATS_SVG_KEY),
        "languages" => Some(GITHUB_LANGUAGES_SVG_KEY),
        _ => None,
    }
}

/// Serve a rendered SVG card. Failures are plain text.
pub(super) async fn card(State(state): State<AppState>, Query(query): Query<CardQuery>) -> Response {
    let Some(key) = card_key(query.kind.as_deref()) else {
        return (
            StatusCode::BAD_REQUEST,
            "Missing or invalid type parameter (stats|languages)",
        )
            .into_response();
    };

    match state.store.get(key).await {
        Ok(Some(entry)) => match entry.value {
            Value::String(svg) => (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "image/svg+xml"),
                    (header::CACHE_CONTROL, READ_CACHE_CONTROL),
                ],
                svg,
            )
                .into_response(),
            other => {
                tracing::error!(key, kind = json_kind(&other), "stored card is not a string");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        },
        Ok(None) => (StatusCode::SERVICE_UNAVAILABLE, "No cached data yet").into_response(),
        Err(e) => {
            tracing::error!(key, error = %e, "github card read failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
