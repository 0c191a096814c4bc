//! Manual refresh triggers. Each runs its cycle to completion before
//! responding.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::AppState;

pub(super) async fn refresh_social(State(state): State<AppState>) -> Response {
    let outcome = state.social.refresh().await;
    if outcome.written {
        (StatusCode::OK, "Stats updated successfully").into_response()
    } else {
        internal_error()
    }
}

pub(super) async fn refresh_github(State(state): State<AppState>) -> Response {
    let Some(github) = &state.github else {
        return (StatusCode::NOT_FOUND, "GitHub refresh is not configured").into_response();
    };

    match github.refresh().await {
        Ok(_) => (StatusCode::OK, "GitHub stats updated successfully").into_response(),
        Err(e) => {
            tracing::error!(error = %e, "manual github refresh failed");
            internal_error()
        }
    }
}

pub(super) async fn refresh_apps(State(state): State<AppState>) -> Response {
    match state.apps.refresh().await {
        Ok(_) => (StatusCode::OK, "Apps data updated successfully").into_response(),
        Err(e) => {
            tracing::error!(error = %e, "manual apps refresh failed");
            internal_error()
        }
    }
}

fn internal_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
}
