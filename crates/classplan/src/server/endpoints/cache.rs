//! Cache management endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use crate::server::types::ApiErrorType;
use crate::types::{AppState, CacheControl};

fn with_cache(state: &AppState, f: impl FnOnce(&dyn CacheControl) -> Response) -> Response {
    match &state.cache {
        Some(cache) => f(cache.as_ref()),
        None => ApiErrorType::from((StatusCode::NOT_FOUND, "Snapshot caching is disabled", None))
            .into_response(),
    }
}

/// GET /cache/stats
pub async fn get_cache_stats(State(s): State<Arc<AppState>>) -> Response {
    with_cache(&s, |cache| (StatusCode::OK, Json(cache.stats())).into_response())
}

/// POST /cache/clear
pub async fn post_clear_cache(State(s): State<Arc<AppState>>) -> Response {
    info!("POST /cache/clear");
    with_cache(&s, |cache| {
        cache.clear();
        (StatusCode::OK, Json(json!({ "cleared": true }))).into_response()
    })
}

/// DELETE /cache/:school_id
pub async fn delete_school_cache(
    Path(school_id): Path<String>,
    State(s): State<Arc<AppState>>,
) -> Response {
    info!("DELETE /cache/{}", school_id);
    with_cache(&s, |cache| {
        cache.invalidate(&school_id);
        (
            StatusCode::OK,
            Json(json!({ "invalidated": school_id })),
        )
            .into_response()
    })
}
