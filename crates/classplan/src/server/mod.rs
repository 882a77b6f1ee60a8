use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;

use crate::server::endpoints::{cache, schedules, status};
use crate::types::AppState;

mod endpoints;
mod types;

/// Creates a router that can be used by `axum`.
///
/// # Parameters
/// - `app_state`: The app server state.
///
/// # Returns
/// The router.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let cache_router = Router::new()
        .route("/cache/stats", get(cache::get_cache_stats))
        .route("/cache/clear", post(cache::post_clear_cache))
        .route("/cache/:school_id", delete(cache::delete_school_cache));

    Router::new()
        .route("/health", get(status::get_health))
        .route(
            "/schools/:school_id/schedules",
            post(schedules::post_schedules),
        )
        .merge(cache_router)
        .with_state(app_state)
}
