//! Schedule building endpoint.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::engine::{Combination, Constraints, PipelineStats, ScheduleError};
use crate::server::types::ApiErrorType;
use crate::store::StoreError;
use crate::types::AppState;

/// Body of a schedule request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    pub constraints: Constraints,
    /// Overrides the configured number of schedules to return
    #[serde(default)]
    pub top_k: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResponse {
    /// False when the search budget ran out and `schedules` is partial
    pub complete: bool,
    pub examined: u64,
    pub schedules: Vec<Combination>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<PipelineStats>,
}

/// Converts ScheduleError to API response.
fn schedule_error_to_response(error: ScheduleError) -> Response {
    let (status, message) = match &error {
        ScheduleError::DataUnavailable(StoreError::NotFound { .. }) => {
            (StatusCode::NOT_FOUND, "No data stored for this school")
        }
        ScheduleError::DataUnavailable(StoreError::Connection { .. }) => (
            StatusCode::SERVICE_UNAVAILABLE,
            "Snapshot store unavailable",
        ),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to build schedules",
        ),
    };

    ApiErrorType::from((status, message, Some(error.to_string()))).into_response()
}

/// POST /schools/:school_id/schedules
///
/// Builds the best conflict-free schedules for the given constraints from
/// the school's latest catalog and rating snapshots.
pub async fn post_schedules(
    Path(school_id): Path<String>,
    State(s): State<Arc<AppState>>,
    Json(request): Json<ScheduleRequest>,
) -> Response {
    info!("POST /schools/{}/schedules", school_id);

    let top_k = request.top_k.unwrap_or(s.engine.config().top_k);
    let state = s.clone();
    let school = school_id.clone();

    // Enumeration is CPU-bound; keep it off the async workers
    let result = tokio::task::spawn_blocking(move || {
        state
            .engine
            .build_for_school(state.source.as_ref(), &school, &request.constraints, top_k)
    })
    .await;

    match result {
        Ok(Ok(outcome)) => (
            StatusCode::OK,
            Json(ScheduleResponse {
                complete: true,
                examined: outcome.stats.candidates_examined,
                schedules: outcome.schedules,
                stats: Some(outcome.stats),
            }),
        )
            .into_response(),
        Ok(Err(ScheduleError::SearchBudgetExceeded {
            examined, partial, ..
        })) => {
            warn!(
                school_id = %school_id,
                examined,
                returned = partial.len(),
                "Returning partial schedules"
            );
            (
                StatusCode::OK,
                Json(ScheduleResponse {
                    complete: false,
                    examined,
                    schedules: partial,
                    stats: None,
                }),
            )
                .into_response()
        }
        Ok(Err(e)) => {
            error!(school_id = %school_id, error = %e, "Failed to build schedules");
            schedule_error_to_response(e)
        }
        Err(e) => {
            error!(school_id = %school_id, error = %e, "Schedule task failed");
            ApiErrorType::from((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to build schedules",
                Some(e.to_string()),
            ))
            .into_response()
        }
    }
}
