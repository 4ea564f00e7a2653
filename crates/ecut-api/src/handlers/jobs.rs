//! Job status handler.

use axum::extract::{Path, State};
use axum::Json;

use ecut_models::{JobId, JobRecord};

use crate::error::{ApiError, ApiResult};
use crate::handlers::validate_path_component;
use crate::state::AppState;

/// Current record for a job: `processing`, `done` with clips, or `error`.
pub async fn get_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<JobRecord>> {
    let job_id = JobId::from_string(validate_path_component(&job_id)?);

    state
        .store
        .get(&job_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Job not found"))
}
