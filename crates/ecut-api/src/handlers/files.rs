//! Static delivery of uploaded videos and finished clips.

use std::path::PathBuf;

use axum::body::Body;
use axum::extract::{Path, Request, State};
use axum::response::{IntoResponse, Response};
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::error::{ApiError, ApiResult};
use crate::handlers::validate_path_component;
use crate::state::AppState;

/// Serve an uploaded source video.
pub async fn serve_video(
    State(state): State<AppState>,
    Path(name): Path<String>,
    request: Request,
) -> ApiResult<Response> {
    let path = state.worker.videos_dir.join(validate_path_component(&name)?);
    serve_file(path, "Video not found", request).await
}

/// Serve a finished (or raw) clip of a job.
pub async fn serve_clip(
    State(state): State<AppState>,
    Path((job_id, clip_name)): Path<(String, String)>,
    request: Request,
) -> ApiResult<Response> {
    let path = state
        .worker
        .clips_dir
        .join(validate_path_component(&job_id)?)
        .join(validate_path_component(&clip_name)?);
    serve_file(path, "Clip not found", request).await
}

async fn serve_file(path: PathBuf, missing: &str, request: Request<Body>) -> ApiResult<Response> {
    if !tokio::fs::metadata(&path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
    {
        return Err(ApiError::not_found(missing));
    }

    // ServeFile handles content type, Range and conditional requests
    match ServeFile::new(path).oneshot(request).await {
        Ok(response) => Ok(response.into_response()),
        Err(e) => Err(ApiError::internal(e.to_string())),
    }
}
