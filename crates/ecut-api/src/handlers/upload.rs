//! Video upload handler.

use std::path::Path;

use axum::extract::multipart::Field;
use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use ecut_models::{JobId, JobRecord};
use ecut_queue::ProcessVideoJob;

use crate::error::{ApiError, ApiResult};
use crate::metrics::record_upload;
use crate::state::AppState;

/// Multipart field holding the video.
const FILE_FIELD: &str = "file";

/// Upload response.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub job_id: String,
}

/// File extension for an accepted upload content type.
fn video_extension(content_type: &str) -> Option<&'static str> {
    match content_type {
        "video/mp4" => Some("mp4"),
        "video/quicktime" => Some("mov"),
        _ => None,
    }
}

/// Accept a video and start processing it in the background.
///
/// The upload is saved as `{videos_dir}/{job_id}.{mp4,mov}`, a `processing`
/// record is written, and the job is queued. Nothing is created when the
/// content type is rejected; a job that cannot be queued is closed as
/// `error` and its video removed.
pub async fn upload_video(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let extension = field
            .content_type()
            .and_then(video_extension)
            .ok_or_else(|| ApiError::bad_request("Only .mp4 or .mov files are accepted."))?;

        let job_id = JobId::new();
        let video_path = state
            .worker
            .videos_dir
            .join(format!("{}.{}", job_id, extension));

        let size = save_field(field, &video_path).await?;
        info!(
            job_id = %job_id,
            path = %video_path.display(),
            bytes = size,
            "Saved upload"
        );

        state.store.set(&job_id, &JobRecord::processing()).await?;
        if let Err(e) = state
            .jobs
            .enqueue(ProcessVideoJob::new(job_id.clone(), video_path.clone()))
            .await
        {
            discard_upload(&state, &job_id, &video_path, &e.to_string()).await;
            return Err(e.into());
        }
        record_upload();

        return Ok(Json(UploadResponse {
            job_id: job_id.to_string(),
        }));
    }

    Err(ApiError::bad_request("Missing file field"))
}

/// Undo an upload that could not be queued: the saved video is removed and
/// the record is closed as `error`.
async fn discard_upload(state: &AppState, job_id: &JobId, video_path: &Path, reason: &str) {
    warn!(job_id = %job_id, "Failed to queue upload: {}", reason);

    if let Err(e) = tokio::fs::remove_file(video_path).await {
        warn!(path = %video_path.display(), "Failed to remove upload: {}", e);
    }
    let record = JobRecord::failed(format!("Failed to queue job: {}", reason));
    if let Err(e) = state.store.set(job_id, &record).await {
        warn!(job_id = %job_id, "Failed to record queue failure: {}", e);
    }
}

/// Stream a multipart field to disk, removing the partial file on failure.
async fn save_field(mut field: Field<'_>, path: &Path) -> ApiResult<u64> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let result = async {
        let mut file = tokio::fs::File::create(path).await?;
        let mut written = 0u64;
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed to read upload: {}", e)))?
        {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;
        Ok::<_, ApiError>(written)
    }
    .await;

    if result.is_err() {
        if let Err(e) = tokio::fs::remove_file(path).await {
            warn!(path = %path.display(), "Failed to remove partial upload: {}", e);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_extension() {
        assert_eq!(video_extension("video/mp4"), Some("mp4"));
        assert_eq!(video_extension("video/quicktime"), Some("mov"));
        assert_eq!(video_extension("video/x-matroska"), None);
        assert_eq!(video_extension("text/plain"), None);
    }
}
