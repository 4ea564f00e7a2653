//! Request handlers.

pub mod files;
pub mod health;
pub mod jobs;
pub mod upload;

pub use files::{serve_clip, serve_video};
pub use health::health;
pub use jobs::get_status;
pub use upload::upload_video;

use crate::error::{ApiError, ApiResult};

/// Check that a path parameter names a single file or directory entry.
pub(crate) fn validate_path_component(value: &str) -> ApiResult<&str> {
    let invalid = value.is_empty()
        || value.starts_with('.')
        || value.contains("..")
        || value.contains(|c: char| c == '/' || c == '\\' || c == '\0');

    if invalid {
        return Err(ApiError::bad_request("Invalid path"));
    }
    Ok(value)
}
