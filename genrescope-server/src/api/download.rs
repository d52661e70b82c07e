//! External download endpoint (yt-dlp)

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::services::downloader::{download_track, DownloadError};
use crate::AppState;

/// Download request body
#[derive(Debug, Deserialize)]
pub struct DownloadRequest {
    pub query: Option<String>,
}

/// Download acknowledgement
#[derive(Debug, Serialize)]
pub struct DownloadResponse {
    pub message: String,
}

/// POST /api/download
pub async fn download(
    State(state): State<AppState>,
    Json(request): Json<DownloadRequest>,
) -> ApiResult<Json<DownloadResponse>> {
    let query = request
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::BadRequest("no search query provided".to_string()))?;

    match download_track(query, &state.config.upload_dir).await {
        Ok(()) => Ok(Json(DownloadResponse {
            message: "Song downloaded successfully".to_string(),
        })),
        Err(e @ DownloadError::Spawn(_)) => Err(ApiError::Internal(e.to_string())),
        Err(DownloadError::Tool(stderr)) => {
            Err(ApiError::Internal(format!("download failed: {}", stderr)))
        }
    }
}

/// Build download routes
pub fn download_routes() -> Router<AppState> {
    Router::new().route("/api/download", post(download))
}
