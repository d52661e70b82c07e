//! Upload-library listing

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::time::UNIX_EPOCH;

use crate::error::ApiResult;
use crate::services::album_art::album_art_url;
use crate::AppState;

/// One library entry
#[derive(Debug, Serialize)]
pub struct TrackInfo {
    /// File name within the upload directory
    pub name: String,
    /// Modification time, seconds since the Unix epoch
    pub modified: u64,
    /// Placeholder album-art URL
    pub album_art: String,
}

/// GET /api/tracks
///
/// Lists accepted audio files in the upload directory, newest first. A
/// missing upload directory reads as an empty library.
pub async fn list_tracks(State(state): State<AppState>) -> ApiResult<Json<Vec<TrackInfo>>> {
    let mut tracks = Vec::new();

    let mut entries = match tokio::fs::read_dir(&state.config.upload_dir).await {
        Ok(entries) => entries,
        Err(_) => return Ok(Json(tracks)),
    };

    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if !super::allowed_file(&name) {
            continue;
        }
        let metadata = entry.metadata().await?;
        if !metadata.is_file() {
            continue;
        }
        let modified = metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_secs())
            .unwrap_or(0);

        tracks.push(TrackInfo {
            album_art: album_art_url(&name),
            name,
            modified,
        });
    }

    tracks.sort_by(|a, b| b.modified.cmp(&a.modified));
    Ok(Json(tracks))
}

/// Build track listing routes
pub fn track_routes() -> Router<AppState> {
    Router::new().route("/api/tracks", get(list_tracks))
}
