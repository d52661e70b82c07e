//! Analyze endpoint: run the full pipeline for one stored track

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use crate::error::{ApiError, ApiResult};
use crate::models::{Recommendation, ScalarFeatures};
use crate::services::{genre_facts, pipeline};
use crate::AppState;

/// Analyze request body
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    /// Name of a file in the upload library
    pub filename: String,
    /// Restrict recommendations to emerging artists when any exist
    #[serde(default = "default_prioritize")]
    pub prioritize_new_artists: bool,
}

fn default_prioritize() -> bool {
    true
}

/// Analyze response body
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub genre: &'static str,
    pub scores: Vec<f32>,
    pub features: ScalarFeatures,
    pub recommendations: Vec<Recommendation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre_fact: Option<String>,
}

/// POST /api/analyze
pub async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> ApiResult<Json<AnalyzeResponse>> {
    let filename = validate_filename(&request.filename)?;
    let path = state.config.upload_dir.join(filename);
    if !path.is_file() {
        return Err(ApiError::NotFound(format!("no such track: {}", filename)));
    }

    let outcome = pipeline::analyze_track(
        path,
        Arc::clone(&state.classifier),
        Arc::clone(&state.catalog),
        request.prioritize_new_artists,
    )
    .await
    .map_err(|e| {
        let error = ApiError::from(e);
        state.record_error(&error);
        error
    })?;

    let genre_fact =
        genre_facts::random_fact(&state.config.genre_facts_path, outcome.prediction.label).await;

    Ok(Json(AnalyzeResponse {
        genre: outcome.prediction.label,
        scores: outcome.prediction.scores,
        features: outcome.features,
        recommendations: outcome.recommendations,
        genre_fact,
    }))
}

/// Reject unsupported extensions and any path that escapes the upload dir
fn validate_filename(filename: &str) -> Result<&str, ApiError> {
    if !super::allowed_file(filename) {
        return Err(ApiError::BadRequest(format!(
            "unsupported file type: {} (expected one of {:?})",
            filename,
            super::ALLOWED_EXTENSIONS
        )));
    }
    // A plain file name has itself as its only component
    let is_bare_name = Path::new(filename)
        .file_name()
        .map(|n| n == filename)
        .unwrap_or(false);
    if !is_bare_name {
        return Err(ApiError::BadRequest(format!(
            "invalid file name: {}",
            filename
        )));
    }
    Ok(filename)
}

/// Build analyze routes
pub fn analyze_routes() -> Router<AppState> {
    Router::new().route("/api/analyze", post(analyze))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_validation_blocks_traversal() {
        assert!(validate_filename("song.mp3").is_ok());
        assert!(validate_filename("../etc/passwd.mp3").is_err());
        assert!(validate_filename("/etc/passwd.mp3").is_err());
        assert!(validate_filename("nested/song.mp3").is_err());
        assert!(validate_filename("song.txt").is_err());
    }
}
