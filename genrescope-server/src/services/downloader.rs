//! External audio download via yt-dlp
//!
//! Thin wrapper around the `yt-dlp` executable: search for one result,
//! extract mp3 audio into the upload directory. The tool must be on PATH.

use std::path::Path;
use thiserror::Error;
use tokio::process::Command;

/// Download failures
#[derive(Debug, Error)]
pub enum DownloadError {
    /// yt-dlp could not be launched (usually: not installed)
    #[error("failed to launch yt-dlp: {0}")]
    Spawn(String),

    /// yt-dlp ran but reported failure
    #[error("yt-dlp failed: {0}")]
    Tool(String),
}

/// Search for `query` and download the first result as mp3 into `output_dir`
pub async fn download_track(query: &str, output_dir: &Path) -> Result<(), DownloadError> {
    tokio::fs::create_dir_all(output_dir)
        .await
        .map_err(|e| DownloadError::Spawn(format!("create {}: {}", output_dir.display(), e)))?;

    let output_template = output_dir.join("%(title)s.%(ext)s");
    let output = Command::new("yt-dlp")
        .arg("-x")
        .arg("--audio-format")
        .arg("mp3")
        .arg(format!("ytsearch1:{}", query))
        .arg("-o")
        .arg(&output_template)
        .output()
        .await
        .map_err(|e| DownloadError::Spawn(e.to_string()))?;

    if output.status.success() {
        tracing::info!(query, "Download complete");
        Ok(())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        tracing::warn!(query, stderr = %stderr, "Download failed");
        Err(DownloadError::Tool(stderr.trim().to_string()))
    }
}
