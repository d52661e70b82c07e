//! Analysis pipeline orchestration
//!
//! Sequences decode + extract → classify → recommend for one audio file.
//! Each invocation is independent: it owns its waveform and tensor buffers
//! and shares only the read-only classifier handle. Failures carry the
//! stage that produced them so the boundary can report precisely.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use crate::db::catalog::{CatalogError, CatalogRepository};
use crate::models::{AnalysisOutcome, GenrePrediction, ScalarFeatures};

use super::audio_decoder::{decode_audio_file, DecodeError};
use super::classifier::{ClassifierError, GenrePredictor};
use super::features::scalar_features;
use super::recommender::recommend;
use super::spectrogram::classifier_tensor;

/// Pipeline failure, tagged with the stage that produced it
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),

    /// The blocking extraction task died (panic or shutdown)
    #[error("extraction failed: {0}")]
    Extract(String),

    #[error("classification failed: {0}")]
    Classify(#[from] ClassifierError),

    #[error("recommendation failed: {0}")]
    Recommend(#[from] CatalogError),
}

impl PipelineError {
    /// Stage name for error reporting
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::Decode(_) => "decode",
            PipelineError::Extract(_) => "extract",
            PipelineError::Classify(_) => "classify",
            PipelineError::Recommend(_) => "recommend",
        }
    }
}

/// Decode one file and run feature extraction plus classification
///
/// Synchronous and CPU-bound; callers on an async runtime should run it on
/// a blocking thread.
pub fn extract_and_classify(
    path: &Path,
    predictor: &dyn GenrePredictor,
) -> Result<(ScalarFeatures, GenrePrediction), PipelineError> {
    let audio = decode_audio_file(path)?;
    let features = scalar_features(&audio);
    let tensor = classifier_tensor(&audio);
    let prediction = predictor.predict(&tensor)?;

    tracing::info!(
        path = %path.display(),
        genre = prediction.label,
        duration_seconds = format!("{:.2}", audio.duration_seconds),
        "Track classified"
    );

    Ok((features, prediction))
}

/// Run the full pipeline for one audio file
///
/// Partial-result semantics: if the catalog fails after classification
/// succeeded, the outcome still carries the prediction and features, with
/// an empty recommendation list and a logged warning. Decode and classify
/// failures fail the whole analysis.
pub async fn analyze_track(
    path: PathBuf,
    predictor: Arc<dyn GenrePredictor>,
    catalog: Arc<dyn CatalogRepository>,
    prioritize_new_artists: bool,
) -> Result<AnalysisOutcome, PipelineError> {
    let (features, prediction) = tokio::task::spawn_blocking({
        let predictor = Arc::clone(&predictor);
        move || extract_and_classify(&path, predictor.as_ref())
    })
    .await
    .map_err(|e| PipelineError::Extract(e.to_string()))??;

    let recommendations =
        match recommend(catalog.as_ref(), prediction.label, &features, prioritize_new_artists)
            .await
            .map_err(PipelineError::from)
        {
            Ok(recommendations) => recommendations,
            Err(error) => {
                tracing::warn!(
                    stage = error.stage(),
                    error = %error,
                    genre = prediction.label,
                    "Returning classification without recommendations"
                );
                Vec::new()
            }
        };

    Ok(AnalysisOutcome {
        prediction,
        features,
        recommendations,
    })
}
