//! Genre classifier adapter
//!
//! Wraps the pretrained 10-genre model behind a small trait so the pipeline
//! and the HTTP layer depend on `predict` alone. The production
//! implementation runs an ONNX Runtime session built once at startup; the
//! artifact is treated as an opaque function from a (1, 210, 210, 1)
//! normalized tensor to a 10-way probability vector.

use ndarray::Array4;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use std::path::Path;
use std::sync::Mutex;
use thiserror::Error;

use genrescope_common::GENRE_LABELS;

use crate::models::GenrePrediction;

/// Classifier errors
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// Model artifact missing or incompatible. Fatal at process startup.
    #[error("Failed to load classifier model: {0}")]
    Load(String),

    /// Forward pass failed
    #[error("Classifier inference failed: {0}")]
    Inference(String),
}

/// The classifier seam used by the pipeline
///
/// Implementations must be deterministic: identical tensors yield identical
/// labels and scores across repeated calls.
pub trait GenrePredictor: Send + Sync {
    fn predict(&self, tensor: &Array4<f32>) -> Result<GenrePrediction, ClassifierError>;
}

/// ONNX Runtime-backed classifier
///
/// The session requires exclusive access to run, so it sits behind an
/// internal mutex; callers share one read-only handle (`Arc<Self>`) across
/// concurrent requests.
pub struct OnnxGenreClassifier {
    session: Mutex<Session>,
    input_name: String,
    output_name: String,
}

impl OnnxGenreClassifier {
    /// Build the inference session from a model artifact
    ///
    /// Called once at process start. A missing or malformed artifact, or a
    /// model that is not single-input/single-output, is a load error.
    pub fn load(model_path: &Path) -> Result<Self, ClassifierError> {
        if !model_path.exists() {
            return Err(ClassifierError::Load(format!(
                "model artifact not found: {}",
                model_path.display()
            )));
        }

        let session = Session::builder()
            .and_then(|b| b.with_optimization_level(GraphOptimizationLevel::Level3))
            .and_then(|b| b.with_intra_threads(1))
            .and_then(|b| b.commit_from_file(model_path))
            .map_err(|e| ClassifierError::Load(e.to_string()))?;

        if session.inputs.len() != 1 || session.outputs.len() != 1 {
            return Err(ClassifierError::Load(format!(
                "expected a single-input single-output model, found {} inputs / {} outputs",
                session.inputs.len(),
                session.outputs.len()
            )));
        }
        let input_name = session.inputs[0].name.to_string();
        let output_name = session.outputs[0].name.to_string();

        tracing::info!(
            path = %model_path.display(),
            input = %input_name,
            output = %output_name,
            "Classifier model loaded"
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            output_name,
        })
    }
}

impl GenrePredictor for OnnxGenreClassifier {
    fn predict(&self, tensor: &Array4<f32>) -> Result<GenrePrediction, ClassifierError> {
        let input = Value::from_array(tensor.clone())
            .map_err(|e| ClassifierError::Inference(e.to_string()))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| ClassifierError::Inference("classifier lock poisoned".to_string()))?;
        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input])
            .map_err(|e| ClassifierError::Inference(e.to_string()))?;

        let (_, data) = outputs[self.output_name.as_str()]
            .try_extract_tensor::<f32>()
            .map_err(|e| ClassifierError::Inference(e.to_string()))?;

        prediction_from_scores(data.to_vec())
    }
}

/// Map a raw score vector onto the fixed label set via arg-max
///
/// Ties resolve to the earliest label, matching arg-max convention.
pub fn prediction_from_scores(scores: Vec<f32>) -> Result<GenrePrediction, ClassifierError> {
    if scores.len() != GENRE_LABELS.len() {
        return Err(ClassifierError::Inference(format!(
            "expected {} class scores, got {}",
            GENRE_LABELS.len(),
            scores.len()
        )));
    }

    let mut best = 0usize;
    for (i, &score) in scores.iter().enumerate() {
        if score > scores[best] {
            best = i;
        }
    }

    Ok(GenrePrediction {
        label: GENRE_LABELS[best],
        scores,
    })
}
