//! Domain records passed between the pipeline stages and the API layer

use serde::Serialize;

/// Scalar acoustic descriptors for one track
///
/// All three values are rounded to 4 decimal places at construction.
/// `loudness` is always within [0, 1]; `energy` and `danceability` are
/// non-negative and unbounded above.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScalarFeatures {
    /// Mean short-time RMS amplitude
    pub energy: f64,
    /// Beat-regularity proxy from the onset-strength envelope
    pub danceability: f64,
    /// Mean RMS in dB, rescaled from [-60, 0] dB into [0, 1] and clamped
    pub loudness: f64,
}

impl ScalarFeatures {
    /// Build a feature record, rounding each value to 4 decimal places
    pub fn new(energy: f64, danceability: f64, loudness: f64) -> Self {
        Self {
            energy: round4(energy),
            danceability: round4(danceability),
            loudness: round4(loudness),
        }
    }

    /// Similarity vector in the fixed (energy, danceability, loudness) order
    pub fn as_vector(&self) -> [f64; 3] {
        [self.energy, self.danceability, self.loudness]
    }
}

/// Round to 4 decimal places (presentation contract at the extractor boundary)
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Classifier output: winning label plus the full class-probability vector
///
/// `scores` is aligned positionally with [`genrescope_common::GENRE_LABELS`].
#[derive(Debug, Clone, Serialize)]
pub struct GenrePrediction {
    pub label: &'static str,
    pub scores: Vec<f32>,
}

/// One catalog row, as stored in the `music_features` table
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub song: String,
    pub artist: String,
    pub genre: String,
    pub energy: f64,
    pub danceability: f64,
    pub loudness: f64,
    pub is_new_artist: bool,
}

impl CatalogEntry {
    /// Similarity vector in the fixed (energy, danceability, loudness) order
    pub fn feature_vector(&self) -> [f64; 3] {
        [self.energy, self.danceability, self.loudness]
    }
}

/// A recommended track: projection of a catalog entry, similarity discarded
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub song: String,
    pub artist: String,
    pub genre: String,
}

impl From<&CatalogEntry> for Recommendation {
    fn from(entry: &CatalogEntry) -> Self {
        Self {
            song: entry.song.clone(),
            artist: entry.artist.clone(),
            genre: entry.genre.clone(),
        }
    }
}

/// Composite result of one full pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutcome {
    pub prediction: GenrePrediction,
    pub features: ScalarFeatures,
    pub recommendations: Vec<Recommendation>,
}
