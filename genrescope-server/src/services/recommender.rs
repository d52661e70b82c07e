//! Similarity-based track recommendation
//!
//! Ranks catalog entries of the predicted genre by cosine similarity over
//! the (energy, danceability, loudness) vector. When the genre pool
//! contains any emerging artists and prioritization is on, the pool is
//! restricted to them exclusively; the override is a hard filter, not a
//! weighting.

use crate::db::catalog::{CatalogError, CatalogRepository};
use crate::models::{Recommendation, ScalarFeatures};

/// Maximum number of returned recommendations
pub const MAX_RECOMMENDATIONS: usize = 5;

/// Recommend up to five tracks similar to the analyzed one
///
/// An empty genre pool yields an empty list, not an error. Ties in
/// similarity keep catalog row order (stable sort).
pub async fn recommend(
    catalog: &dyn CatalogRepository,
    genre: &str,
    features: &ScalarFeatures,
    prioritize_new_artists: bool,
) -> Result<Vec<Recommendation>, CatalogError> {
    let rows = catalog.load_rows().await?;

    let mut pool: Vec<_> = rows.iter().filter(|row| row.genre == genre).collect();
    if pool.is_empty() {
        tracing::debug!(genre, "No catalog entries for genre");
        return Ok(Vec::new());
    }

    if prioritize_new_artists {
        let emerging: Vec<_> = pool.iter().copied().filter(|row| row.is_new_artist).collect();
        if !emerging.is_empty() {
            pool = emerging;
        }
    }

    let query = features.as_vector();
    let mut ranked: Vec<_> = pool
        .into_iter()
        .map(|row| (cosine_similarity(&query, &row.feature_vector()), row))
        .collect();
    ranked.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    Ok(ranked
        .into_iter()
        .take(MAX_RECOMMENDATIONS)
        .map(|(_, row)| row.into())
        .collect())
}

/// Cosine of the angle between two feature vectors
///
/// A zero-magnitude vector on either side yields 0 by convention.
pub fn cosine_similarity(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_vectors_have_unit_similarity() {
        let v = [0.3, 0.5, 0.8];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn orthogonal_vectors_have_zero_similarity() {
        assert_eq!(cosine_similarity(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]), 0.0);
    }

    #[test]
    fn zero_magnitude_vector_is_zero_not_nan() {
        let sim = cosine_similarity(&[0.0, 0.0, 0.0], &[0.3, 0.5, 0.8]);
        assert_eq!(sim, 0.0);
    }
}
