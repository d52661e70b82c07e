//! Per-genre trivia attached to analysis results
//!
//! The facts file is a JSON object mapping genre label → list of facts. It
//! is re-read per request (it is tiny and user-editable); a missing or
//! malformed file simply yields no fact.

use rand::seq::SliceRandom;
use std::collections::HashMap;
use std::path::Path;

/// Pick a random fact for a genre, if the facts file has any
pub async fn random_fact(facts_path: &Path, genre: &str) -> Option<String> {
    let content = tokio::fs::read_to_string(facts_path).await.ok()?;
    let facts: HashMap<String, Vec<String>> = match serde_json::from_str(&content) {
        Ok(facts) => facts,
        Err(e) => {
            tracing::warn!(path = %facts_path.display(), error = %e, "Ignoring malformed genre facts file");
            return None;
        }
    };

    facts
        .get(genre)?
        .choose(&mut rand::thread_rng())
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_yields_no_fact() {
        assert_eq!(random_fact(Path::new("/nonexistent/facts.json"), "Rock").await, None);
    }

    #[tokio::test]
    async fn malformed_file_yields_no_fact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("facts.json");
        std::fs::write(&path, "not json {").unwrap();
        assert_eq!(random_fact(&path, "Rock").await, None);
    }

    #[tokio::test]
    async fn picks_a_fact_for_a_known_genre() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("facts.json");
        std::fs::write(&path, r#"{"Rock": ["only fact"], "Jazz": []}"#).unwrap();

        assert_eq!(random_fact(&path, "Rock").await, Some("only fact".to_string()));
        // Empty fact list behaves like an absent genre
        assert_eq!(random_fact(&path, "Jazz").await, None);
        assert_eq!(random_fact(&path, "Blues").await, None);
    }
}
