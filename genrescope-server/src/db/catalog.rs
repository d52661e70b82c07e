//! Catalog repository
//!
//! The recommender reads the catalog through the `CatalogRepository` seam,
//! so storage can move (file, another database) without touching ranking
//! logic. The production implementation re-reads the full SQLite table on
//! every call; there is deliberately no caching, so the staleness window is
//! exactly the time since the dataset file was last written.

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use thiserror::Error;

use crate::models::CatalogEntry;

/// Catalog access errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Catalog storage missing or unreadable
    #[error("Failed to load catalog: {0}")]
    Load(String),

    /// Catalog readable but an expected column is missing or mistyped
    #[error("Catalog schema mismatch: {0}")]
    Schema(String),
}

/// Read-only catalog source
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Load every catalog row, in stored order
    async fn load_rows(&self) -> Result<Vec<CatalogEntry>, CatalogError>;
}

/// SQLite-backed catalog over the `music_features` table
pub struct SqliteCatalog {
    pool: SqlitePool,
}

impl SqliteCatalog {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogRepository for SqliteCatalog {
    async fn load_rows(&self) -> Result<Vec<CatalogEntry>, CatalogError> {
        let rows = sqlx::query(
            "SELECT song, artist, genre, energy, danceability, loudness, is_new_artist \
             FROM music_features ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(classify_query_error)?;

        rows.iter().map(entry_from_row).collect()
    }
}

fn entry_from_row(row: &SqliteRow) -> Result<CatalogEntry, CatalogError> {
    Ok(CatalogEntry {
        song: column(row, "song")?,
        artist: column(row, "artist")?,
        genre: column(row, "genre")?,
        energy: column(row, "energy")?,
        danceability: column(row, "danceability")?,
        loudness: column(row, "loudness")?,
        is_new_artist: column(row, "is_new_artist")?,
    })
}

fn column<'r, T: sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>>(
    row: &'r SqliteRow,
    name: &str,
) -> Result<T, CatalogError> {
    row.try_get(name)
        .map_err(|e| CatalogError::Schema(format!("column '{}': {}", name, e)))
}

/// Split sqlx failures into schema mismatches vs plain load failures
fn classify_query_error(error: sqlx::Error) -> CatalogError {
    match &error {
        sqlx::Error::ColumnNotFound(column) => {
            CatalogError::Schema(format!("missing column '{}'", column))
        }
        sqlx::Error::Database(db) if db.message().contains("no such column") => {
            CatalogError::Schema(db.message().to_string())
        }
        _ => CatalogError::Load(error.to_string()),
    }
}
