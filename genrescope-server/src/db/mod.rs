//! Database access for genrescope
//!
//! One SQLite database holds the `music_features` catalog table. The core
//! never writes catalog rows; the table is owned by an external dataset and
//! only created here so a fresh install starts with a valid (empty) schema.

pub mod catalog;

use anyhow::Result;
use sqlx::SqlitePool;
use std::path::Path;

/// Initialize the catalog database connection pool
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // SQLite URI with mode=rwc (read, write, create)
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    tracing::debug!("Connecting to database: {}", db_url);

    let pool = SqlitePool::connect(&db_url).await?;
    init_tables(&pool).await?;

    Ok(pool)
}

/// Create the catalog table if it does not exist
async fn init_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS music_features (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            song TEXT NOT NULL,
            artist TEXT NOT NULL,
            genre TEXT NOT NULL,
            energy REAL NOT NULL,
            danceability REAL NOT NULL,
            loudness REAL NOT NULL,
            is_new_artist INTEGER NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await?;

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM music_features")
        .fetch_one(pool)
        .await?;
    tracing::info!(catalog_rows = count, "Database tables initialized (music_features)");

    Ok(())
}
