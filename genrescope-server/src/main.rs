//! genrescope-server - Genre Analysis & Recommendation Service
//!
//! Classifies uploaded audio into one of ten genres with a pretrained
//! model, derives acoustic descriptors, and recommends similar catalog
//! tracks, preferring emerging artists.

use anyhow::{Context, Result};
use ndarray::Array4;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use genrescope_common::Config;
use genrescope_server::db::catalog::SqliteCatalog;
use genrescope_server::services::classifier::{GenrePredictor, OnnxGenreClassifier};
use genrescope_server::services::spectrogram::{CLASSIFIER_FRAMES, CLASSIFIER_MEL_BANDS};
use genrescope_server::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting genrescope-server");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = Config::load()?;

    std::fs::create_dir_all(&config.upload_dir)
        .with_context(|| format!("Failed to create upload dir {}", config.upload_dir.display()))?;

    // Catalog database
    let db_pool = genrescope_server::db::init_database_pool(&config.catalog_db).await?;
    info!("Database connection established");

    // Classifier model: loaded once, fatal if missing or incompatible.
    // The warm-up pass surfaces shape/output mismatches before we serve.
    let classifier =
        OnnxGenreClassifier::load(&config.model_path).context("Classifier startup failed")?;
    classifier
        .predict(&Array4::zeros((1, CLASSIFIER_MEL_BANDS, CLASSIFIER_FRAMES, 1)))
        .context("Classifier warm-up inference failed")?;
    info!("Classifier ready");

    let port = config.port;
    let state = AppState::new(
        config,
        Arc::new(classifier),
        Arc::new(SqliteCatalog::new(db_pool)),
    );
    let app = genrescope_server::build_router(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    info!("Listening on http://127.0.0.1:{}", port);
    info!("Health check: http://127.0.0.1:{}/health", port);

    axum::serve(listener, app).await?;

    Ok(())
}
