//! genrescope-server library interface
//!
//! Exposes the application state, router construction, and the analysis
//! pipeline for integration testing.

pub mod api;
pub mod db;
pub mod error;
pub mod models;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::services::ServeDir;

use genrescope_common::Config;

use crate::db::catalog::CatalogRepository;
use crate::services::classifier::GenrePredictor;

/// Application state shared across handlers
///
/// The classifier and catalog handles are read-only; per-request buffers
/// live inside the pipeline, so concurrent requests need no coordination.
#[derive(Clone)]
pub struct AppState {
    /// Resolved service configuration
    pub config: Arc<Config>,
    /// Injected classifier handle, constructed once at process start
    pub classifier: Arc<dyn GenrePredictor>,
    /// Catalog source, re-read on every recommendation call
    pub catalog: Arc<dyn CatalogRepository>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last error for diagnostic purposes
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(
        config: Config,
        classifier: Arc<dyn GenrePredictor>,
        catalog: Arc<dyn CatalogRepository>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            classifier,
            catalog,
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Remember the most recent failure for the health endpoint
    pub fn record_error(&self, error: &ApiError) {
        let message = error.to_string();
        let slot = Arc::clone(&self.last_error);
        tokio::spawn(async move {
            *slot.write().await = Some(message);
        });
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        .merge(api::ui_routes())
        .merge(api::analyze_routes())
        .merge(api::track_routes())
        .merge(api::contact_routes())
        .merge(api::download_routes())
        .merge(api::health_routes())
        .nest_service("/uploads", ServeDir::new(&state.config.upload_dir));

    if let Some(static_dir) = &state.config.static_dir {
        router = router.nest_service("/static", ServeDir::new(static_dir));
    }

    router.with_state(state)
}
