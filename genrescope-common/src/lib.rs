//! # Genrescope Common Library
//!
//! Shared code for the genrescope service:
//! - Common error type
//! - Configuration loading (TOML file + environment overrides)
//! - The fixed genre label set

pub mod config;
pub mod error;
pub mod genres;

pub use config::Config;
pub use error::{Error, Result};
pub use genres::GENRE_LABELS;
