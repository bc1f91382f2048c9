//! Challenge catalog loading
//!
//! The catalog is read once at startup, either from a JSON file or from the
//! copy bundled into the binary.

use std::path::Path;

use crate::domain::entities::{CatalogError, Challenge, ChallengeCatalog};

const BUNDLED_CHALLENGES: &str = include_str!("../../challenges.json");

#[derive(Debug, thiserror::Error)]
pub enum CatalogLoadError {
    #[error("Failed to read challenge catalog {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Malformed challenge catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] CatalogError),
}

/// Parse a catalog from its JSON form
pub fn parse_catalog(json: &str) -> Result<ChallengeCatalog, CatalogLoadError> {
    let challenges: Vec<Challenge> = serde_json::from_str(json)?;
    Ok(ChallengeCatalog::new(challenges)?)
}

/// The catalog shipped with the engine
pub fn bundled_catalog() -> Result<ChallengeCatalog, CatalogLoadError> {
    parse_catalog(BUNDLED_CHALLENGES)
}

/// Load from `path` when given, otherwise fall back to the bundled catalog
pub fn load_catalog(path: Option<&Path>) -> Result<ChallengeCatalog, CatalogLoadError> {
    let Some(path) = path else {
        return bundled_catalog();
    };

    let json = std::fs::read_to_string(path).map_err(|source| CatalogLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let catalog = parse_catalog(&json)?;
    tracing::info!(path = %path.display(), challenges = catalog.len(), "Loaded challenge catalog");
    Ok(catalog)
}
