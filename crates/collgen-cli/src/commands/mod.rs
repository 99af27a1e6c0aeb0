//! CLI command implementations.

pub mod brackets;
pub mod generate;
pub mod inspect;

use anyhow::{Context, Result};
use collgen_core::collection::{Collections, HashOnlyCatalog};
use collgen_core::score::ScoreStore;
use collgen_core::storage::read_collection_db;
use tracing::info;

/// Load scores.db, skipping replay payloads
fn load_store(path: &str) -> Result<ScoreStore> {
    ScoreStore::load_from(path).with_context(|| format!("Failed to load scores from {}", path))
}

/// Load an existing collection.db, or start empty when none is given
fn load_existing(path: Option<&str>) -> Result<Collections> {
    let Some(path) = path else {
        return Ok(Collections::new());
    };
    let db = read_collection_db(path, &HashOnlyCatalog)
        .with_context(|| format!("Failed to read collections from {}", path))?;
    info!("Loaded {} collections from {}", db.collections.len(), path);
    Ok(db.collections)
}
