//! Brackets command: rebuild the accuracy bracket collections.

use anyhow::{Context, Result};
use collgen_core::collection::{CollectionsManager, HashOnlyCatalog};
use collgen_core::config::database::COLLECTION_DB_VERSION;
use collgen_core::generator::{ACCURACY_BRACKET_NAMES, refresh_accuracy_brackets};
use collgen_core::storage::save_collection_db;

use super::{load_existing, load_store};

pub fn run(scores_path: &str, collection: Option<&str>, output: &str) -> Result<()> {
    let store = load_store(scores_path)?;
    let mut manager = CollectionsManager::with_collections(load_existing(collection)?);

    refresh_accuracy_brackets(&mut manager, &store, &HashOnlyCatalog);

    for name in ACCURACY_BRACKET_NAMES {
        let count = manager.get(name).map_or(0, |c| c.len());
        eprintln!("{:>8}: {} beatmaps", name, count);
    }

    save_collection_db(output, manager.collections(), COLLECTION_DB_VERSION)
        .with_context(|| format!("Failed to write {}", output))?;
    eprintln!("Wrote {} collections to {}", manager.len(), output);
    Ok(())
}
