//! Generate command: build per-player collections from local scores.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use collgen_core::collection::{CollectionEdit, Collections, CollectionsManager, HashOnlyCatalog};
use collgen_core::config::GeneratorConfiguration;
use collgen_core::config::database::COLLECTION_DB_VERSION;
use collgen_core::config::generation::MAX_FETCH_ATTEMPTS;
use collgen_core::generator::{CollectionGenerator, GenerationListener, GenerationState};
use collgen_core::retry::FixedDelay;
use collgen_core::storage::save_collection_db;
use tracing::info;

use super::{load_existing, load_store};

/// Prints progress lines to stderr.
struct ProgressPrinter;

impl GenerationListener for ProgressPrinter {
    fn on_status(&self, status: &str, percentage: f64) {
        if percentage < 0.0 {
            eprintln!("{}", status);
        } else {
            eprintln!("[{:>5.1}%] {}", percentage, status);
        }
    }
}

pub fn run(
    scores_path: &str,
    config_path: &str,
    collection: Option<&str>,
    output: &str,
    retry_delay: u64,
    json: bool,
) -> Result<()> {
    let config = GeneratorConfiguration::load(config_path)
        .with_context(|| format!("Failed to load configuration from {}", config_path))?;
    let store = load_store(scores_path)?;

    let generator = Arc::new(
        CollectionGenerator::new(Arc::new(store), Arc::new(HashOnlyCatalog)).with_retry(
            FixedDelay::new(MAX_FETCH_ATTEMPTS, Duration::from_secs(retry_delay)),
        ),
    );
    generator.subscribe(Arc::new(ProgressPrinter));

    let generator_ctrlc = Arc::clone(&generator);
    ctrlc::set_handler(move || {
        eprintln!("\nAborting...");
        generator_ctrlc.abort();
    })?;

    generator.try_start(config)?;
    let state = generator.wait();
    if state != GenerationState::Completed {
        let state: &'static str = state.into();
        bail!("Generation did not complete ({})", state);
    }
    let generated = generator.collections();
    info!("Generated {} collections", generated.len());

    if json {
        println!("{}", collections_json(&generated)?);
        return Ok(());
    }

    let mut manager = CollectionsManager::with_collections(load_existing(collection)?);
    manager.edit(CollectionEdit::AddOrMerge(generated));
    save_collection_db(output, manager.collections(), COLLECTION_DB_VERSION)
        .with_context(|| format!("Failed to write {}", output))?;
    eprintln!(
        "Wrote {} collections ({} beatmaps) to {}",
        manager.len(),
        manager.beatmap_count(),
        output
    );

    Ok(())
}

fn collections_json(collections: &Collections) -> Result<String> {
    let value: Vec<_> = collections
        .iter()
        .map(|c| {
            serde_json::json!({
                "name": c.name,
                "beatmaps": c.hashes().collect::<Vec<_>>(),
            })
        })
        .collect();
    Ok(serde_json::to_string_pretty(&value)?)
}
