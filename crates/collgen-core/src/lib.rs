//! # collgen-core
//!
//! Core library for building beatmap collections from local scores.
//!
//! This crate provides:
//! - Binary codecs for replay records, `scores.db` and `collection.db`
//! - A score store with a per-(beatmap, mods) high-score index
//! - Save conditions and collection name templates
//! - A cancellable background generator and the collection merge rules

pub mod binary;
pub mod collection;
pub mod config;
pub mod error;
pub mod generator;
pub mod replay;
pub mod retry;
pub mod score;
pub mod storage;

// Re-export from binary module
pub use binary::{ByteBuffer, ByteWriter};

// Re-export from collection module
pub use collection::{
    Beatmap, BeatmapCatalog, Collection, CollectionEdit, Collections, CollectionsManager,
    HashMapCatalog, HashOnlyCatalog, merge,
};

// Re-export from config module
pub use config::GeneratorConfiguration;

// Re-export from error module
pub use error::{Error, Result};

// Re-export from generator module
pub use generator::{
    ACCURACY_BRACKET_NAMES, CancellationToken, ChannelListener, CollectionGenerator, FetchError,
    FormatError, GenerationEvent, GenerationListener, GenerationState, ScoreSource,
    accuracy_bracket_collections, collection_name_or_fallback, format_collection_name,
    refresh_accuracy_brackets,
};

// Re-export from replay module
pub use replay::{
    AbsentStrings, HitCounts, PlayMode, Replay, Score, datetime_to_ticks, ticks_to_datetime,
};

// Re-export from retry module
pub use retry::{FixedDelay, NoRetry, RetryError, RetryStrategy, Retryable};

// Re-export from score module
pub use score::{ModTranslator, Mods, ScoreSaveConditions, ScoreStore, Scores, ShortModNames};

// Re-export from storage module
pub use storage::{
    BeatmapScores, CollectionDb, ScoresDb, collection_db_bytes, parse_collection_db,
    read_collection_db, save_collection_db, write_collection_db,
};
