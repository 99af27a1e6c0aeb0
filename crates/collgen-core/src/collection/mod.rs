//! Beatmap collections and the edits that combine them.
//!
//! - `Beatmap`, `BeatmapCatalog` - beatmap references and hash lookup
//! - `Collection`, `Collections` - named, hash-unique beatmap sets
//! - `CollectionsManager`, `CollectionEdit` - add / merge / remove / clear / rename

mod beatmap;
mod collections;
mod manager;

pub use beatmap::*;
pub use collections::*;
pub use manager::*;
