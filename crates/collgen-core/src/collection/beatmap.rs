use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A beatmap referenced by its MD5 hash, with whatever metadata the catalog knows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beatmap {
    pub md5: String,
    pub map_id: Option<i32>,
    pub artist: String,
    pub title: String,
    pub difficulty: String,
}

impl Beatmap {
    /// A reference carrying only the hash.
    pub fn from_hash(md5: impl Into<String>) -> Self {
        Self {
            md5: md5.into(),
            ..Default::default()
        }
    }

    /// `Artist - Title [Difficulty]`, or the hash when no metadata is known.
    pub fn display_name(&self) -> String {
        if self.title.is_empty() {
            return self.md5.clone();
        }
        format!("{} - {} [{}]", self.artist, self.title, self.difficulty)
    }
}

/// Resolves beatmap hashes to beatmaps. Absent hashes return `None`.
pub trait BeatmapCatalog: Send + Sync {
    fn lookup(&self, md5: &str) -> Option<Beatmap>;
}

/// Catalog backed by an owned map.
#[derive(Debug, Clone, Default)]
pub struct HashMapCatalog {
    beatmaps: HashMap<String, Beatmap>,
}

impl HashMapCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, beatmap: Beatmap) {
        self.beatmaps.insert(beatmap.md5.clone(), beatmap);
    }

    pub fn len(&self) -> usize {
        self.beatmaps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beatmaps.is_empty()
    }
}

impl FromIterator<Beatmap> for HashMapCatalog {
    fn from_iter<I: IntoIterator<Item = Beatmap>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for beatmap in iter {
            catalog.insert(beatmap);
        }
        catalog
    }
}

impl BeatmapCatalog for HashMapCatalog {
    fn lookup(&self, md5: &str) -> Option<Beatmap> {
        self.beatmaps.get(md5).cloned()
    }
}

/// Resolves every hash to a bare [`Beatmap::from_hash`] reference.
///
/// Used when no beatmap database is available; `collection.db` only stores hashes.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashOnlyCatalog;

impl BeatmapCatalog for HashOnlyCatalog {
    fn lookup(&self, md5: &str) -> Option<Beatmap> {
        if md5.is_empty() {
            return None;
        }
        Some(Beatmap::from_hash(md5))
    }
}
