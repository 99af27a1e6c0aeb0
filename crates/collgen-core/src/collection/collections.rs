use std::collections::HashSet;

use super::beatmap::{Beatmap, BeatmapCatalog};

/// A named set of beatmaps, unique by hash, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collection {
    pub name: String,
    beatmaps: Vec<Beatmap>,
    hashes: HashSet<String>,
}

/// An ordered list of collections. Names are not required to be unique.
pub type Collections = Vec<Collection>;

impl Collection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_beatmaps<I>(name: impl Into<String>, beatmaps: I) -> Self
    where
        I: IntoIterator<Item = Beatmap>,
    {
        let mut collection = Self::new(name);
        for beatmap in beatmaps {
            collection.add_beatmap(beatmap);
        }
        collection
    }

    /// Adds a beatmap. Returns `false` if its hash was already present.
    pub fn add_beatmap(&mut self, beatmap: Beatmap) -> bool {
        if !self.hashes.insert(beatmap.md5.clone()) {
            return false;
        }
        self.beatmaps.push(beatmap);
        true
    }

    /// Resolves `md5` through the catalog and adds it. Unknown hashes are skipped.
    pub fn add_beatmap_by_hash(&mut self, md5: &str, catalog: &dyn BeatmapCatalog) -> bool {
        match catalog.lookup(md5) {
            Some(beatmap) => self.add_beatmap(beatmap),
            None => false,
        }
    }

    /// Adds every beatmap of `other` not already present.
    pub fn union_with(&mut self, other: &Collection) {
        for beatmap in &other.beatmaps {
            self.add_beatmap(beatmap.clone());
        }
    }

    pub fn contains(&self, md5: &str) -> bool {
        self.hashes.contains(md5)
    }

    pub fn beatmaps(&self) -> &[Beatmap] {
        &self.beatmaps
    }

    pub fn hashes(&self) -> impl Iterator<Item = &str> {
        self.beatmaps.iter().map(|b| b.md5.as_str())
    }

    pub fn len(&self) -> usize {
        self.beatmaps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beatmaps.is_empty()
    }
}
