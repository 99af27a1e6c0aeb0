use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info};

use crate::error::Result;
use crate::replay::Score;
use crate::storage::ScoresDb;

use super::mods::Mods;

/// All scores recorded on one beatmap, in database order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scores {
    map_hash: String,
    scores: Vec<Score>,
}

impl Scores {
    pub fn new(map_hash: impl Into<String>) -> Self {
        Self {
            map_hash: map_hash.into(),
            scores: Vec::new(),
        }
    }

    pub fn map_hash(&self) -> &str {
        &self.map_hash
    }

    pub fn push(&mut self, score: Score) {
        self.scores.push(score);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Score> {
        self.scores.iter()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Highest total score of each mod combination, in order of first appearance.
    ///
    /// Ties keep the score encountered first.
    pub fn best_per_mods(&self) -> Vec<&Score> {
        let mut groups: Vec<(Mods, &Score)> = Vec::new();
        for score in &self.scores {
            match groups.iter_mut().find(|(mods, _)| *mods == score.mods) {
                Some((_, best)) => {
                    if score.total_score > best.total_score {
                        *best = score;
                    }
                }
                None => groups.push((score.mods, score)),
            }
        }
        groups.into_iter().map(|(_, best)| best).collect()
    }

    /// Highest total score regardless of mods. Ties keep the first.
    pub fn top(&self) -> Option<&Score> {
        self.scores.iter().fold(None, |best: Option<&Score>, s| match best {
            Some(b) if s.total_score <= b.total_score => Some(b),
            _ => Some(s),
        })
    }
}

/// In-memory score database with a per-(beatmap, mods) high-score index.
///
/// The index is rebuilt whenever scores are loaded and is read-only afterwards,
/// so a store can be shared between threads behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct ScoreStore {
    beatmaps: Vec<Scores>,
    by_hash: HashMap<String, usize>,
    high_scores: Vec<Score>,
    loaded: bool,
}

impl ScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a `scores.db` file, skipping replay payloads.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let db = ScoresDb::read(path, true)?;
        let store = Self::from_database(db);
        info!(
            "Loaded {} scores on {} beatmaps from {:?}",
            store.score_count(),
            store.beatmap_count(),
            path
        );
        Ok(store)
    }

    pub fn from_database(db: ScoresDb) -> Self {
        Self::from_groups(db.beatmaps.into_iter().map(|group| {
            let scores = group.replays.into_iter().map(|r| r.into_score());
            (group.map_hash, scores.collect::<Vec<_>>())
        }))
    }

    /// Build from `(beatmap hash, scores)` groups. Repeated hashes are combined.
    pub fn from_groups<I, S>(groups: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<Score>)>,
        S: Into<String>,
    {
        let mut store = Self::new();
        for (hash, scores) in groups {
            let hash = hash.into();
            let slot = match store.by_hash.get(&hash) {
                Some(&i) => i,
                None => {
                    store.by_hash.insert(hash.clone(), store.beatmaps.len());
                    store.beatmaps.push(Scores::new(hash));
                    store.beatmaps.len() - 1
                }
            };
            for score in scores {
                store.beatmaps[slot].push(score);
            }
        }
        store.loaded = true;
        store.rebuild_high_scores();
        store
    }

    fn rebuild_high_scores(&mut self) {
        self.high_scores = self
            .beatmaps
            .iter()
            .filter(|scores| !scores.is_empty())
            .flat_map(|scores| scores.best_per_mods().into_iter().cloned())
            .collect();
        debug!(
            "Rebuilt high-score index: {} entries",
            self.high_scores.len()
        );
    }

    /// Whether a database has been ingested. Check this rather than reloading.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn scores_for(&self, map_hash: &str) -> Option<&Scores> {
        self.by_hash.get(map_hash).map(|&i| &self.beatmaps[i])
    }

    /// Highest total score on a beatmap regardless of mods.
    pub fn top_score(&self, map_hash: &str) -> Option<&Score> {
        self.scores_for(map_hash).and_then(Scores::top)
    }

    /// Best score of every (beatmap, mods) group.
    pub fn high_scores(&self) -> &[Score] {
        &self.high_scores
    }

    /// Group-best scores held by `username` (exact match), one per (beatmap, mods).
    ///
    /// A player without any top score yields an empty list.
    pub fn best_scores_by_username(&self, username: &str) -> Vec<Score> {
        self.high_scores
            .iter()
            .filter(|s| s.player_name == username)
            .cloned()
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scores> {
        self.beatmaps.iter()
    }

    pub fn beatmap_count(&self) -> usize {
        self.beatmaps.len()
    }

    pub fn score_count(&self) -> usize {
        self.beatmaps.iter().map(Scores::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.beatmaps.is_empty()
    }
}
