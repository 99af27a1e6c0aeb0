use tracing::debug;

use crate::collection::{BeatmapCatalog, Collection, CollectionEdit, Collections, CollectionsManager};
use crate::score::ScoreStore;

/// Bracket names and their inclusive lower accuracy bounds, best first.
/// Each bracket ends where the previous one starts.
const BRACKETS: [(&str, f64); 7] = [
    ("99%+", 0.99),
    ("98-99%", 0.98),
    ("97-98%", 0.97),
    ("95-97%", 0.95),
    ("92-95%", 0.92),
    ("88-92%", 0.88),
    ("<88%", f64::NEG_INFINITY),
];

pub const ACCURACY_BRACKET_NAMES: [&str; 7] = [
    "99%+", "98-99%", "97-98%", "95-97%", "92-95%", "88-92%", "<88%",
];

/// Sort every beatmap into an accuracy bracket by its top score.
///
/// Always returns all seven brackets, some possibly empty. Beatmaps without
/// scores or unknown to `catalog` are left out.
pub fn accuracy_bracket_collections(
    store: &ScoreStore,
    catalog: &dyn BeatmapCatalog,
) -> Collections {
    let mut collections: Collections = BRACKETS
        .iter()
        .map(|(name, _)| Collection::new(*name))
        .collect();

    for top in store.iter().filter_map(|scores| scores.top()) {
        let accuracy = top.accuracy();
        let Some(slot) = BRACKETS.iter().position(|(_, min)| accuracy >= *min) else {
            continue;
        };
        collections[slot].add_beatmap_by_hash(&top.map_hash, catalog);
    }

    debug!(
        "Accuracy brackets: {:?}",
        collections.iter().map(Collection::len).collect::<Vec<_>>()
    );
    collections
}

/// Replace any existing bracket collections with freshly computed ones.
pub fn refresh_accuracy_brackets(
    manager: &mut CollectionsManager,
    store: &ScoreStore,
    catalog: &dyn BeatmapCatalog,
) {
    manager.edit(CollectionEdit::Remove(
        ACCURACY_BRACKET_NAMES.iter().map(|n| n.to_string()).collect(),
    ));
    manager.edit(CollectionEdit::Add(accuracy_bracket_collections(
        store, catalog,
    )));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::{Beatmap, HashOnlyCatalog};
    use crate::replay::{HitCounts, Score};

    fn score(hash: &str, c300: i16, c100: i16, total: i32) -> Score {
        Score {
            map_hash: hash.to_string(),
            hits: HitCounts {
                c300,
                c100,
                ..Default::default()
            },
            total_score: total,
            ..Default::default()
        }
    }

    fn store() -> ScoreStore {
        ScoreStore::from_groups([
            // top score decides: 100% despite a worse second play
            ("perfect", vec![score("perfect", 100, 0, 900), score("perfect", 50, 50, 100)]),
            // (97*300 + 3*100) / 30000 = 0.98
            ("edge98", vec![score("edge98", 97, 3, 500)]),
            ("low", vec![score("low", 10, 90, 500)]),
            ("none", Vec::new()),
        ])
    }

    #[test]
    fn test_bracket_names_match_bounds() {
        let names: Vec<_> = BRACKETS.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, ACCURACY_BRACKET_NAMES);
    }

    #[test]
    fn test_brackets_by_top_score() {
        let collections = accuracy_bracket_collections(&store(), &HashOnlyCatalog);
        assert_eq!(collections.len(), 7);
        assert!(collections[0].contains("perfect"));
        assert!(collections[1].contains("edge98"));
        assert!(collections[6].contains("low"));
        assert_eq!(collections.iter().map(Collection::len).sum::<usize>(), 3);
    }

    #[test]
    fn test_refresh_replaces_stale_brackets() {
        let mut manager = CollectionsManager::with_collections(vec![
            Collection::with_beatmaps("99%+", [Beatmap::from_hash("stale")]),
            Collection::with_beatmaps("favourites", [Beatmap::from_hash("x")]),
        ]);
        refresh_accuracy_brackets(&mut manager, &store(), &HashOnlyCatalog);

        assert_eq!(manager.len(), 8);
        assert_eq!(manager.collections()[0].name, "favourites");
        let top = manager.get("99%+").unwrap();
        assert!(!top.contains("stale"));
        assert!(top.contains("perfect"));
    }
}
