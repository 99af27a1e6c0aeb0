//! Integration tests for collgen-core
//!
//! These tests drive the generator end to end: decoded databases feed the
//! score store, the worker thread builds collections, and the results are
//! merged and written back out.

use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use collgen_core::collection::{
    Beatmap, Collection, CollectionEdit, Collections, HashMapCatalog, HashOnlyCatalog, merge,
};
use collgen_core::config::GeneratorConfiguration;
use collgen_core::generator::{
    ChannelListener, CollectionGenerator, FetchError, GenerationEvent, GenerationState,
    ScoreSource,
};
use collgen_core::replay::{HitCounts, Replay, Score};
use collgen_core::retry::FixedDelay;
use collgen_core::score::{Mods, ScoreSaveConditions, ScoreStore};
use collgen_core::storage::{BeatmapScores, ScoresDb, collection_db_bytes, parse_collection_db};

fn score(player: &str, hash: &str, mods: Mods, c300: i16, c100: i16, total: i32) -> Score {
    Score {
        player_name: player.to_string(),
        map_hash: hash.to_string(),
        mods,
        hits: HitCounts {
            c300,
            c100,
            ..Default::default()
        },
        total_score: total,
        ..Default::default()
    }
}

fn statuses(rx: &Receiver<GenerationEvent>) -> Vec<(String, f64)> {
    rx.try_iter()
        .filter_map(|event| match event {
            GenerationEvent::Status {
                message,
                percentage,
            } => Some((message, percentage)),
            GenerationEvent::Collections(_) => None,
        })
        .collect()
}

fn names(collections: &Collections) -> Vec<&str> {
    collections.iter().map(|c| c.name.as_str()).collect()
}

/// Full generation runs
mod generation_tests {
    use super::*;

    fn two_player_store() -> ScoreStore {
        ScoreStore::from_groups([
            (
                "H1",
                vec![
                    score("alice", "H1", Mods::empty(), 100, 0, 1_000_000),
                    score("bob", "H1", Mods::empty(), 80, 20, 500_000),
                ],
            ),
            ("H2", vec![score("bob", "H2", Mods::empty(), 99, 1, 900_000)]),
            // below the accuracy threshold
            ("H3", vec![score("alice", "H3", Mods::empty(), 50, 50, 100)]),
        ])
    }

    #[test]
    fn test_two_players_end_to_end() {
        let generator =
            CollectionGenerator::new(Arc::new(two_player_store()), Arc::new(HashOnlyCatalog));
        let (listener, rx) = ChannelListener::new();
        generator.subscribe(Arc::new(listener));

        let config = GeneratorConfiguration::new(["alice", "bob"], "{0} {1} plays")
            .with_conditions(ScoreSaveConditions::accuracy_between(0.95, 1.0));
        assert!(generator.start(config));
        assert_eq!(generator.wait(), GenerationState::Completed);

        let collections = generator.collections();
        assert_eq!(names(&collections), vec!["alice  plays", "bob  plays"]);
        assert_eq!(collections[0].hashes().collect::<Vec<_>>(), vec!["H1"]);
        assert_eq!(collections[1].hashes().collect::<Vec<_>>(), vec!["H2"]);

        let percentages: Vec<f64> = statuses(&rx).into_iter().map(|(_, p)| p).collect();
        assert!(percentages.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(percentages.first(), Some(&0.0));
        assert_eq!(percentages.last(), Some(&100.0));
        assert!(percentages.contains(&50.0));
        assert_eq!(generator.completion_percentage(), 100.0);
    }

    #[test]
    fn test_collections_notification_follows_last_status() {
        let generator =
            CollectionGenerator::new(Arc::new(two_player_store()), Arc::new(HashOnlyCatalog));
        let (listener, rx) = ChannelListener::new();
        generator.subscribe(Arc::new(listener));

        generator.start(GeneratorConfiguration::new(["alice"], "{0}"));
        generator.wait();

        let events: Vec<_> = rx.try_iter().collect();
        match events.last() {
            Some(GenerationEvent::Collections(c)) => assert_eq!(names(c), vec!["alice"]),
            other => panic!("expected collections last, got {:?}", other),
        }
    }

    #[test]
    fn test_start_while_running_is_ignored() {
        let generator = CollectionGenerator::new(Arc::new(Unavailable), Arc::new(HashOnlyCatalog))
            .with_retry(FixedDelay::new(5, Duration::from_secs(30)));
        assert!(generator.start(GeneratorConfiguration::new(["bob"], "{0}")));
        assert!(!generator.start(GeneratorConfiguration::new(["alice"], "{0}")));
        assert!(generator.is_running());
        generator.abort();
        assert_eq!(generator.state(), GenerationState::Aborted);
    }

    #[test]
    fn test_unknown_beatmaps_are_skipped() {
        let catalog: HashMapCatalog = [Beatmap::from_hash("H2")].into_iter().collect();
        let generator = CollectionGenerator::new(Arc::new(two_player_store()), Arc::new(catalog));
        generator.start(GeneratorConfiguration::new(["alice", "bob"], "{0}"));
        generator.wait();

        // alice's beatmaps are all unknown, so she produces no collection
        let collections = generator.collections();
        assert_eq!(names(&collections), vec!["bob"]);
        assert_eq!(collections[0].hashes().collect::<Vec<_>>(), vec!["H2"]);
    }

    #[test]
    fn test_user_without_scores_yields_nothing() {
        let generator =
            CollectionGenerator::new(Arc::new(two_player_store()), Arc::new(HashOnlyCatalog));
        generator.start(GeneratorConfiguration::new(["nobody"], "{0}"));
        assert_eq!(generator.wait(), GenerationState::Completed);
        assert!(generator.collections().is_empty());
    }
}

/// Only "alice" can be fetched; everyone else is temporarily unavailable.
struct Unavailable;

impl ScoreSource for Unavailable {
    fn fetch_scores(&self, username: &str) -> Result<Vec<Score>, FetchError> {
        if username == "alice" {
            return Ok(vec![score("alice", "H1", Mods::empty(), 100, 0, 1)]);
        }
        Err(FetchError::Transient("server busy".to_string()))
    }
}

/// Aborting a running job
mod cancellation_tests {
    use super::*;

    fn wait_for_retry(rx: &Receiver<GenerationEvent>) {
        loop {
            match rx.recv_timeout(Duration::from_secs(5)) {
                Ok(GenerationEvent::Status { message, .. })
                    if message.contains("FAILED | Waiting 30s") =>
                {
                    return;
                }
                Ok(_) => {}
                Err(e) => panic!("no retry status received: {}", e),
            }
        }
    }

    #[test]
    fn test_abort_during_retry_wait_discards_results() {
        let generator = CollectionGenerator::new(Arc::new(Unavailable), Arc::new(HashOnlyCatalog))
            .with_retry(FixedDelay::new(5, Duration::from_secs(30)));
        let (listener, rx) = ChannelListener::new();
        generator.subscribe(Arc::new(listener));

        // alice completes, then bob blocks in the retry wait
        generator.start(GeneratorConfiguration::new(["alice", "bob"], "{0}"));
        wait_for_retry(&rx);
        generator.abort();

        assert_eq!(generator.state(), GenerationState::Aborted);
        assert!(generator.collections().is_empty());
        assert_eq!(generator.completion_percentage(), -1.0);
        assert_eq!(generator.status(), "FAILED | User aborted.");

        let rest: Vec<_> = rx.try_iter().collect();
        assert_eq!(
            rest,
            vec![
                GenerationEvent::Status {
                    message: "FAILED | User aborted.".to_string(),
                    percentage: -1.0,
                },
                GenerationEvent::Collections(Vec::new()),
            ]
        );
    }

    #[test]
    fn test_abort_after_completion_is_noop() {
        let generator = CollectionGenerator::new(Arc::new(Unavailable), Arc::new(HashOnlyCatalog));
        generator.start(GeneratorConfiguration::new(["alice"], "{0}"));
        generator.wait();
        generator.abort();

        assert_eq!(generator.state(), GenerationState::Completed);
        assert_eq!(generator.collections().len(), 1);
    }

    #[test]
    fn test_restart_after_abort() {
        let generator = CollectionGenerator::new(Arc::new(Unavailable), Arc::new(HashOnlyCatalog))
            .with_retry(FixedDelay::new(5, Duration::from_secs(30)));
        let (listener, rx) = ChannelListener::new();
        generator.subscribe(Arc::new(listener));

        generator.start(GeneratorConfiguration::new(["bob"], "{0}"));
        wait_for_retry(&rx);
        generator.abort();

        assert!(generator.start(GeneratorConfiguration::new(["alice"], "{0}")));
        assert_eq!(generator.wait(), GenerationState::Completed);
        assert_eq!(names(&generator.collections()), vec!["alice"]);
    }
}

/// Merge semantics over whole collection sets
mod merge_tests {
    use super::*;

    fn existing() -> Collections {
        vec![
            Collection::with_beatmaps("a", ["1", "2"].map(Beatmap::from_hash)),
            Collection::with_beatmaps("b", ["3"].map(Beatmap::from_hash)),
        ]
    }

    fn incoming() -> Collections {
        vec![
            Collection::with_beatmaps("a", ["2", "4"].map(Beatmap::from_hash)),
            Collection::with_beatmaps("c", ["5"].map(Beatmap::from_hash)),
        ]
    }

    #[test]
    fn test_empty_incoming_leaves_existing_unchanged() {
        assert_eq!(
            merge(existing(), CollectionEdit::AddOrMerge(Vec::new())),
            existing()
        );
        assert_eq!(merge(existing(), CollectionEdit::Add(Vec::new())), existing());
    }

    #[test]
    fn test_add_or_merge_is_idempotent() {
        let once = merge(existing(), CollectionEdit::AddOrMerge(incoming()));
        let twice = merge(once.clone(), CollectionEdit::AddOrMerge(incoming()));
        assert_eq!(once, twice);
        assert_eq!(names(&once), vec!["a", "b", "c"]);
        assert_eq!(once[0].hashes().collect::<Vec<_>>(), vec!["1", "2", "4"]);
    }

    #[test]
    fn test_add_differs_from_add_or_merge() {
        let added = merge(existing(), CollectionEdit::Add(incoming()));
        assert_eq!(names(&added), vec!["a", "b", "a", "c"]);
    }

    #[test]
    fn test_remove_then_clear() {
        let removed = merge(existing(), CollectionEdit::Remove(vec!["a".to_string()]));
        assert_eq!(names(&removed), vec!["b"]);
        assert!(merge(removed, CollectionEdit::Clear).is_empty());
    }
}

/// Decoding databases and writing generated collections back out
mod database_tests {
    use super::*;

    const TICKS: i64 = 635_500_000_000_000_000;

    fn replay(score: Score) -> Replay {
        Replay {
            version: 20150204,
            date_ticks: TICKS,
            score: Score {
                played_at: collgen_core::replay::ticks_to_datetime(TICKS),
                ..score
            },
            ..Default::default()
        }
    }

    fn scores_db() -> ScoresDb {
        ScoresDb {
            version: 20150204,
            beatmaps: vec![
                BeatmapScores {
                    map_hash: "H1".to_string(),
                    replays: vec![
                        replay(score("alice", "H1", Mods::HIDDEN, 100, 0, 800)),
                        replay(score("alice", "H1", Mods::HIDDEN, 98, 2, 900)),
                        replay(score("bob", "H1", Mods::empty(), 100, 0, 700)),
                    ],
                },
                BeatmapScores {
                    map_hash: "H2".to_string(),
                    replays: vec![replay(score("alice", "H2", Mods::empty(), 100, 0, 10))],
                },
            ],
        }
    }

    #[test]
    fn test_decoded_store_feeds_generator() {
        let bytes = scores_db().to_bytes();
        let store = ScoreStore::from_database(ScoresDb::parse(&bytes, true).unwrap());
        assert_eq!(store.score_count(), 4);

        let alice = store.best_scores_by_username("alice");
        assert_eq!(alice.len(), 2);
        assert_eq!(alice[0].total_score, 900);

        let generator = CollectionGenerator::new(Arc::new(store), Arc::new(HashOnlyCatalog));
        generator.start(GeneratorConfiguration::new(["alice", "bob"], "{0} {1}"));
        generator.wait();

        let collections = generator.collections();
        assert_eq!(names(&collections), vec!["alice HD", "alice ", "bob "]);

        let written = collection_db_bytes(&collections, 20150203);
        let read_back = parse_collection_db(&written, &HashOnlyCatalog).unwrap();
        assert_eq!(read_back.version, 20150203);
        assert_eq!(read_back.collections, collections);
    }

    #[test]
    fn test_corrupt_database_is_error_not_empty() {
        let bytes = scores_db().to_bytes();
        let result = ScoresDb::parse(&bytes[..bytes.len() / 2], true);
        assert!(result.unwrap_err().is_decode());
    }
}
