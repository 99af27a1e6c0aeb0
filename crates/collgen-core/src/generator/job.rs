use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};

use strum::IntoStaticStr;
use tracing::{debug, info, warn};

use crate::collection::{
    Beatmap, BeatmapCatalog, Collection, CollectionEdit, Collections, CollectionsManager,
};
use crate::config::GeneratorConfiguration;
use crate::config::generation::ABORTED_PERCENTAGE;
use crate::error::{self, Error};
use crate::replay::Score;
use crate::retry::{FixedDelay, RetryError, RetryStrategy};
use crate::score::{ModTranslator, ShortModNames};

use super::cancel::CancellationToken;
use super::listener::GenerationListener;
use super::name::collection_name_or_fallback;
use super::source::{FetchError, ScoreSource};

const PREPARING: &str = "Preparing...";
const ABORTED: &str = "FAILED | User aborted.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, IntoStaticStr)]
pub enum GenerationState {
    #[default]
    Idle,
    Running,
    Completed,
    Aborted,
}

impl GenerationState {
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Completed | Self::Aborted)
    }
}

#[derive(Debug, Default)]
struct Progress {
    state: GenerationState,
    status: String,
    percentage: f64,
    collections: Collections,
}

#[derive(Default)]
struct Shared {
    progress: Mutex<Progress>,
    listeners: Mutex<Vec<Arc<dyn GenerationListener>>>,
}

impl Shared {
    /// Store first, then notify, so listeners observe the new value through accessors.
    fn set_status(&self, status: String, percentage: f64) {
        {
            let mut progress = lock(&self.progress);
            progress.status.clone_from(&status);
            progress.percentage = percentage;
        }
        debug!("[{:.1}%] {}", percentage, status);
        for listener in self.listeners() {
            listener.on_status(&status, percentage);
        }
    }

    fn finish(&self, state: GenerationState, collections: Collections) {
        {
            let mut progress = lock(&self.progress);
            progress.state = state;
            progress.collections.clone_from(&collections);
        }
        for listener in self.listeners() {
            listener.on_collections(&collections);
        }
    }

    fn listeners(&self) -> Vec<Arc<dyn GenerationListener>> {
        lock(&self.listeners).clone()
    }
}

/// Builds per-player collections on a background thread.
///
/// One run at a time. All methods take `&self`, so a generator can be shared
/// (for example with a Ctrl+C handler) behind an `Arc`.
pub struct CollectionGenerator {
    source: Arc<dyn ScoreSource>,
    catalog: Arc<dyn BeatmapCatalog>,
    translator: Arc<dyn ModTranslator>,
    retry: FixedDelay,
    cancel: CancellationToken,
    shared: Arc<Shared>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl CollectionGenerator {
    pub fn new(source: Arc<dyn ScoreSource>, catalog: Arc<dyn BeatmapCatalog>) -> Self {
        Self {
            source,
            catalog,
            translator: Arc::new(ShortModNames),
            retry: FixedDelay::default(),
            cancel: CancellationToken::new(),
            shared: Arc::new(Shared::default()),
            worker: Mutex::new(None),
        }
    }

    pub fn with_retry(mut self, retry: FixedDelay) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_translator(mut self, translator: Arc<dyn ModTranslator>) -> Self {
        self.translator = translator;
        self
    }

    pub fn subscribe(&self, listener: Arc<dyn GenerationListener>) {
        lock(&self.shared.listeners).push(listener);
    }

    /// Start a run on a new worker thread.
    ///
    /// Returns `false` without side effects while a run is in progress.
    pub fn start(&self, config: GeneratorConfiguration) -> bool {
        match self.try_start(config) {
            Ok(()) => true,
            Err(Error::GeneratorBusy) => {
                debug!("Generation already running, ignoring start request");
                false
            }
            Err(e) => {
                warn!("Failed to start generation: {}", e);
                false
            }
        }
    }

    /// Like [`start`](Self::start), but reports why a run did not start.
    pub fn try_start(&self, config: GeneratorConfiguration) -> error::Result<()> {
        let mut worker = lock(&self.worker);
        {
            let mut progress = lock(&self.shared.progress);
            if progress.state == GenerationState::Running {
                return Err(Error::GeneratorBusy);
            }
            progress.state = GenerationState::Running;
            progress.collections.clear();
        }
        if let Some(previous) = worker.take() {
            join_worker(previous, &self.shared);
        }
        self.cancel.reset();

        info!(
            "Starting collection generation for {} users",
            config.usernames.len()
        );
        let run = Run {
            source: Arc::clone(&self.source),
            catalog: Arc::clone(&self.catalog),
            translator: Arc::clone(&self.translator),
            retry: self.retry,
            cancel: self.cancel.clone(),
            shared: Arc::clone(&self.shared),
            config,
        };
        match thread::Builder::new()
            .name("collection-generator".to_string())
            .spawn(move || run.execute())
        {
            Ok(handle) => {
                *worker = Some(handle);
                Ok(())
            }
            Err(e) => {
                lock(&self.shared.progress).state = GenerationState::Idle;
                Err(e.into())
            }
        }
    }

    /// Cancel the running job and wait for the worker to unwind. No-op unless running.
    pub fn abort(&self) {
        let mut worker = lock(&self.worker);
        if self.state() != GenerationState::Running {
            return;
        }
        info!("Aborting collection generation");
        self.cancel.cancel();
        if let Some(handle) = worker.take() {
            join_worker(handle, &self.shared);
        }
    }

    /// Block until the current run (if any) ends and return its final state.
    pub fn wait(&self) -> GenerationState {
        let handle = lock(&self.worker).take();
        if let Some(handle) = handle {
            join_worker(handle, &self.shared);
        }
        self.state()
    }

    pub fn status(&self) -> String {
        lock(&self.shared.progress).status.clone()
    }

    /// 0 to 100, or -1 once aborted.
    pub fn completion_percentage(&self) -> f64 {
        lock(&self.shared.progress).percentage
    }

    /// Result of the last finished run.
    pub fn collections(&self) -> Collections {
        lock(&self.shared.progress).collections.clone()
    }

    pub fn state(&self) -> GenerationState {
        lock(&self.shared.progress).state
    }

    pub fn is_running(&self) -> bool {
        self.state() == GenerationState::Running
    }
}

impl Drop for CollectionGenerator {
    fn drop(&mut self) {
        self.abort();
    }
}

fn join_worker(handle: JoinHandle<()>, shared: &Shared) {
    if handle.join().is_err() {
        warn!("Generation worker panicked");
        let mut progress = lock(&shared.progress);
        if progress.state == GenerationState::Running {
            progress.state = GenerationState::Aborted;
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn user_status(username: &str, message: &str) -> String {
    format!("Processing \"{}\" | {}", username, message)
}

/// Everything a worker needs, moved onto its thread.
struct Run {
    source: Arc<dyn ScoreSource>,
    catalog: Arc<dyn BeatmapCatalog>,
    translator: Arc<dyn ModTranslator>,
    retry: FixedDelay,
    cancel: CancellationToken,
    shared: Arc<Shared>,
    config: GeneratorConfiguration,
}

impl Run {
    fn execute(self) {
        self.shared.set_status(PREPARING.to_string(), 0.0);

        match self.process_users() {
            Some(collections) => {
                info!(
                    "Generated {} collections for {} users",
                    collections.len(),
                    self.config.usernames.len()
                );
                self.shared.set_status(
                    format!(
                        "Done processing {} users! - Close this window to add created collections",
                        self.config.usernames.len()
                    ),
                    100.0,
                );
                self.shared.finish(GenerationState::Completed, collections);
            }
            None => {
                info!("Collection generation aborted");
                self.shared
                    .set_status(ABORTED.to_string(), ABORTED_PERCENTAGE);
                self.shared.finish(GenerationState::Aborted, Vec::new());
            }
        }
    }

    /// `None` when cancelled.
    fn process_users(&self) -> Option<Collections> {
        let usernames = &self.config.usernames;
        let total = usernames.len();
        let mut manager = CollectionsManager::new();
        let mut cache: HashMap<&str, Vec<Score>> = HashMap::new();

        for (processed, username) in usernames.iter().enumerate() {
            if self.cancel.is_cancelled() {
                return None;
            }
            let percentage = processed as f64 / total as f64 * 100.0;

            if cache.contains_key(username.as_str()) {
                self.shared.set_status(self.attempt_status(username, 0), percentage);
            } else {
                let scores = match self.fetch(username, percentage) {
                    Ok(scores) => scores,
                    Err(RetryError::Cancelled) => return None,
                    Err(RetryError::Failed(e)) => {
                        warn!("Skipping {}: {}", username, e);
                        self.shared.set_status(
                            user_status(username, &format!("FAILED | {}", e)),
                            percentage,
                        );
                        Vec::new()
                    }
                };
                cache.insert(username.as_str(), scores);
            }
            let scores = cache.get(username.as_str()).map_or(&[][..], Vec::as_slice);

            let collections = self.user_collections(username, scores);
            debug!("{}: {} collections", username, collections.len());
            manager.edit(CollectionEdit::AddOrMerge(collections));

            let done = processed + 1;
            self.shared.set_status(
                user_status(username, &format!("Done processing {} users!", done)),
                done as f64 / total as f64 * 100.0,
            );
        }

        Some(manager.into_collections())
    }

    fn fetch(&self, username: &str, percentage: f64) -> Result<Vec<Score>, RetryError<FetchError>> {
        self.retry.execute(
            &self.cancel,
            |attempt| {
                self.shared.set_status(self.attempt_status(username, attempt), percentage);
                self.source.fetch_scores(username)
            },
            |attempt, err, delay| {
                debug!("Fetch attempt {} for {} failed: {}", attempt + 1, username, err);
                self.shared.set_status(
                    user_status(
                        username,
                        &format!("FAILED | Waiting {}s and trying again.", delay.as_secs()),
                    ),
                    percentage,
                );
            },
        )
    }

    fn attempt_status(&self, username: &str, attempt: u32) -> String {
        user_status(
            username,
            &format!(
                "Getting scores...(try {} of {})",
                attempt + 1,
                self.retry.max_attempts()
            ),
        )
    }

    /// One collection per distinct formatted name, beatmaps in first-appearance order.
    fn user_collections(&self, username: &str, scores: &[Score]) -> Collections {
        let template = &self.config.collection_name_format;
        let mut by_name: Vec<(String, Vec<Beatmap>)> = Vec::new();
        let mut unresolved = 0usize;

        for score in scores
            .iter()
            .filter(|s| self.config.conditions.is_eligible(s))
        {
            let Some(beatmap) = self.catalog.lookup(&score.map_hash) else {
                debug!("Beatmap {} not in catalog, skipping", score.map_hash);
                unresolved += 1;
                continue;
            };
            let name =
                collection_name_or_fallback(score, username, template, self.translator.as_ref());
            match by_name.iter_mut().find(|(n, _)| *n == name) {
                Some((_, beatmaps)) => beatmaps.push(beatmap),
                None => by_name.push((name, vec![beatmap])),
            }
        }

        if unresolved > 0 {
            warn!("{}: {} scores on beatmaps missing from the catalog", username, unresolved);
        }
        by_name
            .into_iter()
            .map(|(name, beatmaps)| Collection::with_beatmaps(name, beatmaps))
            .collect()
    }
}
