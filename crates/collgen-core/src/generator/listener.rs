use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, Sender};

use crate::collection::Collections;

/// Observer of a [`CollectionGenerator`](super::CollectionGenerator) run.
///
/// Called from the worker thread, in emission order.
pub trait GenerationListener: Send + Sync {
    /// New status text and completion percentage (`-1` once aborted).
    fn on_status(&self, _status: &str, _percentage: f64) {}

    /// Final collections of a run. Empty after an abort.
    fn on_collections(&self, _collections: &Collections) {}
}

#[derive(Debug, Clone, PartialEq)]
pub enum GenerationEvent {
    Status { message: String, percentage: f64 },
    Collections(Collections),
}

/// Forwards every notification as a [`GenerationEvent`] over a channel.
#[derive(Debug)]
pub struct ChannelListener {
    tx: Mutex<Sender<GenerationEvent>>,
}

impl ChannelListener {
    pub fn new() -> (Self, Receiver<GenerationEvent>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx: Mutex::new(tx) }, rx)
    }

    fn send(&self, event: GenerationEvent) {
        if let Ok(tx) = self.tx.lock() {
            // Receiver may be gone; nothing left to notify.
            let _ = tx.send(event);
        }
    }
}

impl GenerationListener for ChannelListener {
    fn on_status(&self, status: &str, percentage: f64) {
        self.send(GenerationEvent::Status {
            message: status.to_string(),
            percentage,
        });
    }

    fn on_collections(&self, collections: &Collections) {
        self.send(GenerationEvent::Collections(collections.clone()));
    }
}
