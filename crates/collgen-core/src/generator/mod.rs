//! Background generation of per-player collections.
//!
//! - `CollectionGenerator` - cancellable job: fetch, filter, name, merge
//! - `ScoreSource`, `FetchError` - where a player's scores come from
//! - `format_collection_name` - collection name templates
//! - `GenerationListener`, `ChannelListener` - progress and result notifications
//! - `CancellationToken` - interruptible waits
//! - accuracy bracket collections

mod brackets;
mod cancel;
mod job;
mod listener;
mod name;
mod source;

pub use brackets::*;
pub use cancel::*;
pub use job::*;
pub use listener::*;
pub use name::*;
pub use source::*;
