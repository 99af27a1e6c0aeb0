//! Score filtering and indexing.
//!
//! - `ScoreStore` - per-beatmap scores plus the (beatmap, mods) high-score index
//! - `ScoreSaveConditions` - eligibility filter for generated collections
//! - `Mods` - mod bit set, short names and `ModTranslator`

mod conditions;
pub mod mods;
mod store;

pub use conditions::*;
pub use mods::{ModTranslator, Mods, ParseModsError, ShortModNames};
pub use store::*;
