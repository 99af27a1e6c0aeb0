//! Score/replay records as stored in the client's databases.
//!
//! - `PlayMode` - ruleset of a play
//! - `HitCounts`, `Score` - the fields the generator works with
//! - `Replay` - a full record, decoded from and encoded to the binary layout;
//!   `AbsentStrings` remembers which strings were stored as absent
//! - tick/timestamp conversion helpers

mod mode;
mod record;
mod ticks;

pub use mode::*;
pub use record::*;
pub use ticks::*;
