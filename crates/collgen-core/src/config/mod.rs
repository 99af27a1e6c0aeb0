//! Configuration and format constants.
//!
//! - `GeneratorConfiguration` - usernames, name template and save conditions
//! - Database format versions
//! - Score fetch retry constants

mod generator;

pub use generator::*;

/// Binary database format constants.
pub mod database {
    /// First record version that carries the 8-byte online score identifier.
    pub const ONLINE_SCORE_ID_VERSION: i32 = 20140721;

    /// Version written to new `collection.db` files.
    pub const COLLECTION_DB_VERSION: i32 = 20150203;

    /// Version written to new `scores.db` files.
    pub const SCORES_DB_VERSION: i32 = 20150204;
}

/// Score fetch retry configuration.
///
/// A failed fetch waits a fixed interval before the next attempt. The wait is
/// interrupted as soon as the job is aborted.
pub mod generation {
    use std::time::Duration;

    /// Maximum number of attempts to fetch one user's scores.
    pub const MAX_FETCH_ATTEMPTS: u32 = 5;

    /// Delay between fetch attempts.
    pub const FETCH_RETRY_DELAY: Duration = Duration::from_secs(20);

    /// Collection name used when a template cannot be rendered.
    pub const INVALID_FORMAT_NAME: &str = "Invalid format!";

    /// Completion percentage reported once a job is aborted.
    pub const ABORTED_PERCENTAGE: f64 = -1.0;
}
