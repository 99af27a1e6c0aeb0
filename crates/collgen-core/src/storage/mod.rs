mod collection_db;
mod scores_db;

pub use collection_db::*;
pub use scores_db::*;
