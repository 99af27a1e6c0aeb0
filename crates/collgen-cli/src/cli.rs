//! CLI argument definitions for collgen.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "collgen")]
#[command(about = "Beatmap collection generator for osu! scores", version)]
pub struct Args {
    /// Path to scores.db
    #[arg(long, global = true, env = "COLLGEN_SCORES_DB", default_value = "scores.db")]
    pub scores: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate per-player collections and merge them into a collection.db
    Generate {
        /// Generator configuration (TOML)
        #[arg(short, long, default_value = "generator.toml")]
        config: String,
        /// Existing collection.db to merge into
        #[arg(long, value_name = "FILE")]
        collection: Option<String>,
        /// Output collection.db path
        #[arg(short, long, default_value = "collection.db")]
        output: String,
        /// Seconds to wait between fetch attempts
        #[arg(long, default_value = "20")]
        retry_delay: u64,
        /// Print the generated collections as JSON instead of writing a file
        #[arg(long)]
        json: bool,
    },
    /// Rebuild the accuracy bracket collections
    Brackets {
        /// Existing collection.db to update
        #[arg(long, value_name = "FILE")]
        collection: Option<String>,
        /// Output collection.db path
        #[arg(short, long, default_value = "collection.db")]
        output: String,
    },
    /// Show score database statistics or a player's best scores
    Inspect {
        /// Player whose group-best scores to list
        #[arg(short, long)]
        user: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
