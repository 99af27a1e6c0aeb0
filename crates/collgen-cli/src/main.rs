mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Args, Command};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = Args::parse();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("collgen_cli=info,collgen_core=info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Command::Generate {
            config,
            collection,
            output,
            retry_delay,
            json,
        } => commands::generate::run(
            &args.scores,
            &config,
            collection.as_deref(),
            &output,
            retry_delay,
            json,
        ),
        Command::Brackets { collection, output } => {
            commands::brackets::run(&args.scores, collection.as_deref(), &output)
        }
        Command::Inspect { user, json } => {
            commands::inspect::run(&args.scores, user.as_deref(), json)
        }
    }
}
