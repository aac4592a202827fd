mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error + Send + Sync>> {
    vigocam::observability::init_tracing();

    let cli = Cli::parse();

    let code = match cli.command {
        Commands::Fetch(args) => commands::fetch(args).await?,
        Commands::Schedule(args) => commands::schedule(args).await?,
    };

    Ok(code)
}
