mod cli;
mod commands;
mod model;
mod token;
mod util;

use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};

fn main() {
    init_tracing();

    if let Err(err) = run() {
        error!(error = %err, "command failed");
        for cause in err.chain().skip(1) {
            error!(cause = %cause, "caused by");
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.name();
    let started = Instant::now();
    debug!(command, version = env!("CARGO_PKG_VERSION"), "tokens starting");

    match cli.command {
        Commands::Generate(args) => commands::generate::run(args)?,
        Commands::Import(args) => commands::import::run(args)?,
    }

    info!(
        command,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "command finished"
    );
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
