//! Kiln - a front-end asset pipeline.

mod actor;
mod cli;
mod config;
mod core;
mod embed;
mod graph;
mod logger;
mod reload;
mod report;
mod task;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::{PipelineConfig, init_config};

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {}
    }
    logger::set_verbose(cli.verbose);

    let config = init_config(PipelineConfig::load(&cli)?);

    match cli.command() {
        Commands::Build => {
            let report = cli::build::build_all(&config)?;
            cli::build::ensure_success(&report)
        }
        Commands::Task(command) => {
            let report = cli::build::run_task(command.task(), &config)?;
            cli::build::ensure_success(&report)
        }
        Commands::Dev { .. } => cli::dev::dev(config),
        Commands::Watch => cli::dev::watch(config),
        Commands::Serve { .. } => cli::dev::serve(config),
    }
}
