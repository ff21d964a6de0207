//! CLI entrypoint for SongMaster
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod logging;
mod run;
mod services;

use anyhow::{Result, anyhow, bail};
use clap::{CommandFactory, Parser};
use colored::Colorize;
use songmaster_infrastructure::ConfigLoader;
use songmaster_infrastructure::config::FileConfig;
use songmaster_presentation::{Cli, Command};
use services::Services;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    let _log_guard = logging::init(cli.verbose, config.logging.file.as_deref());
    info!("Starting SongMaster");

    check_config(&config)?;

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    // === Dependency Injection ===
    let services = Services::build(&config);

    match command {
        Command::Serve(args) => run::serve(&config, services, args).await,
        Command::Generate(args) => run::generate(&config, services, args, cli.quiet).await,
        Command::Iterate(args) => run::iterate(&config, services, args, cli.quiet).await,
        Command::Artists(args) => run::artists(&config, services, args).await,
        Command::Prompts(command) => run::prompts(services, command).await,
        Command::Library => run::library(services).await,
    }
}

/// Print every configuration issue; refuse to start on errors.
fn check_config(config: &FileConfig) -> Result<()> {
    let issues = config.validate();
    for issue in &issues {
        if issue.is_error() {
            eprintln!("{} {}", "config error:".red().bold(), issue.message);
        } else {
            eprintln!("{} {}", "config warning:".yellow().bold(), issue.message);
        }
    }
    if issues.iter().any(|i| i.is_error()) {
        bail!("Invalid configuration");
    }
    Ok(())
}
