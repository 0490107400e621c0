//! Routelit - demo host and scenario replay for the routelit core.

mod cli;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use routelit::config::{AppConfig, init_config};

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    cli::serve::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    routelit::logger::set_verbose(cli.verbose());

    let mut config = AppConfig::load(&cli.config)?;
    if let Commands::Serve { interface, port, .. } = &cli.command {
        config.apply_serve_options(*interface, *port);
        config.validate()?;
    }
    let config = init_config(config);

    match &cli.command {
        Commands::Serve { .. } => cli::serve::run(),
        Commands::Replay { scenario, .. } => cli::replay::run(scenario, &config),
    }
}
