//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Routelit demo host and replay tool
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: routelit.toml)
    #[arg(short = 'C', long, global = true, default_value = "routelit.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Serve the demo app over HTTP
    #[command(visible_alias = "s")]
    Serve {
        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<std::net::IpAddr>,

        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Enable verbose output for debugging
        #[arg(short = 'v', long)]
        verbose: bool,
    },

    /// Replay a request scenario against the demo app
    #[command(visible_alias = "r")]
    Replay {
        /// JSON file: `[{method, path, payload?, query?, referrer?}, ...]`
        #[arg(value_hint = clap::ValueHint::FilePath)]
        scenario: PathBuf,

        /// Print every response
        #[arg(short = 'v', long)]
        verbose: bool,
    },
}

impl Cli {
    pub fn verbose(&self) -> bool {
        match self.command {
            Commands::Serve { verbose, .. } | Commands::Replay { verbose, .. } => verbose,
        }
    }
}
