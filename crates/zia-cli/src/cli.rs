use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments for the Zia orchestrator
#[derive(Parser)]
#[command(name = "zia")]
#[command(about = "Classify, route and execute requests across capability agents", long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to ~/.zia/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Requesting user id attached to the task
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Channel id stored in the task context
    #[arg(long, global = true)]
    pub channel: Option<String>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Classify a request and print the resulting task")]
    Classify {
        #[arg(help = "The request text")]
        text: String,
    },

    #[command(about = "Classify a request and route it to a single agent")]
    Route {
        #[arg(help = "The request text")]
        text: String,
    },

    #[command(about = "Classify a request and execute it, decomposing when needed")]
    Run {
        #[arg(help = "The request text")]
        text: String,
    },

    #[command(about = "Show configuration")]
    Config {
        #[arg(long, help = "Show full configuration including defaults")]
        full: bool,
    },
}
