//! Zia CLI - request orchestration over capability agents
#![cfg_attr(
    test,
    allow(
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::missing_panics_doc,
        reason = "Allow for tests"
    )
)]

use anyhow::Result;
use clap::Parser as _;
use cli::{Cli, Commands};

mod cli;
mod handlers;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    handlers::init_logging(cli.log_file.as_deref())?;

    let config = handlers::load_config(cli.config.as_deref())?;
    let context = handlers::request_context(cli.channel);

    match cli.command {
        Commands::Classify { text } => {
            handlers::handle_classify(&config, &text, cli.user, context).await
        }
        Commands::Route { text } => handlers::handle_route(&config, &text, cli.user, context).await,
        Commands::Run { text } => handlers::handle_run(&config, &text, cli.user, context).await,
        Commands::Config { full } => handlers::handle_config(&config, full),
    }
}
