//! Glimmer CLI
//!
//! Command-line dashboard for the holiday lighting flyer backend.

mod commands;
mod config;
mod id_resolver;
mod output;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "glimmer")]
#[command(about = "Holiday lighting flyer dashboard", long_about = None)]
struct Cli {
    /// Backend URL
    #[arg(long, env = "GLIMMER_API_URL", default_value = glimmer_sync::config::DEFAULT_API_URL)]
    api_url: String,

    /// File the login token is kept in
    #[arg(long, env = "GLIMMER_CREDENTIALS")]
    credentials: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "glimmer=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.api_url, cli.credentials)?;

    handle_command(cli.command, &config).await
}
