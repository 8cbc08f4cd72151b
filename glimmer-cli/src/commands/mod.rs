//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod auth;
mod billing;
mod flyers;
mod job;

pub use auth::AuthCommands;
pub use billing::BillingCommands;
pub use job::JobCommands;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Account and session management
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// Show the free image allowance
    Usage,
    /// Campaign job management
    Job {
        #[command(subcommand)]
        command: JobCommands,
    },
    /// Show completed campaigns with their flyers grouped by street
    Flyers {
        /// Only show this job (ID or unambiguous prefix)
        job: Option<String>,
    },
    /// Poll the backend and print progress until interrupted
    Watch {
        /// Stop once no job is active
        #[arg(long)]
        until_idle: bool,
    },
    /// Subscription management
    Billing {
        #[command(subcommand)]
        command: BillingCommands,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Auth { command } => auth::handle_auth_command(command, config).await,
        Commands::Usage => auth::show_usage(config).await,
        Commands::Job { command } => job::handle_job_command(command, config).await,
        Commands::Flyers { job } => flyers::show_flyers(config, job).await,
        Commands::Watch { until_idle } => flyers::watch(config, until_idle).await,
        Commands::Billing { command } => billing::handle_billing_command(command, config).await,
    }
}
