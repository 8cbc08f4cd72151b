//! Job command handlers
//!
//! Handles all job-related CLI commands including listing, submitting
//! and deleting campaigns and fetching their rendered images.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use glimmer_client::FlyerClient;
use glimmer_sync::SyncError;
use glimmer_sync::service::Campaign;
use std::path::PathBuf;

use crate::config::Config;
use crate::id_resolver::resolve_job_id;
use crate::output::{colorize_status, print_job_details, print_job_summary};

/// Job subcommands
#[derive(Subcommand)]
pub enum JobCommands {
    /// List all jobs
    List,
    /// Get job details
    Get {
        /// Job ID or unambiguous prefix
        id: String,
    },
    /// Show the live status report of a job
    Status {
        /// Job ID or unambiguous prefix
        id: String,
    },
    /// Submit a new campaign
    Submit {
        /// Campaign name
        #[arg(long)]
        name: String,
        /// Street address; repeat for every home
        #[arg(long = "address", required = true)]
        addresses: Vec<String>,
        #[arg(long)]
        city: String,
        #[arg(long)]
        state: String,
        /// Lighting preferences as a JSON object
        #[arg(long)]
        lighting: Option<String>,
    },
    /// Delete a job
    Delete {
        /// Job ID or unambiguous prefix
        id: String,
    },
    /// List the addresses of a job
    Addresses {
        /// Job ID or unambiguous prefix
        id: String,
    },
    /// Print the archive link of every flyer of a job
    Download {
        /// Job ID or unambiguous prefix
        id: String,
    },
    /// Show image metadata and the output link of one address
    Images {
        /// Job ID or unambiguous prefix
        id: String,
        address_id: String,
    },
    /// Save the rendered image of one address
    Image {
        /// Job ID or unambiguous prefix
        id: String,
        address_id: String,
        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },
}

/// Handle job commands
///
/// Routes job subcommands to their respective handlers.
///
/// # Arguments
/// * `command` - The job command to execute
/// * `config` - The CLI configuration
pub async fn handle_job_command(command: JobCommands, config: &Config) -> Result<()> {
    let dashboard = config.dashboard()?;
    let client = dashboard.client();

    match command {
        JobCommands::List => list_jobs(client).await,
        JobCommands::Get { id } => {
            let job_id = resolve_job_id(client, &id).await?;
            let job = client.get_job(&job_id).await?;
            print_job_details(&job);
            Ok(())
        }
        JobCommands::Status { id } => show_status(client, &id).await,
        JobCommands::Submit {
            name,
            addresses,
            city,
            state,
            lighting,
        } => {
            let lighting_preferences = lighting
                .map(|raw| serde_json::from_str(&raw))
                .transpose()
                .context("--lighting must be a JSON object")?;
            let campaign = Campaign {
                name,
                addresses,
                city,
                state,
                lighting_preferences,
            };

            match dashboard.submit_campaign(&campaign).await {
                Ok(job) => {
                    println!(
                        "{} Submitted {} ({} homes)",
                        "✓".green(),
                        job.title().bold(),
                        campaign.image_count()
                    );
                    println!("  ID: {}", job.id.cyan());
                    Ok(())
                }
                Err(SyncError::QuotaExceeded { message, .. }) => {
                    println!("{}", message.yellow());
                    println!("{}", "Run `glimmer billing plans` to subscribe.".dimmed());
                    Ok(())
                }
                Err(e) => Err(e.into()),
            }
        }
        JobCommands::Delete { id } => {
            let job_id = resolve_job_id(client, &id).await?;
            dashboard.delete_job(&job_id).await?;
            println!("{} Deleted job {}", "✓".green(), job_id);
            Ok(())
        }
        JobCommands::Addresses { id } => list_addresses(client, &id).await,
        JobCommands::Download { id } => {
            let job_id = resolve_job_id(client, &id).await?;
            let link = client.download_all(&job_id).await?;
            println!("{}", link.url());
            Ok(())
        }
        JobCommands::Images { id, address_id } => {
            let job_id = resolve_job_id(client, &id).await?;
            let images = client.address_images(&job_id, &address_id).await?;
            println!("{}", serde_json::to_string_pretty(&images)?);
            println!(
                "Output image: {}",
                client.output_image_url(&job_id, &address_id).cyan()
            );
            Ok(())
        }
        JobCommands::Image {
            id,
            address_id,
            output,
        } => {
            let job_id = resolve_job_id(client, &id).await?;
            let bytes = client.output_image(&job_id, &address_id).await?;
            tokio::fs::write(&output, &bytes)
                .await
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!(
                "{} Saved {} bytes to {}",
                "✓".green(),
                bytes.len(),
                output.display()
            );
            Ok(())
        }
    }
}

/// List all jobs
async fn list_jobs(client: &FlyerClient) -> Result<()> {
    let jobs = client.list_jobs().await?;

    if jobs.is_empty() {
        println!("{}", "No jobs found.".yellow());
    } else {
        println!("{}", format!("Found {} job(s):", jobs.len()).bold());
        println!();
        for job in jobs {
            print_job_summary(&job);
        }
    }

    Ok(())
}

async fn show_status(client: &FlyerClient, id: &str) -> Result<()> {
    let job_id = resolve_job_id(client, id).await?;
    let report = client.job_status(&job_id).await?;

    println!("{}", format!("Status of job {}:", job_id).bold());
    if let Some(status) = report.status {
        println!("  Status:    {}", colorize_status(status));
    }
    if let (Some(completed), Some(total)) = (report.completed_addresses, report.total_addresses) {
        println!("  Addresses: {}/{}", completed, total);
    }
    if let Some(progress) = report.progress {
        println!("  Progress:  {:.0}%", progress);
    }
    if let Some(at) = report.completed_at {
        println!("  Completed: {}", at.format("%Y-%m-%d %H:%M:%S"));
    }

    Ok(())
}

async fn list_addresses(client: &FlyerClient, id: &str) -> Result<()> {
    let job_id = resolve_job_id(client, id).await?;
    let addresses = client.list_addresses(&job_id).await?;

    if addresses.is_empty() {
        println!("{}", "No addresses found for this job.".yellow());
        return Ok(());
    }

    println!(
        "{}",
        format!("{} address(es) for job {}:", addresses.len(), job_id).bold()
    );
    for address in addresses {
        println!(
            "  {} {} {}",
            address.id.dimmed(),
            address.display_address(),
            format!("[{}]", address.street_name()).cyan()
        );
    }

    Ok(())
}
