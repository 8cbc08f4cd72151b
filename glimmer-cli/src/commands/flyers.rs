//! Flyer library and live progress commands

use anyhow::{Result, anyhow};
use colored::*;
use glimmer_core::view::SyncState;
use glimmer_sync::{Dashboard, SyncError};

use crate::config::Config;
use crate::id_resolver::resolve_job_id;
use crate::output::{print_completed_record, print_job_summary, print_stats};

/// Resolve completed jobs and print their flyers, oldest first
pub async fn show_flyers(config: &Config, job: Option<String>) -> Result<()> {
    let dashboard = config.dashboard()?;
    dashboard.refresh_once().await?;
    let state = dashboard.snapshot();

    if let Some(id) = job {
        let job_id = resolve_job_id(dashboard.client(), &id).await?;
        let record = state
            .library
            .get(&job_id)
            .ok_or_else(|| anyhow!("Job {} has no flyers yet", job_id))?;
        print_completed_record(&job_id, record);
        return Ok(());
    }

    if state.library.is_empty() {
        println!("{}", "No completed campaigns yet.".yellow());
        return Ok(());
    }

    print_stats(&dashboard.stats());
    println!();
    for (job_id, record) in state.library.iter() {
        print_completed_record(job_id, record);
    }

    Ok(())
}

/// Poll in the background and redraw on every state change
pub async fn watch(config: &Config, until_idle: bool) -> Result<()> {
    let dashboard = config.dashboard()?;
    let mut rx = dashboard.subscribe();
    let guard = dashboard.start()?;

    println!("{}", "Watching jobs, press Ctrl-C to stop.".dimmed());

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = guard.cancelled() => {
                let state = dashboard.snapshot();
                let message = state
                    .error
                    .unwrap_or_else(|| SyncError::SessionExpired.to_string());
                return Err(anyhow!(message));
            }
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }

        let state = rx.borrow_and_update().clone();
        if !state.loaded {
            continue;
        }

        render(&dashboard, &state);

        if until_idle && dashboard.stats().active_jobs == 0 {
            break;
        }
    }

    Ok(())
}

fn render(dashboard: &Dashboard, state: &SyncState) {
    println!("{}", "─".repeat(60).dimmed());
    print_stats(&dashboard.stats());
    if let Some(error) = &state.error {
        println!("{}", error.red());
    }
    println!();

    let active: Vec<_> = state
        .jobs
        .iter()
        .filter(|job| !job.status.is_terminal())
        .collect();
    if active.is_empty() {
        println!("{}", "No active batch renders.".dimmed());
    }
    for job in active {
        print_job_summary(job);
    }
}
