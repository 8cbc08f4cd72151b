//! ID resolver module
//!
//! Lets users name a job by an unambiguous id prefix instead of the full id.

use anyhow::{Context, Result, anyhow};
use glimmer_client::FlyerClient;
use glimmer_core::domain::job::Job;

/// Resolve a job ID or prefix to a full job ID
///
/// An exact match wins; otherwise the input must prefix exactly one job.
///
/// # Errors
/// Returns an error if:
/// - No job matches the prefix
/// - Multiple jobs match the prefix (ambiguous)
/// - API call fails
pub async fn resolve_job_id(client: &FlyerClient, id_or_prefix: &str) -> Result<String> {
    let jobs = client
        .list_jobs()
        .await
        .context("Failed to fetch jobs for ID resolution")?;

    match_job_id(&jobs, id_or_prefix)
}

fn match_job_id(jobs: &[Job], id_or_prefix: &str) -> Result<String> {
    let prefix = id_or_prefix.trim().to_lowercase();
    if prefix.is_empty() {
        return Err(anyhow!("Job ID cannot be empty"));
    }

    if let Some(job) = jobs.iter().find(|j| j.id.to_lowercase() == prefix) {
        return Ok(job.id.clone());
    }

    let matches: Vec<_> = jobs
        .iter()
        .filter(|j| j.id.to_lowercase().starts_with(&prefix))
        .collect();

    match matches.len() {
        0 => Err(anyhow!("No job found with ID starting with '{}'", prefix)),
        1 => Ok(matches[0].id.clone()),
        _ => {
            let ids: Vec<&str> = matches.iter().map(|j| j.id.as_str()).collect();
            Err(anyhow!(
                "Ambiguous prefix '{}' matches multiple jobs: {}",
                prefix,
                ids.join(", ")
            ))
        }
    }
}
