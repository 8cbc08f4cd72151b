//! Flyer resolution
//!
//! Turns a completed job into its flyers, grouped by street. Addresses keep
//! the order the backend returned them in within each street.

use glimmer_client::ClientError;
use glimmer_core::domain::flyer::Flyer;
use glimmer_core::domain::job::Job;
use glimmer_core::view::{Completion, StreetMap, SyncEvent};
use tracing::debug;

use crate::repository::JobRepository;

/// Flyers of one completed job together with its authoritative address count
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub completion: Completion,
    pub address_count: u32,
}

impl Resolution {
    pub fn into_event(self) -> SyncEvent {
        SyncEvent::JobResolved {
            completion: self.completion,
            address_count: self.address_count,
        }
    }
}

/// Resolves `job` into flyers
///
/// Fetches the job's details first when its progress counters are missing.
/// Returns `None` when the job has no addresses; no record is created then.
pub async fn resolve(
    repo: &dyn JobRepository,
    job: &Job,
) -> Result<Option<Resolution>, ClientError> {
    let details;
    let job = if job.has_missing_counts() {
        debug!("Job {} has no counters, fetching details", job.id);
        let fetched = repo.get_job(&job.id).await?;
        details = Job {
            status: job.status,
            completed_at: job.completed_at.or(fetched.completed_at),
            ..fetched
        };
        &details
    } else {
        job
    };

    let addresses = repo.list_addresses(&job.id).await?;
    if addresses.is_empty() {
        debug!("Job {} has no addresses, nothing to resolve", job.id);
        return Ok(None);
    }

    let base_url = repo.base_url();
    let mut streets = StreetMap::new();
    for address in &addresses {
        streets
            .entry(address.street_name())
            .or_default()
            .push(Flyer::from_address(&job.id, address, base_url));
    }

    debug!(
        "Resolved job {} into {} flyer(s) on {} street(s)",
        job.id,
        addresses.len(),
        streets.len()
    );

    Ok(Some(Resolution {
        completion: Completion {
            job_id: job.id.clone(),
            title: job.title().to_string(),
            created_at: job.created_at,
            completed_at: job.completed_at,
            streets,
        },
        address_count: u32::try_from(addresses.len()).unwrap_or(u32::MAX),
    }))
}
