//! Sync state and its reducer

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::domain::job::{Job, JobStatus};
use crate::view::library::{Completion, FlyerLibrary};

/// Message surfaced after the backend rejects the session token
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please log in again.";

/// Everything the dashboard shows for one session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncState {
    /// Jobs as last listed by the backend, minus locally deleted ones
    pub jobs: Vec<Job>,
    pub library: FlyerLibrary,
    /// Ids deleted during this session; late listings must not revive them
    deleted: HashSet<String>,
    /// Last user-facing error, cleared by the next successful refresh
    pub error: Option<String>,
    /// Whether at least one job listing has been applied
    pub loaded: bool,
}

/// Something that happened to the dashboard state
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    /// A poll cycle listed the jobs and merged their status reports
    JobsRefreshed(Vec<Job>),
    /// A completed job was resolved into flyers
    JobResolved {
        completion: Completion,
        /// Authoritative address count of the resolution
        address_count: u32,
    },
    /// A campaign was submitted and accepted by the backend
    JobSubmitted(Job),
    /// A job was deleted by the user
    JobDeleted(String),
    /// A transient failure worth showing; state is kept
    FetchFailed(String),
    /// The backend rejected the session token
    SessionExpired,
    /// The user logged out
    SessionEnded,
}

impl SyncState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the next state
    pub fn apply(mut self, event: SyncEvent) -> SyncState {
        match event {
            SyncEvent::JobsRefreshed(jobs) => {
                let library = &self.library;
                self.jobs = jobs
                    .into_iter()
                    .filter(|job| !self.deleted.contains(&job.id))
                    .map(|job| with_resolved_counts(job, library))
                    .collect();
                self.error = None;
                self.loaded = true;
            }
            SyncEvent::JobResolved {
                completion,
                address_count,
            } => {
                if let Some(job) = self.jobs.iter_mut().find(|j| j.id == completion.job_id) {
                    job.total_addresses = Some(address_count);
                    job.completed_addresses = Some(address_count);
                    job.progress = None;
                    if job.completed_at.is_none() {
                        job.completed_at = completion.completed_at;
                    }
                }
                self.library.merge_completion(completion);
            }
            SyncEvent::JobSubmitted(job) => {
                let known = self.jobs.iter().any(|j| j.id == job.id);
                if !known && !self.deleted.contains(&job.id) {
                    self.jobs.push(job);
                }
                self.error = None;
            }
            SyncEvent::JobDeleted(job_id) => {
                self.jobs.retain(|job| job.id != job_id);
                self.deleted.insert(job_id);
            }
            SyncEvent::FetchFailed(message) => {
                self.error = Some(message);
            }
            SyncEvent::SessionExpired => {
                return SyncState {
                    error: Some(SESSION_EXPIRED_MESSAGE.to_string()),
                    ..SyncState::default()
                };
            }
            SyncEvent::SessionEnded => return SyncState::default(),
        }
        self
    }

    pub fn job(&self, job_id: &str) -> Option<&Job> {
        self.jobs.iter().find(|job| job.id == job_id)
    }

    /// Last observed status of a job, if it is in the active collection
    pub fn status_of(&self, job_id: &str) -> Option<JobStatus> {
        self.job(job_id).map(|job| job.status)
    }

    pub fn is_deleted(&self, job_id: &str) -> bool {
        self.deleted.contains(job_id)
    }
}

/// Resolved flyer counts win over the backend's counts for completed jobs
fn with_resolved_counts(mut job: Job, library: &FlyerLibrary) -> Job {
    if job.status == JobStatus::Completed {
        if let Some(record) = library.get(&job.id) {
            let count = u32::try_from(record.flyer_count()).unwrap_or(u32::MAX);
            job.total_addresses = Some(count);
            job.completed_addresses = Some(count);
            job.progress = None;
        }
    }
    job
}
