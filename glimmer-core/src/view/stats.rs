//! Derived dashboard statistics and job display projection

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::job::{Job, JobStatus};
use crate::view::state::SyncState;

/// Headline counters of the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    /// Distinct jobs with a completed flyer record
    pub completed_jobs: usize,
    /// Jobs whose status is not terminal
    pub active_jobs: usize,
    /// Flyers across all streets of all completed jobs
    pub total_flyers: usize,
}

impl From<&SyncState> for DashboardStats {
    fn from(state: &SyncState) -> Self {
        Self {
            completed_jobs: state.library.len(),
            active_jobs: state
                .jobs
                .iter()
                .filter(|job| !job.status.is_terminal())
                .count(),
            total_flyers: state.library.total_flyers(),
        }
    }
}

/// How a job's progress is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProgressDisplay {
    /// No addresses known yet
    Queued,
    Percent(u8),
}

impl std::fmt::Display for ProgressDisplay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProgressDisplay::Queued => write!(f, "Queued"),
            ProgressDisplay::Percent(pct) => write!(f, "{}%", pct),
        }
    }
}

/// One row of the active batch renders list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobSummary {
    pub id: String,
    pub title: String,
    pub homes: u32,
    pub started_at: Option<DateTime<Utc>>,
    pub progress: ProgressDisplay,
    pub status: JobStatus,
}

impl From<&Job> for JobSummary {
    fn from(job: &Job) -> Self {
        let progress = match (job.progress, job.total(), job.status) {
            (Some(pct), _, _) => ProgressDisplay::Percent(pct.round().clamp(0.0, 100.0) as u8),
            (None, 0, JobStatus::Completed) => ProgressDisplay::Percent(100),
            (None, 0, _) => ProgressDisplay::Queued,
            (None, _, _) => ProgressDisplay::Percent(job.progress_percent()),
        };

        Self {
            id: job.id.clone(),
            title: job.title().to_string(),
            homes: job.total(),
            started_at: job.created_at,
            progress,
            status: job.status,
        }
    }
}

impl JobSummary {
    /// `Started <time>` or `Starting soon` when the backend sent no timestamp
    pub fn start_text(&self) -> String {
        match self.started_at {
            Some(at) => format!("Started {}", at.format("%Y-%m-%d %H:%M")),
            None => "Starting soon".to_string(),
        }
    }
}
