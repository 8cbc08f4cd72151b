//! Job domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::wire;

/// Title shown for jobs submitted without a campaign name
pub const UNTITLED_CAMPAIGN: &str = "Untitled Campaign";

/// A batch rendering request tracked by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(deserialize_with = "wire::id")]
    pub id: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "wire::opt_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "wire::opt_timestamp")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: JobStatus,
    #[serde(default)]
    pub total_addresses: Option<u32>,
    #[serde(default)]
    pub completed_addresses: Option<u32>,
    /// Percentage reported by the status endpoint, when it sends one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
}

/// Job lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Pending,
    Queued,
    Processing,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    /// Whether the job can no longer change
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            JobStatus::Pending => "pending",
            JobStatus::Queued => "queued",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// Progress counters returned by `GET /jobs/{id}/status`
///
/// Every field is optional; absent fields leave the job untouched when merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobStatusReport {
    #[serde(default)]
    pub status: Option<JobStatus>,
    #[serde(default)]
    pub total_addresses: Option<u32>,
    #[serde(default)]
    pub completed_addresses: Option<u32>,
    #[serde(default)]
    pub progress: Option<f64>,
    #[serde(default, deserialize_with = "wire::opt_timestamp")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Job {
    /// Display title, falling back to [`UNTITLED_CAMPAIGN`]
    pub fn title(&self) -> &str {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or(UNTITLED_CAMPAIGN)
    }

    pub fn total(&self) -> u32 {
        self.total_addresses.unwrap_or(0)
    }

    /// Completed address count, never above the total
    pub fn completed(&self) -> u32 {
        self.completed_addresses.unwrap_or(0).min(self.total())
    }

    /// Whether either progress counter is missing
    pub fn has_missing_counts(&self) -> bool {
        self.total_addresses.is_none() || self.completed_addresses.is_none()
    }

    /// Rounded completion percentage; 0 when the job has no addresses
    pub fn progress_percent(&self) -> u8 {
        let total = self.total();
        if total == 0 {
            return 0;
        }
        let pct = (f64::from(self.completed()) * 100.0 / f64::from(total)).round();
        pct.clamp(0.0, 100.0) as u8
    }

    /// Returns a new job with the status report applied on top
    pub fn with_status(&self, report: &JobStatusReport) -> Job {
        Job {
            status: report.status.unwrap_or(self.status),
            total_addresses: report.total_addresses.or(self.total_addresses),
            completed_addresses: report.completed_addresses.or(self.completed_addresses),
            completed_at: report.completed_at.or(self.completed_at),
            progress: report.progress.or(self.progress),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(total: Option<u32>, completed: Option<u32>) -> Job {
        Job {
            id: "j1".to_string(),
            description: None,
            created_at: None,
            completed_at: None,
            status: JobStatus::Processing,
            total_addresses: total,
            completed_addresses: completed,
            progress: None,
        }
    }

    #[test]
    fn test_progress_zero_total() {
        assert_eq!(job(Some(0), Some(0)).progress_percent(), 0);
        assert_eq!(job(None, None).progress_percent(), 0);
    }

    #[test]
    fn test_progress_rounds() {
        assert_eq!(job(Some(3), Some(1)).progress_percent(), 33);
        assert_eq!(job(Some(3), Some(2)).progress_percent(), 67);
        assert_eq!(job(Some(3), Some(3)).progress_percent(), 100);
    }

    #[test]
    fn test_completed_clamped_to_total() {
        let j = job(Some(2), Some(5));
        assert_eq!(j.completed(), 2);
        assert_eq!(j.progress_percent(), 100);
    }

    #[test]
    fn test_title_fallback() {
        let mut j = job(None, None);
        assert_eq!(j.title(), UNTITLED_CAMPAIGN);
        j.description = Some("  ".to_string());
        assert_eq!(j.title(), UNTITLED_CAMPAIGN);
        j.description = Some("Oak Street Lights".to_string());
        assert_eq!(j.title(), "Oak Street Lights");
    }

    #[test]
    fn test_with_status_keeps_absent_fields() {
        let j = job(Some(3), Some(1));
        let merged = j.with_status(&JobStatusReport {
            status: Some(JobStatus::Completed),
            completed_addresses: Some(3),
            ..Default::default()
        });

        assert_eq!(merged.status, JobStatus::Completed);
        assert_eq!(merged.total_addresses, Some(3));
        assert_eq!(merged.completed_addresses, Some(3));
        assert_eq!(j.status, JobStatus::Processing);
    }

    #[test]
    fn test_with_status_carries_progress() {
        let j = job(Some(4), Some(1));
        let merged = j.with_status(&JobStatusReport {
            progress: Some(62.5),
            ..Default::default()
        });
        assert_eq!(merged.progress, Some(62.5));

        let unchanged = merged.with_status(&JobStatusReport::default());
        assert_eq!(unchanged.progress, Some(62.5));
    }

    #[test]
    fn test_decode_backend_job() {
        let raw = r#"{
            "id": 12,
            "description": "Holiday Blitz",
            "created_at": "2024-12-01T10:00:00",
            "completed_at": null,
            "status": "processing",
            "total_addresses": 3,
            "completed_addresses": 1
        }"#;
        let j: Job = serde_json::from_str(raw).unwrap();
        assert_eq!(j.id, "12");
        assert_eq!(j.status, JobStatus::Processing);
        assert!(j.created_at.is_some());
        assert!(j.completed_at.is_none());
    }

    #[test]
    fn test_unknown_status_is_not_terminal() {
        let status: JobStatus = serde_json::from_str(r#""rendering""#).unwrap();
        assert_eq!(status, JobStatus::Unknown);
        assert!(!status.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
    }
}
