//! Job-related API endpoints

use crate::FlyerClient;
use crate::error::Result;
use glimmer_core::domain::job::{Job, JobStatusReport};
use glimmer_core::dto::job::{CreateJob, DownloadLink};
use reqwest::Method;

impl FlyerClient {
    // =============================================================================
    // Job Lifecycle
    // =============================================================================

    /// List all jobs of the authenticated user
    pub async fn list_jobs(&self) -> Result<Vec<Job>> {
        let response = self.request(Method::GET, "/jobs/")?.send().await?;

        self.handle_response(response).await
    }

    /// Get a job by ID
    ///
    /// # Arguments
    /// * `job_id` - The job identifier
    pub async fn get_job(&self, job_id: &str) -> Result<Job> {
        let response = self
            .request(Method::GET, &format!("/jobs/{}", job_id))?
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Get the status and progress counters of a job
    pub async fn job_status(&self, job_id: &str) -> Result<JobStatusReport> {
        let response = self
            .request(Method::GET, &format!("/jobs/{}/status", job_id))?
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Submit a new campaign
    ///
    /// # Returns
    /// The job created by the backend
    pub async fn submit_job(&self, req: &CreateJob) -> Result<Job> {
        let response = self
            .request(Method::POST, "/jobs/")?
            .json(req)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Delete a job
    pub async fn delete_job(&self, job_id: &str) -> Result<()> {
        let response = self
            .request(Method::DELETE, &format!("/jobs/{}", job_id))?
            .send()
            .await?;

        self.handle_empty_response(response).await
    }

    /// Get a link to an archive of every flyer of a job
    pub async fn download_all(&self, job_id: &str) -> Result<DownloadLink> {
        let response = self
            .request(Method::GET, &format!("/jobs/{}/download-all", job_id))?
            .send()
            .await?;

        self.handle_response(response).await
    }
}
