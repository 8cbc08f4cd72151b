//! Jobs repository
//!
//! Backend operations used by the sync engine:
//! - Listing jobs and their status reports
//! - Fetching job details and addresses of completed jobs
//! - Submitting and deleting jobs
//! - Reading the free-tier allowance

use async_trait::async_trait;
use glimmer_client::{FlyerClient, Result};
use glimmer_core::domain::address::Address;
use glimmer_core::domain::job::{Job, JobStatusReport};
use glimmer_core::domain::user::FreeUsage;
use glimmer_core::dto::job::CreateJob;

/// Repository trait for job-related backend operations
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Base URL flyer image links are built on
    fn base_url(&self) -> &str;

    /// Lists every job of the authenticated user
    async fn list_jobs(&self) -> Result<Vec<Job>>;

    /// Fetches full details of one job
    async fn get_job(&self, job_id: &str) -> Result<Job>;

    /// Fetches the status report of one job
    async fn job_status(&self, job_id: &str) -> Result<JobStatusReport>;

    /// Lists the addresses of one job in backend order
    async fn list_addresses(&self, job_id: &str) -> Result<Vec<Address>>;

    /// Submits a new campaign
    async fn submit_job(&self, req: &CreateJob) -> Result<Job>;

    /// Deletes a job
    async fn delete_job(&self, job_id: &str) -> Result<()>;

    /// Reads the free-tier allowance
    async fn free_usage(&self) -> Result<FreeUsage>;
}

/// HTTP implementation of JobRepository
#[derive(Debug, Clone)]
pub struct HttpJobRepository {
    client: FlyerClient,
}

impl HttpJobRepository {
    /// Creates a new HTTP job repository
    pub fn new(client: FlyerClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl JobRepository for HttpJobRepository {
    fn base_url(&self) -> &str {
        self.client.base_url()
    }

    async fn list_jobs(&self) -> Result<Vec<Job>> {
        self.client.list_jobs().await
    }

    async fn get_job(&self, job_id: &str) -> Result<Job> {
        self.client.get_job(job_id).await
    }

    async fn job_status(&self, job_id: &str) -> Result<JobStatusReport> {
        self.client.job_status(job_id).await
    }

    async fn list_addresses(&self, job_id: &str) -> Result<Vec<Address>> {
        self.client.list_addresses(job_id).await
    }

    async fn submit_job(&self, req: &CreateJob) -> Result<Job> {
        self.client.submit_job(req).await
    }

    async fn delete_job(&self, job_id: &str) -> Result<()> {
        self.client.delete_job(job_id).await
    }

    async fn free_usage(&self) -> Result<FreeUsage> {
        self.client.free_usage().await
    }
}
