//! In-memory repository for unit tests

use async_trait::async_trait;
use chrono::Utc;
use glimmer_client::{ClientError, Result};
use glimmer_core::domain::address::Address;
use glimmer_core::domain::job::{Job, JobStatus, JobStatusReport};
use glimmer_core::domain::user::FreeUsage;
use glimmer_core::dto::job::CreateJob;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use crate::repository::JobRepository;

pub fn job(id: &str, status: JobStatus, total: Option<u32>, completed: Option<u32>) -> Job {
    Job {
        id: id.to_string(),
        description: Some(format!("Campaign {}", id)),
        created_at: Some(Utc::now()),
        completed_at: None,
        status,
        total_addresses: total,
        completed_addresses: completed,
        progress: None,
    }
}

pub fn address(id: &str, street: Option<&str>, full: &str) -> Address {
    Address {
        id: id.to_string(),
        job_id: None,
        street: street.map(str::to_string),
        house_number: None,
        full_address: Some(full.to_string()),
        city: None,
        state: None,
        latitude: None,
        longitude: None,
        created_at: None,
    }
}

pub fn report(status: JobStatus, total: u32, completed: u32) -> JobStatusReport {
    JobStatusReport {
        status: Some(status),
        total_addresses: Some(total),
        completed_addresses: Some(completed),
        progress: None,
        completed_at: None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    Unauthorized,
    Server,
}

impl Failure {
    fn error(self) -> ClientError {
        match self {
            Failure::Unauthorized => {
                ClientError::Unauthorized("Could not validate credentials".to_string())
            }
            Failure::Server => ClientError::ApiError {
                status: 500,
                message: "Request failed with status 500".to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Calls {
    pub list_jobs: usize,
    pub get_job: usize,
    pub job_status: usize,
    pub list_addresses: usize,
    pub free_usage: usize,
}

#[derive(Debug, Default)]
struct Inner {
    jobs: Vec<Job>,
    statuses: HashMap<String, JobStatusReport>,
    addresses: HashMap<String, Vec<Address>>,
    usage: FreeUsage,
    list_failure: Option<Failure>,
    status_failures: HashMap<String, Failure>,
    calls: Calls,
    submitted: Vec<CreateJob>,
    deleted: Vec<String>,
    gate: Option<Arc<Notify>>,
}

/// Scriptable [`JobRepository`]
#[derive(Debug, Default)]
pub struct FakeRepository {
    inner: Mutex<Inner>,
}

impl FakeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn with<T>(&self, f: impl FnOnce(&mut Inner) -> T) -> T {
        f(&mut self.inner.lock().unwrap())
    }

    pub fn set_jobs(&self, jobs: Vec<Job>) {
        self.with(|i| i.jobs = jobs);
    }

    pub fn set_status(&self, job_id: &str, report: JobStatusReport) {
        self.with(|i| i.statuses.insert(job_id.to_string(), report));
    }

    pub fn set_addresses(&self, job_id: &str, addresses: Vec<Address>) {
        self.with(|i| i.addresses.insert(job_id.to_string(), addresses));
    }

    pub fn set_usage(&self, usage: FreeUsage) {
        self.with(|i| i.usage = usage);
    }

    pub fn fail_listing(&self, failure: Option<Failure>) {
        self.with(|i| i.list_failure = failure);
    }

    pub fn fail_status(&self, job_id: &str, failure: Failure) {
        self.with(|i| i.status_failures.insert(job_id.to_string(), failure));
    }

    /// Makes `list_jobs` wait until the returned gate is notified
    pub fn gate_listing(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.with(|i| i.gate = Some(Arc::clone(&gate)));
        gate
    }

    pub fn calls(&self) -> Calls {
        self.with(|i| i.calls)
    }

    pub fn submitted(&self) -> Vec<CreateJob> {
        self.with(|i| i.submitted.clone())
    }

    pub fn deleted(&self) -> Vec<String> {
        self.with(|i| i.deleted.clone())
    }
}

#[async_trait]
impl JobRepository for FakeRepository {
    fn base_url(&self) -> &str {
        "http://fake.test"
    }

    async fn list_jobs(&self) -> Result<Vec<Job>> {
        let gate = self.with(|i| {
            i.calls.list_jobs += 1;
            i.gate.take()
        });
        if let Some(gate) = gate {
            gate.notified().await;
        }

        self.with(|i| match i.list_failure {
            Some(failure) => Err(failure.error()),
            None => Ok(i.jobs.clone()),
        })
    }

    async fn get_job(&self, job_id: &str) -> Result<Job> {
        self.with(|i| {
            i.calls.get_job += 1;
            i.jobs
                .iter()
                .find(|j| j.id == job_id)
                .cloned()
                .ok_or(ClientError::ApiError {
                    status: 404,
                    message: "Job not found".to_string(),
                })
        })
    }

    async fn job_status(&self, job_id: &str) -> Result<JobStatusReport> {
        self.with(|i| {
            i.calls.job_status += 1;
            if let Some(failure) = i.status_failures.get(job_id) {
                return Err(failure.error());
            }
            Ok(i.statuses.get(job_id).cloned().unwrap_or_default())
        })
    }

    async fn list_addresses(&self, job_id: &str) -> Result<Vec<Address>> {
        self.with(|i| {
            i.calls.list_addresses += 1;
            Ok(i.addresses.get(job_id).cloned().unwrap_or_default())
        })
    }

    async fn submit_job(&self, req: &CreateJob) -> Result<Job> {
        self.with(|i| {
            i.submitted.push(req.clone());
            let mut created = job(
                &format!("new-{}", i.submitted.len()),
                JobStatus::Pending,
                Some(req.addresses.len() as u32),
                Some(0),
            );
            created.description = Some(req.description.clone());
            Ok(created)
        })
    }

    async fn delete_job(&self, job_id: &str) -> Result<()> {
        self.with(|i| {
            i.jobs.retain(|j| j.id != job_id);
            i.deleted.push(job_id.to_string());
            Ok(())
        })
    }

    async fn free_usage(&self) -> Result<FreeUsage> {
        self.with(|i| {
            i.calls.free_usage += 1;
            Ok(i.usage)
        })
    }
}
