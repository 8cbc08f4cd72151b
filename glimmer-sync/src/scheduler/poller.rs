//! Job poller
//!
//! Periodically lists the user's jobs, merges each job's status report and
//! resolves jobs that just completed into flyers. Each cycle fans out over
//! the jobs concurrently and publishes its results through the store, so
//! results of a session that ended mid-cycle are discarded.

use futures::future::join_all;
use glimmer_client::ClientError;
use glimmer_core::domain::job::{Job, JobStatus};
use glimmer_core::view::{SyncEvent, SyncState};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{self, Duration, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::error::{Result, SyncError};
use crate::repository::JobRepository;
use crate::service::resolver;
use crate::store::{SessionGuard, Store};

/// Message shown when the job list cannot be fetched
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch jobs";

/// Outcome of one poll cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Jobs listed by the backend
    pub jobs: usize,
    /// Completed jobs resolved into flyers this cycle
    pub resolved: usize,
    /// Whether the cycle was skipped because another one was in flight
    pub skipped: bool,
}

/// Job poller that keeps the store in step with the backend
pub struct JobPoller {
    poll_interval: Duration,
    repo: Arc<dyn JobRepository>,
    store: Arc<Store>,
    cycle: Mutex<()>,
}

impl JobPoller {
    /// Creates a new job poller
    pub fn new(poll_interval: Duration, repo: Arc<dyn JobRepository>, store: Arc<Store>) -> Self {
        Self {
            poll_interval,
            repo,
            store,
            cycle: Mutex::new(()),
        }
    }

    /// Polls until the session ends or the backend rejects it
    ///
    /// Transient failures are logged and retried on the next tick.
    pub async fn run(&self, guard: SessionGuard) -> Result<()> {
        info!(
            "Starting job poller (interval: {:?}, session {})",
            self.poll_interval,
            guard.generation()
        );

        let mut interval = time::interval(self.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = guard.cancelled() => break,
                _ = interval.tick() => {}
            }

            debug!("Polling jobs");

            let outcome = tokio::select! {
                biased;
                _ = guard.cancelled() => break,
                outcome = self.refresh_all(&guard) => outcome,
            };

            match outcome {
                Ok(report) => {
                    if report.resolved > 0 {
                        info!("Resolved {} completed job(s) this cycle", report.resolved);
                    }
                }
                Err(SyncError::SessionExpired) => {
                    warn!("Session expired, stopping job poller");
                    return Err(SyncError::SessionExpired);
                }
                Err(SyncError::Cancelled) => break,
                Err(e) => {
                    error!("Error during poll cycle: {}", e);
                }
            }
        }

        info!("Job poller stopped (session {})", guard.generation());
        Ok(())
    }

    /// Performs a single poll cycle
    ///
    /// A cycle that starts while another is still running is skipped.
    pub async fn refresh_all(&self, guard: &SessionGuard) -> Result<CycleReport> {
        let Ok(_cycle) = self.cycle.try_lock() else {
            debug!("Poll cycle already in flight, skipping");
            return Ok(CycleReport {
                skipped: true,
                ..CycleReport::default()
            });
        };

        let previous = self.store.snapshot();

        let listed = match self.repo.list_jobs().await {
            Ok(jobs) => jobs,
            Err(e) => return Err(self.handle_failure(guard, e)),
        };

        let jobs = self.merge_statuses(guard, listed).await?;
        let count = jobs.len();

        let to_resolve: Vec<Job> = jobs
            .iter()
            .filter(|job| needs_resolution(&previous, job))
            .cloned()
            .collect();

        if !self.store.dispatch(guard, SyncEvent::JobsRefreshed(jobs)) {
            return Err(SyncError::Cancelled);
        }

        let resolved = self.resolve_completed(guard, to_resolve).await?;

        Ok(CycleReport {
            jobs: count,
            resolved,
            skipped: false,
        })
    }

    /// Fetches every job's status report and merges it into the job
    ///
    /// A job whose report cannot be fetched keeps its listed fields.
    async fn merge_statuses(&self, guard: &SessionGuard, jobs: Vec<Job>) -> Result<Vec<Job>> {
        let reports = join_all(jobs.iter().map(|job| self.repo.job_status(&job.id))).await;

        let mut merged = Vec::with_capacity(jobs.len());
        for (job, report) in jobs.into_iter().zip(reports) {
            match report {
                Ok(report) => merged.push(job.with_status(&report)),
                Err(e) if e.is_auth_failure() => return Err(self.handle_failure(guard, e)),
                Err(e) => {
                    warn!("Failed to fetch status of job {}: {}", job.id, e);
                    merged.push(job);
                }
            }
        }
        Ok(merged)
    }

    /// Resolves newly completed jobs concurrently; returns how many were added
    async fn resolve_completed(&self, guard: &SessionGuard, jobs: Vec<Job>) -> Result<usize> {
        if jobs.is_empty() {
            return Ok(0);
        }

        let repo = self.repo.as_ref();
        let outcomes = join_all(jobs.iter().map(|job| resolver::resolve(repo, job))).await;

        let mut resolved = 0;
        for (job, outcome) in jobs.iter().zip(outcomes) {
            match outcome {
                Ok(Some(resolution)) => {
                    if !self.store.dispatch(guard, resolution.into_event()) {
                        return Err(SyncError::Cancelled);
                    }
                    resolved += 1;
                }
                Ok(None) => {}
                Err(e) if e.is_auth_failure() => return Err(self.handle_failure(guard, e)),
                Err(e) => warn!("Failed to resolve flyers of job {}: {}", job.id, e),
            }
        }
        Ok(resolved)
    }

    fn handle_failure(&self, guard: &SessionGuard, e: ClientError) -> SyncError {
        if e.is_auth_failure() {
            self.store.expire_session(guard);
            return SyncError::SessionExpired;
        }

        error!("Failed to fetch jobs: {}", e);
        self.store.dispatch(
            guard,
            SyncEvent::FetchFailed(FETCH_FAILED_MESSAGE.to_string()),
        );
        SyncError::Client(e)
    }
}

/// Whether `job` completed since `previous` was taken or never got resolved
fn needs_resolution(previous: &SyncState, job: &Job) -> bool {
    job.status == JobStatus::Completed
        && (previous.status_of(&job.id) != Some(JobStatus::Completed)
            || !previous.library.contains(&job.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeRepository, Failure, address, job, report};
    use glimmer_core::view::SESSION_EXPIRED_MESSAGE;

    fn poller(repo: &Arc<FakeRepository>) -> (JobPoller, Arc<Store>) {
        let store = Arc::new(Store::new());
        let repo: Arc<dyn JobRepository> = repo.clone();
        (
            JobPoller::new(Duration::from_millis(10), repo, Arc::clone(&store)),
            store,
        )
    }

    #[tokio::test]
    async fn test_job_completes_into_flyers() {
        let repo = Arc::new(FakeRepository::new());
        repo.set_jobs(vec![job("j1", JobStatus::Processing, Some(3), Some(1))]);
        repo.set_status("j1", report(JobStatus::Processing, 3, 1));
        repo.set_addresses(
            "j1",
            vec![
                address("a1", Some("Oak St"), "Oak St 1"),
                address("a2", Some("Oak St"), "Oak St 2"),
                address("a3", Some("Oak St"), "Oak St 3"),
            ],
        );

        let (poller, store) = poller(&repo);
        let guard = store.begin_session();

        let first = poller.refresh_all(&guard).await.unwrap();
        assert_eq!(first.resolved, 0);
        let state = store.snapshot();
        assert_eq!(state.jobs[0].progress_percent(), 33);
        assert!(state.library.is_empty());

        repo.set_status("j1", report(JobStatus::Completed, 3, 3));
        let second = poller.refresh_all(&guard).await.unwrap();
        assert_eq!(second.resolved, 1);

        let state = store.snapshot();
        let record = state.library.get("j1").unwrap();
        assert_eq!(record.streets["Oak St"].len(), 3);
        assert_eq!(state.jobs[0].progress_percent(), 100);
        assert_eq!(store.stats().total_flyers, 3);
        assert_eq!(store.stats().active_jobs, 0);
    }

    #[tokio::test]
    async fn test_completed_job_resolved_once() {
        let repo = Arc::new(FakeRepository::new());
        repo.set_jobs(vec![job("j1", JobStatus::Completed, Some(1), Some(1))]);
        repo.set_status("j1", report(JobStatus::Completed, 1, 1));
        repo.set_addresses("j1", vec![address("a1", Some("Oak St"), "Oak St 1")]);

        let (poller, store) = poller(&repo);
        let guard = store.begin_session();

        poller.refresh_all(&guard).await.unwrap();
        poller.refresh_all(&guard).await.unwrap();
        poller.refresh_all(&guard).await.unwrap();

        assert_eq!(repo.calls().list_addresses, 1);
        assert_eq!(store.snapshot().library.len(), 1);
    }

    #[tokio::test]
    async fn test_resolved_counts_kept_across_cycles() {
        let repo = Arc::new(FakeRepository::new());
        repo.set_jobs(vec![job("j1", JobStatus::Completed, Some(5), Some(4))]);
        repo.set_status("j1", report(JobStatus::Completed, 5, 4));
        repo.set_addresses(
            "j1",
            vec![
                address("a1", Some("Oak St"), "Oak St 1"),
                address("a2", Some("Oak St"), "Oak St 2"),
                address("a3", Some("Elm Ct"), "Elm Ct 3"),
            ],
        );

        let (poller, store) = poller(&repo);
        let guard = store.begin_session();

        poller.refresh_all(&guard).await.unwrap();
        let second = poller.refresh_all(&guard).await.unwrap();
        assert_eq!(second.resolved, 0);

        let state = store.snapshot();
        let j1 = state.job("j1").unwrap();
        assert_eq!(j1.total_addresses, Some(3));
        assert_eq!(j1.completed_addresses, Some(3));
        assert_eq!(j1.progress_percent(), 100);
        assert_eq!(repo.calls().list_addresses, 1);
    }

    #[tokio::test]
    async fn test_empty_completed_job_is_retried() {
        let repo = Arc::new(FakeRepository::new());
        repo.set_jobs(vec![job("j1", JobStatus::Completed, Some(0), Some(0))]);

        let (poller, store) = poller(&repo);
        let guard = store.begin_session();

        poller.refresh_all(&guard).await.unwrap();
        assert!(store.snapshot().library.is_empty());

        repo.set_addresses("j1", vec![address("a1", None, "Maple Ridge 47")]);
        poller.refresh_all(&guard).await.unwrap();

        let state = store.snapshot();
        assert!(state.library.get("j1").unwrap().streets.contains_key("Maple Ridge"));
    }

    #[tokio::test]
    async fn test_auth_failure_expires_session() {
        let repo = Arc::new(FakeRepository::new());
        repo.set_jobs(vec![job("j1", JobStatus::Queued, Some(1), Some(0))]);

        let (poller, store) = poller(&repo);
        let guard = store.begin_session();
        poller.refresh_all(&guard).await.unwrap();
        assert_eq!(store.snapshot().jobs.len(), 1);

        repo.fail_listing(Some(Failure::Unauthorized));
        let err = poller.refresh_all(&guard).await.unwrap_err();
        assert!(matches!(err, SyncError::SessionExpired));

        let state = store.snapshot();
        assert!(state.jobs.is_empty());
        assert!(state.library.is_empty());
        assert_eq!(state.error.as_deref(), Some(SESSION_EXPIRED_MESSAGE));
        assert!(guard.is_cancelled());
    }

    #[tokio::test]
    async fn test_auth_failure_on_status_expires_session() {
        let repo = Arc::new(FakeRepository::new());
        repo.set_jobs(vec![job("j1", JobStatus::Queued, Some(1), Some(0))]);
        repo.fail_status("j1", Failure::Unauthorized);

        let (poller, store) = poller(&repo);
        let guard = store.begin_session();

        let err = poller.refresh_all(&guard).await.unwrap_err();
        assert!(matches!(err, SyncError::SessionExpired));
        assert!(store.current_session().is_none());
    }

    #[tokio::test]
    async fn test_transient_failure_keeps_state() {
        let repo = Arc::new(FakeRepository::new());
        repo.set_jobs(vec![job("j1", JobStatus::Queued, Some(1), Some(0))]);

        let (poller, store) = poller(&repo);
        let guard = store.begin_session();
        poller.refresh_all(&guard).await.unwrap();

        repo.fail_listing(Some(Failure::Server));
        assert!(poller.refresh_all(&guard).await.is_err());

        let state = store.snapshot();
        assert_eq!(state.jobs.len(), 1);
        assert_eq!(state.error.as_deref(), Some(FETCH_FAILED_MESSAGE));

        repo.fail_listing(None);
        poller.refresh_all(&guard).await.unwrap();
        assert!(store.snapshot().error.is_none());
    }

    #[tokio::test]
    async fn test_status_failure_keeps_listed_job() {
        let repo = Arc::new(FakeRepository::new());
        repo.set_jobs(vec![
            job("j1", JobStatus::Queued, Some(2), Some(0)),
            job("j2", JobStatus::Queued, Some(2), Some(0)),
        ]);
        repo.set_status("j2", report(JobStatus::Processing, 2, 1));
        repo.fail_status("j1", Failure::Server);

        let (poller, store) = poller(&repo);
        let guard = store.begin_session();
        poller.refresh_all(&guard).await.unwrap();

        let state = store.snapshot();
        assert_eq!(state.status_of("j1"), Some(JobStatus::Queued));
        assert_eq!(state.status_of("j2"), Some(JobStatus::Processing));
    }

    #[tokio::test]
    async fn test_late_response_after_logout_is_discarded() {
        let repo = Arc::new(FakeRepository::new());
        repo.set_jobs(vec![job("j1", JobStatus::Queued, Some(1), Some(0))]);
        let gate = repo.gate_listing();

        let (poller, store) = poller(&repo);
        let poller = Arc::new(poller);
        let guard = store.begin_session();

        let task = {
            let poller = Arc::clone(&poller);
            let guard = guard.clone();
            tokio::spawn(async move { poller.refresh_all(&guard).await })
        };

        while repo.calls().list_jobs == 0 {
            tokio::task::yield_now().await;
        }
        store.end_session();
        gate.notify_one();

        let outcome = task.await.unwrap();
        assert!(matches!(outcome, Err(SyncError::Cancelled)));
        assert!(store.snapshot().jobs.is_empty());
    }

    #[tokio::test]
    async fn test_deleted_job_not_revived() {
        let repo = Arc::new(FakeRepository::new());
        repo.set_jobs(vec![
            job("j1", JobStatus::Queued, Some(1), Some(0)),
            job("j2", JobStatus::Queued, Some(1), Some(0)),
        ]);

        let (poller, store) = poller(&repo);
        let guard = store.begin_session();
        poller.refresh_all(&guard).await.unwrap();

        store.dispatch(&guard, SyncEvent::JobDeleted("j1".to_string()));
        poller.refresh_all(&guard).await.unwrap();

        let ids: Vec<String> = store.snapshot().jobs.into_iter().map(|j| j.id).collect();
        assert_eq!(ids, vec!["j2".to_string()]);
    }

    #[tokio::test]
    async fn test_run_stops_when_session_ends() {
        let repo = Arc::new(FakeRepository::new());
        let (poller, store) = poller(&repo);
        let guard = store.begin_session();

        let poller = Arc::new(poller);
        let task = {
            let poller = Arc::clone(&poller);
            tokio::spawn(async move { poller.run(guard).await })
        };

        while repo.calls().list_jobs < 2 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        store.end_session();

        assert!(task.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_run_returns_on_expiry() {
        let repo = Arc::new(FakeRepository::new());
        repo.fail_listing(Some(Failure::Unauthorized));
        let (poller, store) = poller(&repo);
        let guard = store.begin_session();

        let err = poller.run(guard).await.unwrap_err();
        assert!(matches!(err, SyncError::SessionExpired));
    }
}
