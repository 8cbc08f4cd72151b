//! Dashboard session facade
//!
//! [`Dashboard`] ties one login to the store and the poller. Logging in
//! starts a fresh session, logging out or a rejected token ends it; every
//! operation runs under the session it started in.

use glimmer_client::credentials::FileCredentialStore;
use glimmer_client::{ClientError, CredentialStore, FlyerClient};
use glimmer_core::domain::job::Job;
use glimmer_core::domain::user::UserProfile;
use glimmer_core::dto::auth::RegisterUser;
use glimmer_core::view::{DashboardStats, SyncEvent, SyncState};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::SyncConfig;
use crate::error::{Result, SyncError};
use crate::repository::{HttpJobRepository, JobRepository};
use crate::scheduler::{CycleReport, JobPoller};
use crate::service::campaign::{self, Campaign};
use crate::store::{SessionGuard, Store};

/// One user's live view of their jobs and flyers
pub struct Dashboard {
    config: SyncConfig,
    client: FlyerClient,
    repo: Arc<dyn JobRepository>,
    store: Arc<Store>,
    poller: Arc<JobPoller>,
    poll_task: Mutex<Option<JoinHandle<()>>>,
}

impl Dashboard {
    /// Creates a dashboard backed by the HTTP repository
    pub fn new(config: SyncConfig, client: FlyerClient) -> Self {
        let repo = Arc::new(HttpJobRepository::new(client.clone()));
        Self::with_repository(config, client, repo)
    }

    /// Creates a dashboard reading jobs through `repo`
    pub fn with_repository(
        config: SyncConfig,
        client: FlyerClient,
        repo: Arc<dyn JobRepository>,
    ) -> Self {
        let store = Arc::new(Store::new());
        let poller = Arc::new(JobPoller::new(
            config.poll_interval,
            Arc::clone(&repo),
            Arc::clone(&store),
        ));

        Self {
            config,
            client,
            repo,
            store,
            poller,
            poll_task: Mutex::new(None),
        }
    }

    /// Builds the HTTP client and file credential store described by `config`
    pub fn from_config(config: SyncConfig) -> Result<Self> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(ClientError::from)?;
        let credentials: Arc<dyn CredentialStore> =
            Arc::new(FileCredentialStore::new(config.credentials_path.clone()));
        let client = FlyerClient::with_client(config.api_url.clone(), http, credentials);

        Ok(Self::new(config, client))
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn client(&self) -> &FlyerClient {
        &self.client
    }

    // =============================================================================
    // Session lifecycle
    // =============================================================================

    /// Logs in and starts a new session
    pub async fn login(&self, username: &str, password: &str) -> Result<SessionGuard> {
        self.stop_polling();
        self.client.login(username, password).await?;
        Ok(self.store.begin_session())
    }

    /// Creates an account, then logs in with it
    pub async fn register(&self, req: &RegisterUser) -> Result<(UserProfile, SessionGuard)> {
        let profile = self.client.register(req).await?;
        info!("Registered {}", profile.username);
        let guard = self.login(&req.username, &req.password).await?;
        Ok((profile, guard))
    }

    /// Ends the session: stops polling, clears state and stored credentials
    pub fn logout(&self) -> Result<()> {
        self.stop_polling();
        self.store.end_session();
        self.client.logout()?;
        Ok(())
    }

    /// Session of the stored credentials, starting one if needed
    pub fn resume(&self) -> Result<SessionGuard> {
        if !self.client.is_logged_in() {
            return Err(SyncError::NotLoggedIn);
        }

        Ok(match self.store.current_session() {
            Some(guard) => guard,
            None => self.store.begin_session(),
        })
    }

    /// Spawns the poller for the current session
    ///
    /// The task stops on logout; if the backend rejects the token it also
    /// clears the stored credentials.
    pub fn start(&self) -> Result<SessionGuard> {
        let guard = self.resume()?;
        self.stop_polling();

        let poller = Arc::clone(&self.poller);
        let client = self.client.clone();
        let task_guard = guard.clone();
        let handle = tokio::spawn(async move {
            if let Err(SyncError::SessionExpired) = poller.run(task_guard).await {
                if let Err(e) = client.clear_credentials() {
                    warn!("Failed to clear credentials after expiry: {}", e);
                }
            }
        });

        *self.task_slot() = Some(handle);
        Ok(guard)
    }

    fn task_slot(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.poll_task.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn stop_polling(&self) {
        if let Some(handle) = self.task_slot().take() {
            handle.abort();
        }
    }

    /// Ends `guard`'s session if `e` is an authentication failure
    fn check_auth(&self, guard: &SessionGuard, e: SyncError) -> SyncError {
        if !e.is_auth_failure() {
            return e;
        }

        self.store.expire_session(guard);
        if let Err(clear) = self.client.clear_credentials() {
            warn!("Failed to clear credentials after expiry: {}", clear);
        }
        SyncError::SessionExpired
    }

    // =============================================================================
    // Operations
    // =============================================================================

    /// Runs one poll cycle now
    pub async fn refresh_once(&self) -> Result<CycleReport> {
        let guard = self.resume()?;
        self.poller
            .refresh_all(&guard)
            .await
            .map_err(|e| self.check_auth(&guard, e))
    }

    /// Deletes a job; it will not reappear from later listings
    pub async fn delete_job(&self, job_id: &str) -> Result<()> {
        let guard = self.resume()?;
        self.repo
            .delete_job(job_id)
            .await
            .map_err(|e| self.check_auth(&guard, e.into()))?;

        info!("Deleted job {}", job_id);
        if !self
            .store
            .dispatch(&guard, SyncEvent::JobDeleted(job_id.to_string()))
        {
            return Err(SyncError::Cancelled);
        }
        Ok(())
    }

    /// Validates and submits a campaign under the configured quota policy
    pub async fn submit_campaign(&self, campaign: &Campaign) -> Result<Job> {
        let guard = self.resume()?;
        let job =
            campaign::submit_campaign(self.repo.as_ref(), campaign, self.config.quota_policy)
                .await
                .map_err(|e| self.check_auth(&guard, e))?;

        if !self.store.dispatch(&guard, SyncEvent::JobSubmitted(job.clone())) {
            return Err(SyncError::Cancelled);
        }
        Ok(job)
    }

    // =============================================================================
    // Readers
    // =============================================================================

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<SyncState> {
        self.store.subscribe()
    }

    pub fn snapshot(&self) -> SyncState {
        self.store.snapshot()
    }

    pub fn stats(&self) -> DashboardStats {
        self.store.stats()
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        self.stop_polling();
    }
}
