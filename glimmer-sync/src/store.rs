//! Session-guarded state store
//!
//! Owns the single [`SyncState`] of the process. Producers never mutate it
//! directly: they dispatch [`SyncEvent`]s together with the [`SessionGuard`]
//! they were started under, and the store applies the reducer only while
//! that session is still the current one. Results of requests that were in
//! flight when the user logged out are therefore dropped.
//!
//! Readers subscribe to a `watch` channel and always see whole states.

use glimmer_core::view::{DashboardStats, SyncEvent, SyncState};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Proof that work was started under a particular session
#[derive(Debug, Clone)]
pub struct SessionGuard {
    generation: u64,
    token: CancellationToken,
}

impl SessionGuard {
    /// Whether the session has ended
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Completes when the session ends
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Default)]
struct SessionSlot {
    generation: u64,
    token: Option<CancellationToken>,
}

impl SessionSlot {
    fn is_current(&self, guard: &SessionGuard) -> bool {
        self.generation == guard.generation && !guard.token.is_cancelled() && self.token.is_some()
    }

    /// Cancels the current session, if any, and moves to a new generation
    fn close(&mut self) {
        if let Some(token) = self.token.take() {
            token.cancel();
        }
        self.generation += 1;
    }
}

/// Owner of the process-wide dashboard state
#[derive(Debug)]
pub struct Store {
    state: watch::Sender<SyncState>,
    session: Mutex<SessionSlot>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        let (state, _) = watch::channel(SyncState::default());
        Self {
            state,
            session: Mutex::new(SessionSlot::default()),
        }
    }

    fn slot(&self) -> MutexGuard<'_, SessionSlot> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn replace(&self, event: SyncEvent) {
        self.state.send_modify(|state| {
            let current = std::mem::take(state);
            *state = current.apply(event);
        });
    }

    /// Starts a new session, ending any previous one and clearing state
    pub fn begin_session(&self) -> SessionGuard {
        let mut slot = self.slot();
        slot.close();

        let token = CancellationToken::new();
        slot.token = Some(token.clone());
        self.replace(SyncEvent::SessionEnded);

        info!("Session {} started", slot.generation);
        SessionGuard {
            generation: slot.generation,
            token,
        }
    }

    /// Guard of the running session, if any
    pub fn current_session(&self) -> Option<SessionGuard> {
        let slot = self.slot();
        slot.token.as_ref().map(|token| SessionGuard {
            generation: slot.generation,
            token: token.clone(),
        })
    }

    /// Ends the session on logout; all state is cleared
    pub fn end_session(&self) {
        let mut slot = self.slot();
        slot.close();
        self.replace(SyncEvent::SessionEnded);
        info!("Session ended");
    }

    /// Ends `guard`'s session because the backend rejected its token
    ///
    /// Returns `false` when that session had already ended.
    pub fn expire_session(&self, guard: &SessionGuard) -> bool {
        let mut slot = self.slot();
        if !slot.is_current(guard) {
            return false;
        }
        slot.close();
        self.replace(SyncEvent::SessionExpired);
        warn!("Session {} expired", guard.generation);
        true
    }

    /// Applies `event` if `guard`'s session is still current
    ///
    /// Returns `false`, discarding the event, otherwise.
    pub fn dispatch(&self, guard: &SessionGuard, event: SyncEvent) -> bool {
        let slot = self.slot();
        if !slot.is_current(guard) {
            debug!(
                "Discarding event from ended session {} (current {})",
                guard.generation, slot.generation
            );
            return false;
        }
        self.replace(event);
        true
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> SyncState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<SyncState> {
        self.state.subscribe()
    }

    pub fn stats(&self) -> DashboardStats {
        DashboardStats::from(&*self.state.borrow())
    }
}
