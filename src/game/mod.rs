//! Shared application state and the session engine modules.

pub mod clock;
pub mod feedback;
pub mod problems;
pub mod scoring;
pub mod session;
mod sse;
pub mod state_machine;

use std::sync::{Arc, Mutex};

use dashmap::DashMap;
use tokio::sync::{RwLock, watch};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::dao::result_store::ResultStore;
use crate::error::ServiceError;
use crate::game::clock::SessionClock;
use crate::game::session::MatchSession;

pub use self::sse::SseHub;

/// Cheaply cloneable handle on the central application state.
pub type SharedState = Arc<AppState>;

/// One live session together with its clock task.
pub struct SessionHandle {
    session: RwLock<MatchSession>,
    clock: Mutex<Option<SessionClock>>,
}

impl SessionHandle {
    /// Wrap a freshly started session. The clock is installed separately
    /// because its task needs a weak reference back to this handle.
    pub fn new(session: MatchSession) -> Arc<Self> {
        Arc::new(Self {
            session: RwLock::new(session),
            clock: Mutex::new(None),
        })
    }

    /// Lock guarding the session state.
    pub fn session(&self) -> &RwLock<MatchSession> {
        &self.session
    }

    /// Attach the spawned clock task, releasing any previous one.
    pub fn install_clock(&self, clock: SessionClock) {
        if let Ok(mut slot) = self.clock.lock() {
            *slot = Some(clock);
        }
    }

    /// Abort and drop the clock task, if one is still running.
    pub fn stop_clock(&self) {
        if let Ok(mut slot) = self.clock.lock() {
            if let Some(clock) = slot.take() {
                clock.stop();
            }
        }
    }
}

/// Central application state storing live sessions and the storage handle.
pub struct AppState {
    config: AppConfig,
    sessions: DashMap<Uuid, Arc<SessionHandle>>,
    result_store: RwLock<Option<Arc<dyn ResultStore>>>,
    sse: Arc<SseHub>,
    degraded: watch::Sender<bool>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The application starts in degraded mode until a result store is installed.
    pub fn new(config: AppConfig) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        Arc::new(Self {
            config,
            sessions: DashMap::new(),
            result_store: RwLock::new(None),
            sse: Arc::new(SseHub::new(16)),
            degraded: degraded_tx,
        })
    }

    /// Immutable runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Obtain a handle to the current result store, if one is installed.
    pub async fn result_store(&self) -> Option<Arc<dyn ResultStore>> {
        let guard = self.result_store.read().await;
        guard.as_ref().cloned()
    }

    /// Result store handle, or a degraded-mode error when none is installed.
    pub async fn require_result_store(&self) -> Result<Arc<dyn ResultStore>, ServiceError> {
        self.result_store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a new result store implementation and leave degraded mode.
    pub async fn set_result_store(&self, store: Arc<dyn ResultStore>) {
        {
            let mut guard = self.result_store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false);
    }

    /// Remove the current result store and enter degraded mode.
    pub async fn clear_result_store(&self) {
        {
            let mut guard = self.result_store.write().await;
            guard.take();
        }
        self.update_degraded(true);
    }

    /// Current degraded flag. Set while no store is installed, and while an
    /// installed store is failing its health checks.
    pub fn is_degraded(&self) -> bool {
        *self.degraded.borrow()
    }

    /// Subscribe to degraded mode updates.
    pub fn degraded_watcher(&self) -> watch::Receiver<bool> {
        self.degraded.subscribe()
    }

    /// Broadcast hub used for the public SSE stream.
    pub fn sse(&self) -> &Arc<SseHub> {
        &self.sse
    }

    /// Register a live session.
    pub fn insert_session(&self, id: Uuid, handle: Arc<SessionHandle>) {
        self.sessions.insert(id, handle);
    }

    /// Look up a live session by id.
    pub fn session(&self, id: Uuid) -> Option<Arc<SessionHandle>> {
        self.sessions.get(&id).map(|entry| entry.value().clone())
    }

    /// Drop a session, stopping its clock on the way out.
    pub fn remove_session(&self, id: Uuid) -> Option<Arc<SessionHandle>> {
        let (_, handle) = self.sessions.remove(&id)?;
        handle.stop_clock();
        Some(handle)
    }

    /// Broadcast the degraded flag when the value changes.
    pub fn update_degraded(&self, value: bool) {
        self.degraded.send_if_modified(|current| {
            if *current == value {
                false
            } else {
                *current = value;
                true
            }
        });
    }
}
