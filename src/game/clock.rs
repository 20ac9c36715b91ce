//! One-second session clock task.

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::game::{SessionHandle, SseHub};
use crate::services::sse_events;

/// Owns the background tick task of a session.
///
/// The task updates the displayed elapsed seconds and broadcasts a tick event
/// once per second. It exits on its own when the session completes or is
/// dropped; aborting on [`Drop`] covers every other teardown path, so the
/// timer can never outlive its session.
pub struct SessionClock {
    handle: JoinHandle<()>,
}

impl SessionClock {
    /// Spawn the ticker for a session. The task holds only a weak reference,
    /// so it never keeps a removed session alive.
    pub fn spawn(session_id: Uuid, session: Weak<SessionHandle>, hub: Arc<SseHub>) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_secs(1));
            // The first tick resolves immediately; skip it so the initial
            // broadcast happens a full second into the session.
            ticker.tick().await;

            loop {
                ticker.tick().await;

                let Some(session) = session.upgrade() else {
                    break;
                };

                let elapsed = {
                    let mut guard = session.session().write().await;
                    if guard.is_completed() {
                        break;
                    }
                    guard.refresh_elapsed()
                };

                sse_events::broadcast_tick(&hub, session_id, elapsed);
            }
        });

        Self { handle }
    }

    /// Cancel the tick task.
    pub fn stop(&self) {
        self.handle.abort();
    }
}

impl Drop for SessionClock {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
