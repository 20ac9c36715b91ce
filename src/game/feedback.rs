//! Match feedback capability injected into the session engine.
//!
//! The engine never reaches for ambient global state to signal a match
//! outcome; whoever constructs a session supplies an implementation of
//! [`FeedbackNotifier`]. The production notifier fans the cue out over the
//! SSE stream so clients can play their sounds; tests inject a recorder.

use std::sync::Arc;

use uuid::Uuid;

use crate::game::SseHub;
use crate::services::sse_events;

/// Capability invoked once per recorded connection.
pub trait FeedbackNotifier: Send + Sync {
    /// The recorded connection matched the right answer.
    fn notify_correct(&self);
    /// The recorded connection was wrong.
    fn notify_incorrect(&self);
}

/// Notifier that broadcasts the cue on the public SSE stream.
pub struct SseFeedback {
    hub: Arc<SseHub>,
    session_id: Uuid,
}

impl SseFeedback {
    /// Bind a notifier to a session and the shared event hub.
    pub fn new(hub: Arc<SseHub>, session_id: Uuid) -> Self {
        Self { hub, session_id }
    }
}

impl FeedbackNotifier for SseFeedback {
    fn notify_correct(&self) {
        sse_events::broadcast_feedback(&self.hub, self.session_id, true);
    }

    fn notify_incorrect(&self) {
        sse_events::broadcast_feedback(&self.hub, self.session_id, false);
    }
}

/// Notifier that swallows every cue. Used where no client is listening.
pub struct SilentFeedback;

impl FeedbackNotifier for SilentFeedback {
    fn notify_correct(&self) {}

    fn notify_incorrect(&self) {}
}
