//! Typed constructors for the events broadcast on the public SSE stream.

use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::dto::sse::{
    FeedbackEvent, ServerEvent, SessionCompletedEvent, SystemStatusEvent, TickEvent,
};
use crate::game::SseHub;
use crate::game::session::GameResult;

const EVENT_TICK: &str = "session.tick";
const EVENT_FEEDBACK: &str = "session.feedback";
const EVENT_COMPLETED: &str = "session.completed";
const EVENT_SYSTEM_STATUS: &str = "system.status";

/// Broadcast the per-second clock update of a running session.
pub fn broadcast_tick(hub: &SseHub, session_id: Uuid, elapsed_seconds: u64) {
    let payload = TickEvent {
        session_id,
        elapsed_seconds,
    };
    send_event(hub, EVENT_TICK, &payload);
}

/// Broadcast the feedback cue for a recorded connection.
pub fn broadcast_feedback(hub: &SseHub, session_id: Uuid, is_correct: bool) {
    let payload = FeedbackEvent {
        session_id,
        is_correct,
    };
    send_event(hub, EVENT_FEEDBACK, &payload);
}

/// Broadcast the final numbers of a completed session.
pub fn broadcast_session_completed(hub: &SseHub, session_id: Uuid, result: &GameResult) {
    let payload = SessionCompletedEvent {
        session_id,
        correct_answers: result.correct_answers,
        total_time_seconds: result.total_time_seconds,
        score: result.score,
    };
    send_event(hub, EVENT_COMPLETED, &payload);
}

/// Broadcast a change of the degraded flag.
pub fn broadcast_system_status(hub: &SseHub, degraded: bool) {
    let payload = SystemStatusEvent { degraded };
    send_event(hub, EVENT_SYSTEM_STATUS, &payload);
}

fn send_event<T: Serialize>(hub: &SseHub, event: &str, payload: &T) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(server_event) => hub.broadcast(server_event),
        Err(err) => warn!(event, error = %err, "failed to serialize SSE payload"),
    }
}
