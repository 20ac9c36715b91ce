//! Server-sent event payloads.

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Clone, Debug)]
/// Dispatched payload carried across the SSE channel.
pub struct ServerEvent {
    /// Optional SSE event name.
    pub event: Option<String>,
    /// Serialized data field.
    pub data: String,
}

impl ServerEvent {
    /// Convenience wrapper that serialises `payload` into the SSE data field.
    pub fn json<E, T>(event: E, payload: &T) -> serde_json::Result<Self>
    where
        E: Into<Option<String>>,
        T: Serialize,
    {
        Ok(Self {
            event: event.into(),
            data: serde_json::to_string(payload)?,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
/// Initial metadata sent to an SSE client when it connects.
pub struct Handshake {
    /// Human-readable message confirming the subscription.
    pub message: String,
    /// Whether the backend is running without a storage backend connection.
    pub degraded: bool,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when the backend enters or leaves degraded mode.
pub struct SystemStatusEvent {
    /// Current degraded flag.
    pub degraded: bool,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast once per second while a session clock runs.
pub struct TickEvent {
    /// Session the tick belongs to.
    pub session_id: Uuid,
    /// Seconds elapsed since the session started.
    pub elapsed_seconds: u64,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when a connection is recorded, cueing client feedback.
pub struct FeedbackEvent {
    /// Session the attempt belongs to.
    pub session_id: Uuid,
    /// Whether the match was correct.
    pub is_correct: bool,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast once when a session completes.
pub struct SessionCompletedEvent {
    /// Session that completed.
    pub session_id: Uuid,
    /// Number of correct connections.
    pub correct_answers: u32,
    /// Session duration in seconds.
    pub total_time_seconds: u64,
    /// Final score.
    pub score: u32,
}
