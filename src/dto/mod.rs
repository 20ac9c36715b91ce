//! Request/response types exchanged with clients.

use std::time::SystemTime;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// Health endpoint payloads.
pub mod health;
/// Ranking rows and query parameters.
pub mod ranking;
/// Session snapshots and gameplay requests.
pub mod session;
/// Server-sent event payloads.
pub mod sse;
/// Student registration and profile payloads.
pub mod student;
/// Validation helpers shared by the DTOs.
pub mod validation;

fn format_system_time(time: SystemTime) -> String {
    OffsetDateTime::from(time)
        .format(&Rfc3339)
        .unwrap_or_else(|_| "invalid-timestamp".into())
}
