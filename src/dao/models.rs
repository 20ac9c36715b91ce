//! Database model definitions.

use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use uuid::Uuid;

use crate::game::problems::Difficulty;

/// Representation of a registered student stored in persistence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StudentEntity {
    /// Stable identifier for the student.
    pub id: Uuid,
    /// Display name chosen at registration.
    pub name: String,
    /// School grade level (6 through 9).
    pub grade: u8,
    /// Registration timestamp.
    pub created_at: SystemTime,
}

/// One finished session's result persisted by the storage layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameResultEntity {
    /// Primary key of the result record.
    pub id: Uuid,
    /// Student who played the session.
    pub student_id: Uuid,
    /// Tier the session ran at.
    pub difficulty: Difficulty,
    /// Number of correct connections.
    pub correct_answers: u32,
    /// Wall-clock duration of the session in whole seconds.
    pub total_time_seconds: u64,
    /// Final score per the scoring formula.
    pub score: u32,
    /// Completion timestamp.
    pub created_at: SystemTime,
}
