//! Ranking rows and query parameters.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::game::problems::Difficulty;

/// Query parameters accepted by the rankings endpoint.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct RankingQuery {
    /// Restrict the ranking to one grade level.
    pub grade: Option<u8>,
}

/// One row of the leaderboard, best scores first.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RankingRow {
    /// Student who earned the score.
    pub student_id: Uuid,
    /// Display name of the student.
    pub student_name: String,
    /// Grade level of the student.
    pub grade: u8,
    /// Score of the session.
    pub score: u32,
    /// Session duration in seconds (tie breaker, shorter wins).
    pub time: u64,
    /// Tier the session ran at.
    pub difficulty: Difficulty,
}
