//! Session snapshots and gameplay requests.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dto::format_system_time;
use crate::game::problems::{Difficulty, Problem};
use crate::game::session::{Connection, MatchSession};

/// Payload used to start a new matching session.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSessionRequest {
    /// Registered student starting the session.
    pub student_id: Uuid,
    /// Tier to generate problems for.
    pub difficulty: Difficulty,
}

/// Payload toggling the problem selection.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SelectProblemRequest {
    /// Problem the student tapped.
    pub problem_id: Uuid,
}

/// Payload matching an answer token against the selected problem.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SelectAnswerRequest {
    /// Token picked from the answer pool.
    pub token: String,
}

/// A problem as shown on the board. The answer itself never leaves the
/// backend; clients only see the anonymous pool.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProblemView {
    /// Identifier used for selections.
    pub id: Uuid,
    /// Rendered statement, e.g. `"3 × 4 = ?"`.
    pub text: String,
}

impl From<&Problem> for ProblemView {
    fn from(problem: &Problem) -> Self {
        Self {
            id: problem.id,
            text: problem.text.clone(),
        }
    }
}

/// One recorded match attempt.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConnectionView {
    /// Problem the attempt was made against.
    pub problem_id: Uuid,
    /// Token the student picked.
    pub answer_token: String,
    /// Whether the match was correct.
    pub is_correct: bool,
}

impl From<&Connection> for ConnectionView {
    fn from(connection: &Connection) -> Self {
        Self {
            problem_id: connection.problem_id,
            answer_token: connection.answer_token.clone(),
            is_correct: connection.is_correct,
        }
    }
}

/// Full snapshot of a session as exposed to REST clients.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionSnapshot {
    /// Session identifier.
    pub id: Uuid,
    /// Student the session belongs to.
    pub student_id: Uuid,
    /// Tier the session runs at.
    pub difficulty: Difficulty,
    /// Problems in board order.
    pub problems: Vec<ProblemView>,
    /// Shuffled answer tokens.
    pub answer_pool: Vec<String>,
    /// Currently highlighted problem, if any.
    pub selected_problem: Option<Uuid>,
    /// Recorded connections in attempt order.
    pub connections: Vec<ConnectionView>,
    /// Seconds on the session clock.
    pub elapsed_seconds: u64,
    /// Final score; zero until completion.
    pub score: u32,
    /// Whether the session has completed.
    pub completed: bool,
    /// Creation timestamp, RFC 3339.
    pub created_at: String,
}

impl From<&MatchSession> for SessionSnapshot {
    fn from(session: &MatchSession) -> Self {
        Self {
            id: session.id(),
            student_id: session.student_id(),
            difficulty: session.difficulty(),
            problems: session.problems().map(Into::into).collect(),
            answer_pool: session.answer_pool().to_vec(),
            selected_problem: session.selected_problem(),
            connections: session.connections().iter().map(Into::into).collect(),
            elapsed_seconds: session.elapsed_seconds(),
            score: session.score(),
            completed: session.is_completed(),
            created_at: format_system_time(session.created_at()),
        }
    }
}

/// Selection state after a problem toggle.
#[derive(Debug, Serialize, ToSchema)]
pub struct SelectionResponse {
    /// Highlighted problem after the call, if any.
    pub selected_problem: Option<Uuid>,
}

/// Outcome of an answer selection.
#[derive(Debug, Serialize, ToSchema)]
pub struct MatchResponse {
    /// Whether a connection was recorded at all.
    pub recorded: bool,
    /// Correctness of the recorded connection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
    /// Whether the session is completed after this call.
    pub completed: bool,
    /// Final score, present once the session is completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
}
