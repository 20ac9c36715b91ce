//! Student registration and profile payloads.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::dao::models::{GameResultEntity, StudentEntity};
use crate::dto::{
    format_system_time,
    validation::{validate_grade_level, validate_student_name},
};
use crate::game::problems::Difficulty;

/// Payload used to register (or re-register) a student.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterStudentRequest {
    /// Display name.
    pub name: String,
    /// School grade level (6 through 9).
    pub grade: u8,
    /// Present when re-registering an existing student.
    #[serde(default)]
    #[schema(value_type = Option<Uuid>)]
    pub id: Option<Uuid>,
}

impl Validate for RegisterStudentRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(e) = validate_student_name(&self.name) {
            errors.add("name", e);
        }

        if let Err(e) = validate_grade_level(self.grade) {
            errors.add("grade", e);
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Public projection of a student exposed to REST clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StudentSummary {
    /// Stable identifier for the student.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// School grade level.
    pub grade: u8,
    /// Registration timestamp, RFC 3339.
    pub created_at: String,
}

impl From<StudentEntity> for StudentSummary {
    fn from(student: StudentEntity) -> Self {
        Self {
            id: student.id,
            name: student.name,
            grade: student.grade,
            created_at: format_system_time(student.created_at),
        }
    }
}

/// One historical result shown on the profile view.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ResultSummary {
    /// Identifier of the result record.
    pub id: Uuid,
    /// Tier the session ran at.
    pub difficulty: Difficulty,
    /// Number of correct connections.
    pub correct_answers: u32,
    /// Session duration in seconds.
    pub total_time_seconds: u64,
    /// Final score.
    pub score: u32,
    /// Completion timestamp, RFC 3339.
    pub created_at: String,
}

impl From<GameResultEntity> for ResultSummary {
    fn from(result: GameResultEntity) -> Self {
        Self {
            id: result.id,
            difficulty: result.difficulty,
            correct_answers: result.correct_answers,
            total_time_seconds: result.total_time_seconds,
            score: result.score,
            created_at: format_system_time(result.created_at),
        }
    }
}
