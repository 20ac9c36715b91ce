//! Document shapes stored in CouchDB.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::dao::models::{GameResultEntity, StudentEntity};
use crate::game::problems::Difficulty;

pub const STUDENT_PREFIX: &str = "student::";
pub const RESULT_PREFIX: &str = "result::";
pub const END_SUFFIX: &str = "\u{ffff}";

#[derive(Debug, Deserialize)]
pub struct AllDocsResponse {
    pub rows: Vec<AllDocsRow>,
}

#[derive(Debug, Deserialize)]
pub struct AllDocsRow {
    #[serde(default)]
    pub doc: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouchStudentDocument {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_rev", skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    #[serde(flatten)]
    pub student: StudentBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentBody {
    pub student_id: Uuid,
    pub name: String,
    pub grade: u8,
    pub created_at: SystemTime,
}

impl From<(StudentEntity, Option<String>)> for CouchStudentDocument {
    fn from((student, rev): (StudentEntity, Option<String>)) -> Self {
        Self {
            id: student_doc_id(student.id),
            rev,
            student: StudentBody {
                student_id: student.id,
                name: student.name,
                grade: student.grade,
                created_at: student.created_at,
            },
        }
    }
}

impl From<CouchStudentDocument> for StudentEntity {
    fn from(doc: CouchStudentDocument) -> Self {
        Self {
            id: doc.student.student_id,
            name: doc.student.name,
            grade: doc.student.grade,
            created_at: doc.student.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouchResultDocument {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_rev", skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    #[serde(flatten)]
    pub result: ResultBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultBody {
    pub result_id: Uuid,
    pub student_id: Uuid,
    pub difficulty: Difficulty,
    pub correct_answers: u32,
    pub total_time_seconds: u64,
    pub score: u32,
    pub created_at: SystemTime,
}

impl From<(GameResultEntity, Option<String>)> for CouchResultDocument {
    fn from((result, rev): (GameResultEntity, Option<String>)) -> Self {
        Self {
            id: result_doc_id(result.id),
            rev,
            result: ResultBody {
                result_id: result.id,
                student_id: result.student_id,
                difficulty: result.difficulty,
                correct_answers: result.correct_answers,
                total_time_seconds: result.total_time_seconds,
                score: result.score,
                created_at: result.created_at,
            },
        }
    }
}

impl From<CouchResultDocument> for GameResultEntity {
    fn from(doc: CouchResultDocument) -> Self {
        Self {
            id: doc.result.result_id,
            student_id: doc.result.student_id,
            difficulty: doc.result.difficulty,
            correct_answers: doc.result.correct_answers,
            total_time_seconds: doc.result.total_time_seconds,
            score: doc.result.score,
            created_at: doc.result.created_at,
        }
    }
}

pub fn student_doc_id(id: Uuid) -> String {
    format!("{STUDENT_PREFIX}{id}")
}

pub fn result_doc_id(id: Uuid) -> String {
    format!("{RESULT_PREFIX}{id}")
}
