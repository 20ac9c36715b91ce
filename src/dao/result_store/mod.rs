//! Pluggable persistence for students and game results.

#[cfg(feature = "couch-store")]
pub mod couchdb;
#[cfg(all(feature = "file-store", feature = "couch-store"))]
mod fallback;
#[cfg(feature = "file-store")]
pub mod file;

#[cfg(all(feature = "file-store", feature = "couch-store"))]
pub use fallback::FallbackResultStore;

use futures::future::BoxFuture;
use uuid::Uuid;

use crate::dao::models::{GameResultEntity, StudentEntity};
use crate::dao::storage::StorageResult;

/// Abstraction over the persistence layer for students and session results.
pub trait ResultStore: Send + Sync {
    /// Upsert a student record.
    fn save_student(&self, student: StudentEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Fetch a student by id.
    fn find_student(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<StudentEntity>>>;
    /// List every registered student.
    fn list_students(&self) -> BoxFuture<'static, StorageResult<Vec<StudentEntity>>>;
    /// Persist one finished session's result.
    fn save_result(&self, result: GameResultEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// List the results recorded for one student.
    fn results_for_student(
        &self,
        student_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<GameResultEntity>>>;
    /// List every recorded result.
    fn list_results(&self) -> BoxFuture<'static, StorageResult<Vec<GameResultEntity>>>;
    /// Probe the backend for availability.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    /// Attempt to re-establish the backend connection.
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
