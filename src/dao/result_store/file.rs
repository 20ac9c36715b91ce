//! Local durable JSON store: one file per collection under a data directory.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tokio::fs;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::dao::models::{GameResultEntity, StudentEntity};
use crate::dao::result_store::ResultStore;
use crate::dao::storage::{StorageError, StorageResult};

const STUDENTS_FILE: &str = "students.json";
const RESULTS_FILE: &str = "results.json";

/// Convenient result alias returning [`FileDaoError`] failures.
pub type FileResult<T> = Result<T, FileDaoError>;

/// Failures that can occur while reading or writing the JSON collections.
#[derive(Debug, Error)]
pub enum FileDaoError {
    /// Filesystem access failed.
    #[error("failed to access `{path}`")]
    Io {
        /// File or directory the operation ran against.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// A collection could not be serialized to JSON.
    #[error("failed to encode `{path}`")]
    Encode {
        /// Destination file.
        path: PathBuf,
        /// Underlying serializer failure.
        #[source]
        source: serde_json::Error,
    },
    /// A collection file holds malformed JSON.
    #[error("failed to decode `{path}`")]
    Decode {
        /// Source file.
        path: PathBuf,
        /// Underlying parser failure.
        #[source]
        source: serde_json::Error,
    },
}

impl From<FileDaoError> for StorageError {
    fn from(err: FileDaoError) -> Self {
        StorageError::unavailable(err.to_string(), err)
    }
}

/// Result store backed by JSON files on the local filesystem.
///
/// Writes land in a temporary file first and are renamed into place, so a
/// crash mid-write never corrupts a collection. A single async mutex
/// serializes the read-modify-write cycles.
#[derive(Clone)]
pub struct FileResultStore {
    dir: Arc<PathBuf>,
    write_gate: Arc<Mutex<()>>,
}

impl FileResultStore {
    /// Open the store rooted at `dir`, creating the directory when missing.
    pub async fn open(dir: impl Into<PathBuf>) -> FileResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .await
            .map_err(|source| FileDaoError::Io {
                path: dir.clone(),
                source,
            })?;

        Ok(Self {
            dir: Arc::new(dir),
            write_gate: Arc::new(Mutex::new(())),
        })
    }

    fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    /// Read a whole collection; a missing file is an empty collection.
    async fn read_collection<T: DeserializeOwned>(&self, file: &str) -> FileResult<Vec<T>> {
        let path = self.path(file);
        match fs::read(&path).await {
            Ok(bytes) => {
                serde_json::from_slice(&bytes).map_err(|source| FileDaoError::Decode { path, source })
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(source) => Err(FileDaoError::Io { path, source }),
        }
    }

    /// Replace a collection atomically: write to a sibling temp file, then
    /// rename over the target.
    async fn write_collection<T: Serialize>(&self, file: &str, items: &[T]) -> FileResult<()> {
        let path = self.path(file);
        let bytes =
            serde_json::to_vec_pretty(items).map_err(|source| FileDaoError::Encode {
                path: path.clone(),
                source,
            })?;

        let staging = path.with_extension("json.tmp");
        fs::write(&staging, &bytes)
            .await
            .map_err(|source| FileDaoError::Io {
                path: staging.clone(),
                source,
            })?;
        fs::rename(&staging, &path)
            .await
            .map_err(|source| FileDaoError::Io { path, source })?;

        Ok(())
    }

    async fn upsert_student(&self, student: StudentEntity) -> FileResult<()> {
        let _gate = self.write_gate.lock().await;
        let mut students: Vec<StudentEntity> = self.read_collection(STUDENTS_FILE).await?;
        match students.iter_mut().find(|s| s.id == student.id) {
            Some(slot) => *slot = student,
            None => students.push(student),
        }
        self.write_collection(STUDENTS_FILE, &students).await
    }

    async fn upsert_result(&self, result: GameResultEntity) -> FileResult<()> {
        let _gate = self.write_gate.lock().await;
        let mut results: Vec<GameResultEntity> = self.read_collection(RESULTS_FILE).await?;
        match results.iter_mut().find(|r| r.id == result.id) {
            Some(slot) => *slot = result,
            None => results.push(result),
        }
        self.write_collection(RESULTS_FILE, &results).await
    }
}

impl ResultStore for FileResultStore {
    fn save_student(&self, student: StudentEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.upsert_student(student).await.map_err(Into::into) })
    }

    fn find_student(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<StudentEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let students: Vec<StudentEntity> = store.read_collection(STUDENTS_FILE).await?;
            Ok(students.into_iter().find(|s| s.id == id))
        })
    }

    fn list_students(&self) -> BoxFuture<'static, StorageResult<Vec<StudentEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.read_collection(STUDENTS_FILE).await?) })
    }

    fn save_result(&self, result: GameResultEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.upsert_result(result).await.map_err(Into::into) })
    }

    fn results_for_student(
        &self,
        student_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<GameResultEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let results: Vec<GameResultEntity> = store.read_collection(RESULTS_FILE).await?;
            Ok(results
                .into_iter()
                .filter(|r| r.student_id == student_id)
                .collect())
        })
    }

    fn list_results(&self) -> BoxFuture<'static, StorageResult<Vec<GameResultEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.read_collection(RESULTS_FILE).await?) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            fs::metadata(store.dir.as_ref())
                .await
                .map_err(|source| FileDaoError::Io {
                    path: store.dir.as_ref().clone(),
                    source,
                })?;
            Ok(())
        })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            fs::create_dir_all(store.dir.as_ref())
                .await
                .map_err(|source| FileDaoError::Io {
                    path: store.dir.as_ref().clone(),
                    source,
                })?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use crate::game::problems::Difficulty;

    use super::*;

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("mestres-file-store-{}", Uuid::new_v4()))
    }

    fn student(name: &str, grade: u8) -> StudentEntity {
        StudentEntity {
            id: Uuid::new_v4(),
            name: name.into(),
            grade,
            created_at: SystemTime::now(),
        }
    }

    fn result(student_id: Uuid, score: u32) -> GameResultEntity {
        GameResultEntity {
            id: Uuid::new_v4(),
            student_id,
            difficulty: Difficulty::Medium,
            correct_answers: 7,
            total_time_seconds: 130,
            score,
            created_at: SystemTime::now(),
        }
    }

    #[tokio::test]
    async fn students_round_trip_and_upsert() {
        let dir = scratch_dir();
        let store = FileResultStore::open(&dir).await.unwrap();

        let mut ana = student("Ana", 6);
        store.save_student(ana.clone()).await.unwrap();
        store.save_student(student("Bruno", 7)).await.unwrap();

        ana.grade = 7;
        store.save_student(ana.clone()).await.unwrap();

        let found = store.find_student(ana.id).await.unwrap().unwrap();
        assert_eq!(found.grade, 7);
        assert_eq!(store.list_students().await.unwrap().len(), 2);

        let _ = fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn results_survive_a_reopen() {
        let dir = scratch_dir();
        let student_id = Uuid::new_v4();

        {
            let store = FileResultStore::open(&dir).await.unwrap();
            store.save_result(result(student_id, 1_535)).await.unwrap();
            store.save_result(result(Uuid::new_v4(), 295)).await.unwrap();
        }

        let reopened = FileResultStore::open(&dir).await.unwrap();
        let mine = reopened.results_for_student(student_id).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].score, 1_535);
        assert_eq!(reopened.list_results().await.unwrap().len(), 2);

        let _ = fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn missing_collections_read_as_empty() {
        let dir = scratch_dir();
        let store = FileResultStore::open(&dir).await.unwrap();

        assert!(store.list_students().await.unwrap().is_empty());
        assert!(store.find_student(Uuid::new_v4()).await.unwrap().is_none());
        store.health_check().await.unwrap();

        let _ = fs::remove_dir_all(&dir).await;
    }
}
