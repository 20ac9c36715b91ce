//! Remote store with a local durable fallback.

use std::sync::Arc;

use futures::future::BoxFuture;
use tracing::warn;
use uuid::Uuid;

use crate::dao::models::{GameResultEntity, StudentEntity};
use crate::dao::result_store::ResultStore;
use crate::dao::storage::StorageResult;

/// Composite store that prefers a remote backend and degrades to a local one.
///
/// Writes land in the remote store when it answers and fall back to the local
/// store otherwise, so a remote outage never loses a finished session. Reads
/// follow the same order. Health and reconnection report on the remote side,
/// which drives the supervisor's degraded flag.
pub struct FallbackResultStore {
    remote: Arc<dyn ResultStore>,
    local: Arc<dyn ResultStore>,
}

impl FallbackResultStore {
    /// Combine a remote store with its local fallback.
    pub fn new(remote: Arc<dyn ResultStore>, local: Arc<dyn ResultStore>) -> Self {
        Self { remote, local }
    }
}

impl ResultStore for FallbackResultStore {
    fn save_student(&self, student: StudentEntity) -> BoxFuture<'static, StorageResult<()>> {
        let remote = self.remote.clone();
        let local = self.local.clone();
        Box::pin(async move {
            match remote.save_student(student.clone()).await {
                Ok(()) => Ok(()),
                Err(err) => {
                    warn!(error = %err, "remote student save failed; writing to local fallback");
                    local.save_student(student).await
                }
            }
        })
    }

    fn find_student(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<StudentEntity>>> {
        let remote = self.remote.clone();
        let local = self.local.clone();
        Box::pin(async move {
            match remote.find_student(id).await {
                Ok(found) => Ok(found),
                Err(err) => {
                    warn!(error = %err, "remote student lookup failed; reading local fallback");
                    local.find_student(id).await
                }
            }
        })
    }

    fn list_students(&self) -> BoxFuture<'static, StorageResult<Vec<StudentEntity>>> {
        let remote = self.remote.clone();
        let local = self.local.clone();
        Box::pin(async move {
            match remote.list_students().await {
                Ok(students) => Ok(students),
                Err(err) => {
                    warn!(error = %err, "remote student listing failed; reading local fallback");
                    local.list_students().await
                }
            }
        })
    }

    fn save_result(&self, result: GameResultEntity) -> BoxFuture<'static, StorageResult<()>> {
        let remote = self.remote.clone();
        let local = self.local.clone();
        Box::pin(async move {
            match remote.save_result(result.clone()).await {
                Ok(()) => Ok(()),
                Err(err) => {
                    warn!(error = %err, "remote result save failed; writing to local fallback");
                    local.save_result(result).await
                }
            }
        })
    }

    fn results_for_student(
        &self,
        student_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<GameResultEntity>>> {
        let remote = self.remote.clone();
        let local = self.local.clone();
        Box::pin(async move {
            match remote.results_for_student(student_id).await {
                Ok(results) => Ok(results),
                Err(err) => {
                    warn!(error = %err, "remote result listing failed; reading local fallback");
                    local.results_for_student(student_id).await
                }
            }
        })
    }

    fn list_results(&self) -> BoxFuture<'static, StorageResult<Vec<GameResultEntity>>> {
        let remote = self.remote.clone();
        let local = self.local.clone();
        Box::pin(async move {
            match remote.list_results().await {
                Ok(results) => Ok(results),
                Err(err) => {
                    warn!(error = %err, "remote result listing failed; reading local fallback");
                    local.list_results().await
                }
            }
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let remote = self.remote.clone();
        Box::pin(async move { remote.health_check().await })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let remote = self.remote.clone();
        Box::pin(async move { remote.try_reconnect().await })
    }
}
