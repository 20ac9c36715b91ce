//! Student registration and profile operations.

use std::time::SystemTime;

use uuid::Uuid;

use crate::{
    dao::models::StudentEntity,
    dto::student::{RegisterStudentRequest, ResultSummary, StudentSummary},
    error::ServiceError,
    game::SharedState,
};

/// Register a student, or update the record when an id is supplied.
///
/// Registration is the precondition gate for starting sessions, so the
/// student is persisted before any gameplay can happen.
pub async fn register_student(
    state: &SharedState,
    request: RegisterStudentRequest,
) -> Result<StudentSummary, ServiceError> {
    let store = state.require_result_store().await?;

    let id = request.id.unwrap_or_else(Uuid::new_v4);
    let created_at = match request.id {
        // Keep the original registration date on re-registration.
        Some(existing_id) => store
            .find_student(existing_id)
            .await?
            .map(|existing| existing.created_at)
            .unwrap_or_else(SystemTime::now),
        None => SystemTime::now(),
    };

    let entity = StudentEntity {
        id,
        name: request.name.trim().to_string(),
        grade: request.grade,
        created_at,
    };

    store.save_student(entity.clone()).await?;

    Ok(entity.into())
}

/// Fetch a registered student by id.
pub async fn get_student(state: &SharedState, id: Uuid) -> Result<StudentSummary, ServiceError> {
    let store = state.require_result_store().await?;
    let Some(student) = store.find_student(id).await? else {
        return Err(ServiceError::NotFound(format!("student `{id}` not found")));
    };
    Ok(student.into())
}

/// List the historical results of one student, newest first.
pub async fn results_for_student(
    state: &SharedState,
    id: Uuid,
) -> Result<Vec<ResultSummary>, ServiceError> {
    let store = state.require_result_store().await?;

    if store.find_student(id).await?.is_none() {
        return Err(ServiceError::NotFound(format!("student `{id}` not found")));
    }

    let mut results = store.results_for_student(id).await?;
    results.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    Ok(results.into_iter().map(Into::into).collect())
}
