//! Student registration and profile routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::student::{RegisterStudentRequest, ResultSummary, StudentSummary},
    error::AppError,
    game::SharedState,
    services::student_service,
};

/// Routes handling student registration and profile data.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/students", post(register_student))
        .route("/students/{id}", get(get_student))
        .route("/students/{id}/results", get(student_results))
}

#[utoipa::path(
    post,
    path = "/students",
    tag = "students",
    request_body = RegisterStudentRequest,
    responses(
        (status = 200, description = "Student registered", body = StudentSummary)
    )
)]
/// Register a student or update an existing registration.
pub async fn register_student(
    State(state): State<SharedState>,
    Json(payload): Json<RegisterStudentRequest>,
) -> Result<Json<StudentSummary>, AppError> {
    payload.validate()?;
    let summary = student_service::register_student(&state, payload).await?;
    Ok(Json(summary))
}

#[utoipa::path(
    get,
    path = "/students/{id}",
    tag = "students",
    params(("id" = Uuid, Path, description = "Identifier of the student")),
    responses(
        (status = 200, description = "Student found", body = StudentSummary)
    )
)]
/// Fetch a registered student.
pub async fn get_student(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StudentSummary>, AppError> {
    let summary = student_service::get_student(&state, id).await?;
    Ok(Json(summary))
}

#[utoipa::path(
    get,
    path = "/students/{id}/results",
    tag = "students",
    params(("id" = Uuid, Path, description = "Identifier of the student")),
    responses(
        (status = 200, description = "Historical results, newest first", body = [ResultSummary])
    )
)]
/// List the historical results of a student.
pub async fn student_results(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ResultSummary>>, AppError> {
    let results = student_service::results_for_student(&state, id).await?;
    Ok(Json(results))
}
