//! Session lifecycle and gameplay routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::session::{
        CreateSessionRequest, MatchResponse, SelectAnswerRequest, SelectProblemRequest,
        SelectionResponse, SessionSnapshot,
    },
    error::AppError,
    game::SharedState,
    services::session_service,
};

/// Routes handling the matching-game sessions.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/sessions", post(create_session))
        .route("/sessions/{id}", get(get_session).delete(end_session))
        .route("/sessions/{id}/problem", post(select_problem))
        .route("/sessions/{id}/answer", post(select_answer))
}

#[utoipa::path(
    post,
    path = "/sessions",
    tag = "sessions",
    request_body = CreateSessionRequest,
    responses(
        (status = 200, description = "Session started", body = SessionSnapshot),
        (status = 401, description = "Student is not registered")
    )
)]
/// Start a new session for a registered student.
pub async fn create_session(
    State(state): State<SharedState>,
    Json(payload): Json<CreateSessionRequest>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let snapshot = session_service::start_session(&state, payload).await?;
    Ok(Json(snapshot))
}

#[utoipa::path(
    get,
    path = "/sessions/{id}",
    tag = "sessions",
    params(("id" = Uuid, Path, description = "Identifier of the session")),
    responses(
        (status = 200, description = "Current session state", body = SessionSnapshot)
    )
)]
/// Snapshot the current state of a session.
pub async fn get_session(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let snapshot = session_service::session_snapshot(&state, id).await?;
    Ok(Json(snapshot))
}

#[utoipa::path(
    post,
    path = "/sessions/{id}/problem",
    tag = "sessions",
    params(("id" = Uuid, Path, description = "Identifier of the session")),
    request_body = SelectProblemRequest,
    responses(
        (status = 200, description = "Selection toggled", body = SelectionResponse)
    )
)]
/// Toggle the problem selection.
pub async fn select_problem(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SelectProblemRequest>,
) -> Result<Json<SelectionResponse>, AppError> {
    let selection = session_service::select_problem(&state, id, payload.problem_id).await?;
    Ok(Json(selection))
}

#[utoipa::path(
    post,
    path = "/sessions/{id}/answer",
    tag = "sessions",
    params(("id" = Uuid, Path, description = "Identifier of the session")),
    request_body = SelectAnswerRequest,
    responses(
        (status = 200, description = "Attempt processed", body = MatchResponse)
    )
)]
/// Match an answer token against the selected problem.
pub async fn select_answer(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SelectAnswerRequest>,
) -> Result<Json<MatchResponse>, AppError> {
    let outcome = session_service::select_answer(&state, id, &payload.token).await?;
    Ok(Json(outcome))
}

#[utoipa::path(
    delete,
    path = "/sessions/{id}",
    tag = "sessions",
    params(("id" = Uuid, Path, description = "Identifier of the session")),
    responses(
        (status = 204, description = "Session torn down")
    )
)]
/// Tear a session down when the student leaves the game screen.
pub async fn end_session(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    session_service::end_session(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
