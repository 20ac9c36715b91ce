//! Core session lifecycle and gameplay operations.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    dto::session::{CreateSessionRequest, MatchResponse, SelectionResponse, SessionSnapshot},
    error::ServiceError,
    game::{
        SessionHandle, SharedState,
        clock::SessionClock,
        feedback::SseFeedback,
        session::{GameResult, MatchOutcome, MatchSession},
    },
    services::sse_events,
};

/// Start a session for a registered student.
///
/// The registration check is a fatal precondition: an unknown student id
/// leaves no session behind and the caller is expected to redirect to the
/// registration flow.
pub async fn start_session(
    state: &SharedState,
    request: CreateSessionRequest,
) -> Result<SessionSnapshot, ServiceError> {
    let store = state.require_result_store().await?;
    let Some(student) = store.find_student(request.student_id).await? else {
        return Err(ServiceError::Unauthorized(
            "no registered student; register before playing".into(),
        ));
    };

    let session_id = Uuid::new_v4();
    let notifier = Arc::new(SseFeedback::new(state.sse().clone(), session_id));

    let mut rng = rand::rng();
    let session = MatchSession::start(
        &mut rng,
        session_id,
        student.id,
        request.difficulty,
        state.config().problems_per_session(),
        notifier,
    )?;

    let snapshot = SessionSnapshot::from(&session);

    let handle = SessionHandle::new(session);
    state.insert_session(session_id, handle.clone());
    handle.install_clock(SessionClock::spawn(
        session_id,
        Arc::downgrade(&handle),
        state.sse().clone(),
    ));

    info!(
        session = %session_id,
        student = %student.name,
        difficulty = ?request.difficulty,
        "session started"
    );

    Ok(snapshot)
}

/// Snapshot a live session, refreshing its clock reading.
pub async fn session_snapshot(
    state: &SharedState,
    id: Uuid,
) -> Result<SessionSnapshot, ServiceError> {
    let handle = require_session(state, id)?;
    let mut guard = handle.session().write().await;
    guard.refresh_elapsed();
    Ok(SessionSnapshot::from(&*guard))
}

/// Toggle the problem selection of a session.
pub async fn select_problem(
    state: &SharedState,
    id: Uuid,
    problem_id: Uuid,
) -> Result<SelectionResponse, ServiceError> {
    let handle = require_session(state, id)?;
    let mut guard = handle.session().write().await;
    let selected_problem = guard.select_problem(problem_id)?;
    Ok(SelectionResponse { selected_problem })
}

/// Match an answer token against the selected problem of a session.
///
/// When the attempt resolves the final problem the clock is stopped, the
/// completion event is broadcast, and the result is handed to the store as a
/// fire-and-forget save.
pub async fn select_answer(
    state: &SharedState,
    id: Uuid,
    token: &str,
) -> Result<MatchResponse, ServiceError> {
    let handle = require_session(state, id)?;

    let (outcome, completed, score) = {
        let mut guard = handle.session().write().await;
        let outcome = guard.select_answer(token);
        (outcome, guard.is_completed(), guard.score())
    };

    let response = match outcome {
        MatchOutcome::Ignored => MatchResponse {
            recorded: false,
            is_correct: None,
            completed,
            score: completed.then_some(score),
        },
        MatchOutcome::Recorded {
            is_correct,
            completion,
        } => {
            if let Some(result) = completion {
                handle.stop_clock();
                sse_events::broadcast_session_completed(state.sse(), id, &result);
                persist_result(state, id, result);
            }

            MatchResponse {
                recorded: true,
                is_correct: Some(is_correct),
                completed,
                score: completed.then_some(score),
            }
        }
    };

    Ok(response)
}

/// Tear a session down, releasing its clock. Used when the student leaves
/// the game screen.
pub async fn end_session(state: &SharedState, id: Uuid) -> Result<(), ServiceError> {
    state
        .remove_session(id)
        .map(|_| info!(session = %id, "session ended"))
        .ok_or_else(|| ServiceError::NotFound(format!("session `{id}` not found")))
}

/// Persist a finished session's result without blocking the caller.
///
/// Failure is logged and otherwise ignored; the in-memory completed state
/// stands regardless of what the store does.
fn persist_result(state: &SharedState, session_id: Uuid, result: GameResult) {
    let state = state.clone();
    tokio::spawn(async move {
        match state.result_store().await {
            Some(store) => {
                if let Err(err) = store.save_result(result.into()).await {
                    warn!(session = %session_id, error = %err, "failed to persist game result");
                }
            }
            None => {
                warn!(session = %session_id, "degraded mode; game result not persisted");
            }
        }
    });
}

fn require_session(state: &SharedState, id: Uuid) -> Result<Arc<SessionHandle>, ServiceError> {
    state
        .session(id)
        .ok_or_else(|| ServiceError::NotFound(format!("session `{id}` not found")))
}

#[cfg(all(test, feature = "file-store"))]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use super::*;
    use crate::config::AppConfig;
    use crate::dao::result_store::{ResultStore, file::FileResultStore};
    use crate::dto::student::RegisterStudentRequest;
    use crate::game::problems::Difficulty;
    use crate::game::{AppState, SharedState};
    use crate::services::student_service;

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("mestres-sessions-{}", Uuid::new_v4()))
    }

    async fn state_with_store(dir: &PathBuf) -> (SharedState, FileResultStore) {
        let state = AppState::new(AppConfig::default());
        let store = FileResultStore::open(dir).await.unwrap();
        state.set_result_store(Arc::new(store.clone())).await;
        (state, store)
    }

    fn request(student_id: Uuid) -> CreateSessionRequest {
        CreateSessionRequest {
            student_id,
            difficulty: Difficulty::Easy,
        }
    }

    #[tokio::test]
    async fn degraded_mode_blocks_session_start() {
        let state = AppState::new(AppConfig::default());
        let err = start_session(&state, request(Uuid::new_v4())).await.unwrap_err();
        assert!(matches!(err, ServiceError::Degraded));
    }

    #[tokio::test]
    async fn unregistered_student_cannot_start_a_session() {
        let dir = scratch_dir();
        let (state, _store) = state_with_store(&dir).await;

        let err = start_session(&state, request(Uuid::new_v4())).await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn full_round_trip_persists_exactly_one_result() {
        let dir = scratch_dir();
        let (state, store) = state_with_store(&dir).await;

        let student = student_service::register_student(
            &state,
            RegisterStudentRequest {
                name: "Ana".into(),
                grade: 6,
                id: None,
            },
        )
        .await
        .unwrap();

        let snapshot = start_session(&state, request(student.id)).await.unwrap();
        assert_eq!(snapshot.problems.len(), 10);
        assert_eq!(snapshot.answer_pool.len(), 10);
        assert!(!snapshot.completed);

        // The pool hides the pairing, so attempts use a token no generated
        // problem can carry; wrong answers still lock and resolve problems.
        let mut last = None;
        for problem in &snapshot.problems {
            select_problem(&state, snapshot.id, problem.id).await.unwrap();
            last = Some(select_answer(&state, snapshot.id, "999999").await.unwrap());
        }

        let final_response = last.expect("ten attempts were made");
        assert!(final_response.completed);
        let score = final_response.score.expect("completed sessions carry a score");
        assert!(score > 0, "the time bonus keeps the score positive");

        // The save is fire-and-forget; poll briefly for the spawned write.
        let mut persisted = Vec::new();
        for _ in 0..50 {
            persisted = store.list_results().await.unwrap();
            if !persisted.is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert_eq!(persisted.len(), 1);
        assert_eq!(persisted[0].student_id, student.id);
        assert_eq!(persisted[0].correct_answers, 0);
        assert_eq!(persisted[0].score, score);

        // Further attempts must not record or resave.
        let extra = select_answer(&state, snapshot.id, "999999").await.unwrap();
        assert!(!extra.recorded);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(store.list_results().await.unwrap().len(), 1);

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn ending_a_session_releases_it() {
        let dir = scratch_dir();
        let (state, _store) = state_with_store(&dir).await;

        let student = student_service::register_student(
            &state,
            RegisterStudentRequest {
                name: "Bruno".into(),
                grade: 7,
                id: None,
            },
        )
        .await
        .unwrap();

        let snapshot = start_session(&state, request(student.id)).await.unwrap();
        end_session(&state, snapshot.id).await.unwrap();

        let err = session_snapshot(&state, snapshot.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
