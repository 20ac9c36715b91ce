//! HTTP route trees.

use axum::Router;

use crate::game::SharedState;

/// Swagger UI routes.
pub mod docs;
/// Health check routes.
pub mod health;
/// Leaderboard routes.
pub mod rankings;
/// Session lifecycle and gameplay routes.
pub mod sessions;
/// Server-sent events routes.
pub mod sse;
/// Student registration and profile routes.
pub mod students;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(students::router())
        .merge(sessions::router())
        .merge(rankings::router())
        .merge(sse::router());

    let docs_router = docs::router(state.clone());

    api_router.merge(docs_router).with_state(state)
}
