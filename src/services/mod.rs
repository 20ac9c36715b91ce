//! Service layer sitting between the routes and the game/persistence state.

/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Leaderboard assembly.
pub mod ranking_service;
/// Core session lifecycle and gameplay operations.
pub mod session_service;
/// Server-Sent Events message generation.
pub mod sse_events;
/// Server-Sent Events broadcasting service.
pub mod sse_service;
/// Storage connection supervisor.
pub mod storage_supervisor;
/// Student registration and profile operations.
pub mod student_service;
