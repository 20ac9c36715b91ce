//! OpenAPI documentation generation.

use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the Mestres da Matemática backend.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::students::register_student,
        crate::routes::students::get_student,
        crate::routes::students::student_results,
        crate::routes::sessions::create_session,
        crate::routes::sessions::get_session,
        crate::routes::sessions::select_problem,
        crate::routes::sessions::select_answer,
        crate::routes::sessions::end_session,
        crate::routes::rankings::rankings,
        crate::routes::sse::events_stream,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::student::RegisterStudentRequest,
            crate::dto::student::StudentSummary,
            crate::dto::student::ResultSummary,
            crate::dto::session::CreateSessionRequest,
            crate::dto::session::SelectProblemRequest,
            crate::dto::session::SelectAnswerRequest,
            crate::dto::session::ProblemView,
            crate::dto::session::ConnectionView,
            crate::dto::session::SessionSnapshot,
            crate::dto::session::SelectionResponse,
            crate::dto::session::MatchResponse,
            crate::dto::ranking::RankingRow,
            crate::dto::sse::Handshake,
            crate::dto::sse::SystemStatusEvent,
            crate::dto::sse::TickEvent,
            crate::dto::sse::FeedbackEvent,
            crate::dto::sse::SessionCompletedEvent,
            crate::game::problems::Difficulty,
            crate::game::problems::Operator,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "students", description = "Student registration and profiles"),
        (name = "sessions", description = "Matching-game sessions"),
        (name = "rankings", description = "Leaderboard queries"),
        (name = "sse", description = "Server-sent events streams"),
    )
)]
pub struct ApiDoc;
