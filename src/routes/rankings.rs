//! Leaderboard routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    dto::ranking::{RankingQuery, RankingRow},
    error::AppError,
    game::SharedState,
    services::ranking_service,
};

/// Routes serving the leaderboard.
pub fn router() -> Router<SharedState> {
    Router::new().route("/rankings", get(rankings))
}

#[utoipa::path(
    get,
    path = "/rankings",
    tag = "rankings",
    params(RankingQuery),
    responses(
        (status = 200, description = "Leaderboard rows, best first", body = [RankingRow])
    )
)]
/// List leaderboard rows sorted by score descending then time ascending.
pub async fn rankings(
    State(state): State<SharedState>,
    Query(query): Query<RankingQuery>,
) -> Result<Json<Vec<RankingRow>>, AppError> {
    let rows = ranking_service::rankings(&state, query.grade).await?;
    Ok(Json(rows))
}
