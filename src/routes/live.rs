use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::matches::MatchSummary,
    error::AppError,
    services::{fixture_service, live_service},
    state::SharedState,
};

/// Routes flipping which match is live and exposing the current one.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/live", get(current_live_match))
        .route("/live/{match_id}", post(set_match_live))
}

#[utoipa::path(
    get,
    path = "/live",
    tag = "live",
    responses(
        (status = 200, description = "Current live match", body = MatchSummary),
        (status = 404, description = "No live match")
    )
)]
/// Return the current live match with teams and goals embedded.
pub async fn current_live_match(
    State(state): State<SharedState>,
) -> Result<Json<MatchSummary>, AppError> {
    let live = live_service::current_live(&state).await?;
    let summary = fixture_service::assemble_summary(&state, live).await?;
    Ok(Json(summary))
}

#[utoipa::path(
    post,
    path = "/live/{match_id}",
    tag = "live",
    params(("match_id" = Uuid, Path, description = "Identifier of the match to put on air")),
    responses(
        (status = 200, description = "Match set live", body = MatchSummary),
        (status = 404, description = "Match not found")
    )
)]
/// Make the given match the single live one, clearing the flag everywhere
/// else first.
pub async fn set_match_live(
    State(state): State<SharedState>,
    Path(match_id): Path<Uuid>,
) -> Result<Json<MatchSummary>, AppError> {
    let updated = live_service::set_live(&state, match_id).await?;
    let summary = fixture_service::assemble_summary(&state, updated).await?;
    Ok(Json(summary))
}
