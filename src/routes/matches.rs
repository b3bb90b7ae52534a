use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::matches::{CreateMatchRequest, MatchSummary, UpdateMatchRequest},
    error::AppError,
    services::fixture_service,
    state::SharedState,
};

/// CRUD routes for fixtures.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/matches", get(list_matches).post(create_match))
        .route(
            "/matches/{id}",
            get(get_match).put(update_match).delete(delete_match),
        )
}

#[utoipa::path(
    get,
    path = "/matches",
    tag = "matches",
    responses((status = 200, description = "All fixtures, most recent first", body = [MatchSummary]))
)]
/// List every fixture with teams and goals embedded.
pub async fn list_matches(
    State(state): State<SharedState>,
) -> Result<Json<Vec<MatchSummary>>, AppError> {
    Ok(Json(fixture_service::list_matches(&state).await?))
}

#[utoipa::path(
    get,
    path = "/matches/{id}",
    tag = "matches",
    params(("id" = Uuid, Path, description = "Identifier of the match")),
    responses(
        (status = 200, description = "Match", body = MatchSummary),
        (status = 404, description = "Match not found")
    )
)]
/// Retrieve a fixture by its identifier.
pub async fn get_match(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MatchSummary>, AppError> {
    Ok(Json(fixture_service::get_match(&state, id).await?))
}

#[utoipa::path(
    post,
    path = "/matches",
    tag = "matches",
    request_body = CreateMatchRequest,
    responses(
        (status = 201, description = "Match scheduled", body = MatchSummary),
        (status = 400, description = "Invalid kick-off time or team pair"),
        (status = 404, description = "Team not found")
    )
)]
/// Schedule a new fixture.
pub async fn create_match(
    State(state): State<SharedState>,
    Json(payload): Json<CreateMatchRequest>,
) -> Result<(StatusCode, Json<MatchSummary>), AppError> {
    let summary = fixture_service::create_match(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(summary)))
}

#[utoipa::path(
    put,
    path = "/matches/{id}",
    tag = "matches",
    params(("id" = Uuid, Path, description = "Identifier of the match")),
    request_body = UpdateMatchRequest,
    responses(
        (status = 200, description = "Match updated", body = MatchSummary),
        (status = 404, description = "Match or team not found")
    )
)]
/// Update an existing fixture's teams or kick-off time.
pub async fn update_match(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMatchRequest>,
) -> Result<Json<MatchSummary>, AppError> {
    Ok(Json(
        fixture_service::update_match(&state, id, payload).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/matches/{id}",
    tag = "matches",
    params(("id" = Uuid, Path, description = "Identifier of the match")),
    responses(
        (status = 204, description = "Match deleted"),
        (status = 404, description = "Match not found")
    )
)]
/// Delete a fixture.
pub async fn delete_match(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    fixture_service::delete_match(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
