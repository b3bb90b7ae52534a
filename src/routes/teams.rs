use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::teams::{TeamInput, TeamSummary},
    error::AppError,
    services::roster_service,
    state::SharedState,
};

/// CRUD routes for teams.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/teams", get(list_teams).post(create_team))
        .route(
            "/teams/{id}",
            get(get_team).put(update_team).delete(delete_team),
        )
}

#[utoipa::path(
    get,
    path = "/teams",
    tag = "teams",
    responses((status = 200, description = "All registered teams", body = [TeamSummary]))
)]
/// List every registered team.
pub async fn list_teams(
    State(state): State<SharedState>,
) -> Result<Json<Vec<TeamSummary>>, AppError> {
    Ok(Json(roster_service::list_teams(&state).await?))
}

#[utoipa::path(
    get,
    path = "/teams/{id}",
    tag = "teams",
    params(("id" = Uuid, Path, description = "Identifier of the team")),
    responses(
        (status = 200, description = "Team", body = TeamSummary),
        (status = 404, description = "Team not found")
    )
)]
/// Retrieve a team by its identifier.
pub async fn get_team(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TeamSummary>, AppError> {
    Ok(Json(roster_service::get_team(&state, id).await?))
}

#[utoipa::path(
    post,
    path = "/teams",
    tag = "teams",
    request_body = TeamInput,
    responses(
        (status = 201, description = "Team created", body = TeamSummary),
        (status = 400, description = "Invalid team name")
    )
)]
/// Register a new team.
pub async fn create_team(
    State(state): State<SharedState>,
    Json(payload): Json<TeamInput>,
) -> Result<(StatusCode, Json<TeamSummary>), AppError> {
    payload.validate()?;
    let summary = roster_service::create_team(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(summary)))
}

#[utoipa::path(
    put,
    path = "/teams/{id}",
    tag = "teams",
    params(("id" = Uuid, Path, description = "Identifier of the team")),
    request_body = TeamInput,
    responses(
        (status = 200, description = "Team updated", body = TeamSummary),
        (status = 404, description = "Team not found")
    )
)]
/// Rename an existing team.
pub async fn update_team(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TeamInput>,
) -> Result<Json<TeamSummary>, AppError> {
    payload.validate()?;
    Ok(Json(roster_service::update_team(&state, id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/teams/{id}",
    tag = "teams",
    params(("id" = Uuid, Path, description = "Identifier of the team")),
    responses(
        (status = 204, description = "Team deleted"),
        (status = 404, description = "Team not found")
    )
)]
/// Delete a team.
pub async fn delete_team(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    roster_service::delete_team(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
