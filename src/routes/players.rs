use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::players::{PlayerDetail, PlayerInput, UpdatePlayerRequest},
    error::AppError,
    services::roster_service,
    state::SharedState,
};

/// CRUD routes for players.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/players", get(list_players).post(create_player))
        .route(
            "/players/{id}",
            get(get_player).put(update_player).delete(delete_player),
        )
}

#[utoipa::path(
    get,
    path = "/players",
    tag = "players",
    responses((status = 200, description = "All registered players", body = [PlayerDetail]))
)]
/// List every registered player with team and scoring record.
pub async fn list_players(
    State(state): State<SharedState>,
) -> Result<Json<Vec<PlayerDetail>>, AppError> {
    Ok(Json(roster_service::list_players(&state).await?))
}

#[utoipa::path(
    get,
    path = "/players/{id}",
    tag = "players",
    params(("id" = Uuid, Path, description = "Identifier of the player")),
    responses(
        (status = 200, description = "Player", body = PlayerDetail),
        (status = 404, description = "Player not found")
    )
)]
/// Retrieve a player by their identifier.
pub async fn get_player(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PlayerDetail>, AppError> {
    Ok(Json(roster_service::get_player(&state, id).await?))
}

#[utoipa::path(
    post,
    path = "/players",
    tag = "players",
    request_body = PlayerInput,
    responses(
        (status = 201, description = "Player created", body = PlayerDetail),
        (status = 404, description = "Team not found")
    )
)]
/// Register a new player on an existing team.
pub async fn create_player(
    State(state): State<SharedState>,
    Json(payload): Json<PlayerInput>,
) -> Result<(StatusCode, Json<PlayerDetail>), AppError> {
    payload.validate()?;
    let detail = roster_service::create_player(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

#[utoipa::path(
    put,
    path = "/players/{id}",
    tag = "players",
    params(("id" = Uuid, Path, description = "Identifier of the player")),
    request_body = UpdatePlayerRequest,
    responses(
        (status = 200, description = "Player updated", body = PlayerDetail),
        (status = 404, description = "Player or team not found")
    )
)]
/// Rename or transfer an existing player.
pub async fn update_player(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePlayerRequest>,
) -> Result<Json<PlayerDetail>, AppError> {
    payload.validate()?;
    Ok(Json(
        roster_service::update_player(&state, id, payload).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/players/{id}",
    tag = "players",
    params(("id" = Uuid, Path, description = "Identifier of the player")),
    responses(
        (status = 204, description = "Player deleted"),
        (status = 404, description = "Player not found")
    )
)]
/// Delete a player.
pub async fn delete_player(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    roster_service::delete_player(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
