//! Business logic behind the team and player CRUD routes.

use std::time::SystemTime;

use uuid::Uuid;

use crate::{
    dao::models::{PlayerEntity, TeamEntity},
    dto::{
        matches::GoalSummary,
        players::{PlayerDetail, PlayerInput, UpdatePlayerRequest},
        teams::{TeamInput, TeamSummary},
    },
    error::ServiceError,
    state::SharedState,
};

/// All registered teams.
pub async fn list_teams(state: &SharedState) -> Result<Vec<TeamSummary>, ServiceError> {
    let store = state.require_match_store().await?;
    let teams = store.list_teams().await?;
    Ok(teams.into_iter().map(Into::into).collect())
}

/// One team by id.
pub async fn get_team(state: &SharedState, id: Uuid) -> Result<TeamSummary, ServiceError> {
    let store = state.require_match_store().await?;
    let team = store
        .find_team(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("team `{id}` not found")))?;
    Ok(team.into())
}

/// Register a new team.
pub async fn create_team(
    state: &SharedState,
    request: TeamInput,
) -> Result<TeamSummary, ServiceError> {
    let store = state.require_match_store().await?;
    let team = TeamEntity::new(request.name);
    store.save_team(team.clone()).await?;
    Ok(team.into())
}

/// Rename an existing team.
pub async fn update_team(
    state: &SharedState,
    id: Uuid,
    request: TeamInput,
) -> Result<TeamSummary, ServiceError> {
    let store = state.require_match_store().await?;
    let mut team = store
        .find_team(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("team `{id}` not found")))?;

    team.name = request.name;
    team.updated_at = SystemTime::now();
    store.save_team(team.clone()).await?;
    Ok(team.into())
}

/// Delete a team by id.
pub async fn delete_team(state: &SharedState, id: Uuid) -> Result<(), ServiceError> {
    let store = state.require_match_store().await?;
    if store.delete_team(id).await? {
        Ok(())
    } else {
        Err(ServiceError::NotFound(format!("team `{id}` not found")))
    }
}

/// All registered players with their team and scoring record embedded.
pub async fn list_players(state: &SharedState) -> Result<Vec<PlayerDetail>, ServiceError> {
    let store = state.require_match_store().await?;
    let players = store.list_players().await?;

    let mut details = Vec::with_capacity(players.len());
    for player in players {
        details.push(assemble_detail(state, player).await?);
    }
    Ok(details)
}

/// One player by id, with team and scoring record.
pub async fn get_player(state: &SharedState, id: Uuid) -> Result<PlayerDetail, ServiceError> {
    let store = state.require_match_store().await?;
    let player = store
        .find_player(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("player `{id}` not found")))?;
    assemble_detail(state, player).await
}

/// Register a new player on an existing team.
pub async fn create_player(
    state: &SharedState,
    request: PlayerInput,
) -> Result<PlayerDetail, ServiceError> {
    let store = state.require_match_store().await?;
    if store.find_team(request.team_id).await?.is_none() {
        return Err(ServiceError::NotFound(format!(
            "team `{}` not found",
            request.team_id
        )));
    }

    let player = PlayerEntity::new(request.name, request.team_id);
    store.save_player(player.clone()).await?;
    assemble_detail(state, player).await
}

/// Rename a player or transfer them to another existing team.
pub async fn update_player(
    state: &SharedState,
    id: Uuid,
    request: UpdatePlayerRequest,
) -> Result<PlayerDetail, ServiceError> {
    let store = state.require_match_store().await?;
    let mut player = store
        .find_player(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("player `{id}` not found")))?;

    if let Some(team_id) = request.team_id {
        if store.find_team(team_id).await?.is_none() {
            return Err(ServiceError::NotFound(format!("team `{team_id}` not found")));
        }
        player.team_id = team_id;
    }
    if let Some(name) = request.name {
        player.name = name;
    }
    player.updated_at = SystemTime::now();

    store.save_player(player.clone()).await?;
    assemble_detail(state, player).await
}

/// Delete a player by id.
pub async fn delete_player(state: &SharedState, id: Uuid) -> Result<(), ServiceError> {
    let store = state.require_match_store().await?;
    if store.delete_player(id).await? {
        Ok(())
    } else {
        Err(ServiceError::NotFound(format!("player `{id}` not found")))
    }
}

async fn assemble_detail(
    state: &SharedState,
    player: PlayerEntity,
) -> Result<PlayerDetail, ServiceError> {
    let store = state.require_match_store().await?;

    let team = store
        .find_team(player.team_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("team `{}` not found", player.team_id)))?;
    let goals = store.goals_for_player(player.id).await?;

    Ok(PlayerDetail::assemble(
        player,
        team.into(),
        goals.into_iter().map(GoalSummary::from).collect(),
    ))
}
