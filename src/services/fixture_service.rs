//! Business logic behind the match (fixture) CRUD routes: straightforward
//! request/response handling over the record store.

use uuid::Uuid;

use crate::{
    dao::models::{MatchEntity, MatchPatch, MatchSide},
    dto::{
        matches::{CreateMatchRequest, GoalSummary, MatchSummary, UpdateMatchRequest},
        parse_system_time,
    },
    error::ServiceError,
    state::SharedState,
};

/// All fixtures, most recently scheduled first, with teams and goals
/// embedded.
pub async fn list_matches(state: &SharedState) -> Result<Vec<MatchSummary>, ServiceError> {
    let store = state.require_match_store().await?;
    let entities = store.list_matches().await?;

    let mut summaries = Vec::with_capacity(entities.len());
    for entity in entities {
        summaries.push(assemble_summary(state, entity).await?);
    }
    Ok(summaries)
}

/// One fixture by id.
pub async fn get_match(state: &SharedState, id: Uuid) -> Result<MatchSummary, ServiceError> {
    let store = state.require_match_store().await?;
    let entity = store
        .find_match(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("match `{id}` not found")))?;
    assemble_summary(state, entity).await
}

/// Schedule a new fixture between two existing, distinct teams.
pub async fn create_match(
    state: &SharedState,
    request: CreateMatchRequest,
) -> Result<MatchSummary, ServiceError> {
    let scheduled_at = parse_system_time(&request.scheduled_at).ok_or_else(|| {
        ServiceError::InvalidInput(format!(
            "`{}` is not a valid RFC 3339 timestamp",
            request.scheduled_at
        ))
    })?;

    if request.home_team_id == request.away_team_id {
        return Err(ServiceError::InvalidInput(
            "a match needs two distinct teams".into(),
        ));
    }

    let store = state.require_match_store().await?;
    for team_id in [request.home_team_id, request.away_team_id] {
        if store.find_team(team_id).await?.is_none() {
            return Err(ServiceError::NotFound(format!("team `{team_id}` not found")));
        }
    }

    let entity = MatchEntity::scheduled(request.home_team_id, request.away_team_id, scheduled_at);
    store.save_match(entity.clone()).await?;
    assemble_summary(state, entity).await
}

/// Patch an existing fixture's teams or kick-off time.
pub async fn update_match(
    state: &SharedState,
    id: Uuid,
    request: UpdateMatchRequest,
) -> Result<MatchSummary, ServiceError> {
    let scheduled_at = match &request.scheduled_at {
        Some(raw) => Some(parse_system_time(raw).ok_or_else(|| {
            ServiceError::InvalidInput(format!("`{raw}` is not a valid RFC 3339 timestamp"))
        })?),
        None => None,
    };

    let store = state.require_match_store().await?;
    for team_id in [request.home_team_id, request.away_team_id].into_iter().flatten() {
        if store.find_team(team_id).await?.is_none() {
            return Err(ServiceError::NotFound(format!("team `{team_id}` not found")));
        }
    }

    let patch = MatchPatch {
        home_team_id: request.home_team_id,
        away_team_id: request.away_team_id,
        scheduled_at,
        ..MatchPatch::default()
    };
    if !store.update_match(id, patch).await? {
        return Err(ServiceError::NotFound(format!("match `{id}` not found")));
    }

    let updated = store
        .find_match(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("match `{id}` not found")))?;
    assemble_summary(state, updated).await
}

/// Delete a fixture by id.
pub async fn delete_match(state: &SharedState, id: Uuid) -> Result<(), ServiceError> {
    let store = state.require_match_store().await?;
    if store.delete_match(id).await? {
        Ok(())
    } else {
        Err(ServiceError::NotFound(format!("match `{id}` not found")))
    }
}

/// Load teams and per-side goals to build the full match projection.
pub(crate) async fn assemble_summary(
    state: &SharedState,
    entity: MatchEntity,
) -> Result<MatchSummary, ServiceError> {
    let store = state.require_match_store().await?;

    let home_team = store
        .find_team(entity.home_team_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("team `{}` not found", entity.home_team_id)))?;
    let away_team = store
        .find_team(entity.away_team_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("team `{}` not found", entity.away_team_id)))?;

    let goals = store.goals_for_match(entity.id).await?;
    let (home_goals, away_goals): (Vec<_>, Vec<_>) = goals
        .into_iter()
        .partition(|goal| goal.side == MatchSide::Home);

    Ok(MatchSummary::assemble(
        entity,
        home_team.into(),
        away_team.into(),
        home_goals.into_iter().map(GoalSummary::from).collect(),
        away_goals.into_iter().map(GoalSummary::from).collect(),
    ))
}
