use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dao::models::{GoalEntity, MatchEntity, MatchStage, MatchStatus},
    dto::{format_system_time, teams::TeamSummary},
};

/// Payload used to schedule a new fixture.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMatchRequest {
    pub home_team_id: Uuid,
    pub away_team_id: Uuid,
    /// RFC 3339 kick-off timestamp.
    pub scheduled_at: String,
}

/// Partial update applied to an existing fixture.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateMatchRequest {
    #[serde(default)]
    pub home_team_id: Option<Uuid>,
    #[serde(default)]
    pub away_team_id: Option<Uuid>,
    /// RFC 3339 kick-off timestamp.
    #[serde(default)]
    pub scheduled_at: Option<String>,
}

/// Goal projection embedded in match and player listings.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GoalSummary {
    pub id: Uuid,
    pub team_id: Uuid,
    pub player_id: Uuid,
    pub is_penalty: bool,
    pub scored_at: String,
}

impl From<GoalEntity> for GoalSummary {
    fn from(goal: GoalEntity) -> Self {
        Self {
            id: goal.id,
            team_id: goal.team_id,
            player_id: goal.player_id,
            is_penalty: goal.is_penalty,
            scored_at: format_system_time(goal.scored_at),
        }
    }
}

/// Match projection with both teams and their goals embedded, as the admin
/// and scoreboard listings expect.
#[derive(Debug, Serialize, ToSchema)]
pub struct MatchSummary {
    pub id: Uuid,
    pub status: MatchStatus,
    pub stage: Option<MatchStage>,
    pub is_live: bool,
    pub scheduled_at: String,
    pub home_team: TeamSummary,
    pub away_team: TeamSummary,
    pub home_team_goals: Vec<GoalSummary>,
    pub away_team_goals: Vec<GoalSummary>,
}

impl MatchSummary {
    /// Assemble the projection from its already-loaded parts.
    pub fn assemble(
        entity: MatchEntity,
        home_team: TeamSummary,
        away_team: TeamSummary,
        home_team_goals: Vec<GoalSummary>,
        away_team_goals: Vec<GoalSummary>,
    ) -> Self {
        Self {
            id: entity.id,
            status: entity.status,
            stage: entity.stage,
            is_live: entity.is_live,
            scheduled_at: format_system_time(entity.scheduled_at),
            home_team,
            away_team,
            home_team_goals,
            away_team_goals,
        }
    }
}
