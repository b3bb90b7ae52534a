use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dao::models::{GoalEntity, MatchStage, TeamEntity};

/// Brief team reference embedded in realtime snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TeamRef {
    pub id: Uuid,
    pub name: String,
}

impl From<&TeamEntity> for TeamRef {
    fn from(team: &TeamEntity) -> Self {
        Self {
            id: team.id,
            name: team.name.clone(),
        }
    }
}

/// Per-goal flag carried in snapshots; scoreboards only need to split
/// regular goals from shootout conversions.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GoalFlag {
    pub is_penalty: bool,
}

impl From<&GoalEntity> for GoalFlag {
    fn from(goal: &GoalEntity) -> Self {
        Self {
            is_penalty: goal.is_penalty,
        }
    }
}

/// Snapshot of the live match pushed after every state-changing command and
/// answered to `match:request`. Field names match the original scoreboard
/// wire format.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatchSnapshot {
    pub id: Uuid,
    pub stage: Option<MatchStage>,
    pub home_team: TeamRef,
    pub away_team: TeamRef,
    pub home_team_goals: Vec<GoalFlag>,
    pub away_team_goals: Vec<GoalFlag>,
}
