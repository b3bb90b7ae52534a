use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::{
    dao::models::PlayerEntity,
    dto::{
        format_system_time, matches::GoalSummary, teams::TeamSummary,
        validation::validate_display_name,
    },
};

/// Payload used to register a new player on a team.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PlayerInput {
    pub name: String,
    pub team_id: Uuid,
}

impl Validate for PlayerInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(e) = validate_display_name(&self.name) {
            errors.add("name", e);
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Partial update applied to an existing player.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePlayerRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub team_id: Option<Uuid>,
}

impl Validate for UpdatePlayerRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Some(ref name) = self.name
            && let Err(e) = validate_display_name(name)
        {
            errors.add("name", e);
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Player projection including their team and scoring record, mirroring the
/// detailed listings of the admin UI.
#[derive(Debug, Serialize, ToSchema)]
pub struct PlayerDetail {
    pub id: Uuid,
    pub name: String,
    pub team: TeamSummary,
    pub goals: Vec<GoalSummary>,
    pub created_at: String,
    pub updated_at: String,
}

impl PlayerDetail {
    /// Assemble the detailed projection from its already-loaded parts.
    pub fn assemble(
        player: PlayerEntity,
        team: TeamSummary,
        goals: Vec<GoalSummary>,
    ) -> Self {
        Self {
            id: player.id,
            name: player.name,
            team,
            goals,
            created_at: format_system_time(player.created_at),
            updated_at: format_system_time(player.updated_at),
        }
    }
}
