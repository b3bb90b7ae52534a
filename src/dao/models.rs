use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use utoipa::ToSchema;
use uuid::Uuid;

/// Lifecycle status of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum MatchStatus {
    /// Kick-off has not happened yet.
    NotStarted,
    /// A period is currently running (timed or untimed).
    InProgress,
    /// A timed period has been paused by the admin.
    Paused,
    /// The match is over.
    Finished,
}

/// Period of play a live match is currently in.
///
/// Only meaningful while the status is [`MatchStatus::InProgress`] or
/// [`MatchStatus::Paused`]; stale otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum MatchStage {
    /// First 45-minute (configurable) period.
    FirstHalf,
    /// Untimed break between the halves.
    Halftime,
    /// Second timed period.
    SecondHalf,
    /// Timed extra-time period.
    ExtraTime,
    /// Untimed penalty shootout.
    PenaltyShootout,
}

/// Which side of the fixture a goal counts for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum MatchSide {
    /// Scored for the home team.
    Home,
    /// Scored for the away team.
    Away,
}

/// Team stored in persistence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamEntity {
    /// Stable identifier for the team.
    pub id: Uuid,
    /// Display name of the team.
    pub name: String,
    /// Creation timestamp.
    pub created_at: SystemTime,
    /// Last time this team was updated.
    pub updated_at: SystemTime,
}

impl TeamEntity {
    /// Build a new team with freshly allocated identity and timestamps.
    pub fn new(name: String) -> Self {
        let timestamp = SystemTime::now();
        Self {
            id: Uuid::new_v4(),
            name,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }
}

/// Player stored in persistence, always attached to a team.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerEntity {
    /// Stable identifier for the player.
    pub id: Uuid,
    /// Display name of the player.
    pub name: String,
    /// Team the player belongs to.
    pub team_id: Uuid,
    /// Creation timestamp.
    pub created_at: SystemTime,
    /// Last time this player was updated.
    pub updated_at: SystemTime,
}

impl PlayerEntity {
    /// Build a new player with freshly allocated identity and timestamps.
    pub fn new(name: String, team_id: Uuid) -> Self {
        let timestamp = SystemTime::now();
        Self {
            id: Uuid::new_v4(),
            name,
            team_id,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }
}

/// Match persisted by the storage layer.
///
/// The timing fields carry the live-clock bookkeeping: `start_time` anchors
/// the running period on the wall clock and is recomputed on every resume,
/// while the per-stage elapsed fields hold the seconds consumed up to the
/// most recent pause of that stage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchEntity {
    /// Primary key of the match.
    pub id: Uuid,
    /// Home side of the fixture.
    pub home_team_id: Uuid,
    /// Away side of the fixture.
    pub away_team_id: Uuid,
    /// Scheduled kick-off time.
    pub scheduled_at: SystemTime,
    /// At most one match in the whole store carries `true` here.
    pub is_live: bool,
    /// Lifecycle status.
    pub status: MatchStatus,
    /// Current period of play; `None` until the first kick-off.
    pub stage: Option<MatchStage>,
    /// Wall-clock instant the current running period began.
    pub start_time: Option<SystemTime>,
    /// Seconds of the first half consumed when it was last paused.
    pub first_half_elapsed_secs: i64,
    /// Seconds of the second half consumed when it was last paused.
    pub second_half_elapsed_secs: i64,
    /// Seconds of extra time consumed when it was last paused.
    pub extra_time_elapsed_secs: i64,
    /// Creation timestamp.
    pub created_at: SystemTime,
    /// Last time the match entity was updated.
    pub updated_at: SystemTime,
}

impl MatchEntity {
    /// Build a freshly scheduled fixture in its initial, not-live state.
    pub fn scheduled(home_team_id: Uuid, away_team_id: Uuid, scheduled_at: SystemTime) -> Self {
        let timestamp = SystemTime::now();
        Self {
            id: Uuid::new_v4(),
            home_team_id,
            away_team_id,
            scheduled_at,
            is_live: false,
            status: MatchStatus::NotStarted,
            stage: None,
            start_time: None,
            first_half_elapsed_secs: 0,
            second_half_elapsed_secs: 0,
            extra_time_elapsed_secs: 0,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Which side `team_id` plays on in this fixture, if any.
    pub fn side_of(&self, team_id: Uuid) -> Option<MatchSide> {
        if self.home_team_id == team_id {
            Some(MatchSide::Home)
        } else if self.away_team_id == team_id {
            Some(MatchSide::Away)
        } else {
            None
        }
    }
}

/// Goal appended to a match, ordered by creation time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GoalEntity {
    /// Stable identifier for the goal.
    pub id: Uuid,
    /// Match the goal was scored in.
    pub match_id: Uuid,
    /// Team credited with the goal.
    pub team_id: Uuid,
    /// Player credited with the goal.
    pub player_id: Uuid,
    /// Side of the fixture the goal counts for.
    pub side: MatchSide,
    /// Fixed at creation: `true` iff scored during the penalty shootout.
    pub is_penalty: bool,
    /// Creation timestamp, used for ordering.
    pub scored_at: SystemTime,
}

/// Partial update applied to a persisted match; `None` fields are left
/// untouched by the store.
#[derive(Debug, Clone, Default)]
pub struct MatchPatch {
    /// Replace the home side.
    pub home_team_id: Option<Uuid>,
    /// Replace the away side.
    pub away_team_id: Option<Uuid>,
    /// Replace the scheduled kick-off time.
    pub scheduled_at: Option<SystemTime>,
    /// Set or clear the live flag.
    pub is_live: Option<bool>,
    /// Replace the lifecycle status.
    pub status: Option<MatchStatus>,
    /// Replace the current stage.
    pub stage: Option<MatchStage>,
    /// Replace the wall-clock anchor of the running period.
    pub start_time: Option<SystemTime>,
    /// Replace the first-half elapsed bookkeeping.
    pub first_half_elapsed_secs: Option<i64>,
    /// Replace the second-half elapsed bookkeeping.
    pub second_half_elapsed_secs: Option<i64>,
    /// Replace the extra-time elapsed bookkeeping.
    pub extra_time_elapsed_secs: Option<i64>,
}

impl MatchPatch {
    /// Apply this patch to an in-memory match the same way a store update
    /// would, refreshing `updated_at`.
    pub fn apply_to(&self, entity: &mut MatchEntity) {
        if let Some(home_team_id) = self.home_team_id {
            entity.home_team_id = home_team_id;
        }
        if let Some(away_team_id) = self.away_team_id {
            entity.away_team_id = away_team_id;
        }
        if let Some(scheduled_at) = self.scheduled_at {
            entity.scheduled_at = scheduled_at;
        }
        if let Some(is_live) = self.is_live {
            entity.is_live = is_live;
        }
        if let Some(status) = self.status {
            entity.status = status;
        }
        if let Some(stage) = self.stage {
            entity.stage = Some(stage);
        }
        if let Some(start_time) = self.start_time {
            entity.start_time = Some(start_time);
        }
        if let Some(elapsed) = self.first_half_elapsed_secs {
            entity.first_half_elapsed_secs = elapsed;
        }
        if let Some(elapsed) = self.second_half_elapsed_secs {
            entity.second_half_elapsed_secs = elapsed;
        }
        if let Some(elapsed) = self.extra_time_elapsed_secs {
            entity.extra_time_elapsed_secs = elapsed;
        }
        entity.updated_at = SystemTime::now();
    }
}
