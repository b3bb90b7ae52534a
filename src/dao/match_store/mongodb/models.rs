use mongodb::bson::{Binary, DateTime, Document, doc, serialize_to_bson, spec::BinarySubtype};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{MongoDaoError, MongoResult};
use crate::dao::models::{
    GoalEntity, MatchEntity, MatchPatch, MatchSide, MatchStage, MatchStatus, PlayerEntity,
    TeamEntity,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoTeamDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    name: String,
    created_at: DateTime,
    updated_at: DateTime,
}

impl From<TeamEntity> for MongoTeamDocument {
    fn from(value: TeamEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            created_at: DateTime::from_system_time(value.created_at),
            updated_at: DateTime::from_system_time(value.updated_at),
        }
    }
}

impl From<MongoTeamDocument> for TeamEntity {
    fn from(value: MongoTeamDocument) -> Self {
        Self {
            id: value.id,
            name: value.name,
            created_at: value.created_at.to_system_time(),
            updated_at: value.updated_at.to_system_time(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoPlayerDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    name: String,
    team_id: Uuid,
    created_at: DateTime,
    updated_at: DateTime,
}

impl From<PlayerEntity> for MongoPlayerDocument {
    fn from(value: PlayerEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            team_id: value.team_id,
            created_at: DateTime::from_system_time(value.created_at),
            updated_at: DateTime::from_system_time(value.updated_at),
        }
    }
}

impl From<MongoPlayerDocument> for PlayerEntity {
    fn from(value: MongoPlayerDocument) -> Self {
        Self {
            id: value.id,
            name: value.name,
            team_id: value.team_id,
            created_at: value.created_at.to_system_time(),
            updated_at: value.updated_at.to_system_time(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoMatchDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    home_team_id: Uuid,
    away_team_id: Uuid,
    scheduled_at: DateTime,
    #[serde(default)]
    is_live: bool,
    status: MatchStatus,
    #[serde(default)]
    stage: Option<MatchStage>,
    #[serde(default)]
    start_time: Option<DateTime>,
    #[serde(default)]
    first_half_elapsed_secs: i64,
    #[serde(default)]
    second_half_elapsed_secs: i64,
    #[serde(default)]
    extra_time_elapsed_secs: i64,
    created_at: DateTime,
    updated_at: DateTime,
}

impl From<MatchEntity> for MongoMatchDocument {
    fn from(value: MatchEntity) -> Self {
        Self {
            id: value.id,
            home_team_id: value.home_team_id,
            away_team_id: value.away_team_id,
            scheduled_at: DateTime::from_system_time(value.scheduled_at),
            is_live: value.is_live,
            status: value.status,
            stage: value.stage,
            start_time: value.start_time.map(DateTime::from_system_time),
            first_half_elapsed_secs: value.first_half_elapsed_secs,
            second_half_elapsed_secs: value.second_half_elapsed_secs,
            extra_time_elapsed_secs: value.extra_time_elapsed_secs,
            created_at: DateTime::from_system_time(value.created_at),
            updated_at: DateTime::from_system_time(value.updated_at),
        }
    }
}

impl From<MongoMatchDocument> for MatchEntity {
    fn from(value: MongoMatchDocument) -> Self {
        Self {
            id: value.id,
            home_team_id: value.home_team_id,
            away_team_id: value.away_team_id,
            scheduled_at: value.scheduled_at.to_system_time(),
            is_live: value.is_live,
            status: value.status,
            stage: value.stage,
            start_time: value.start_time.map(|ts| ts.to_system_time()),
            first_half_elapsed_secs: value.first_half_elapsed_secs,
            second_half_elapsed_secs: value.second_half_elapsed_secs,
            extra_time_elapsed_secs: value.extra_time_elapsed_secs,
            created_at: value.created_at.to_system_time(),
            updated_at: value.updated_at.to_system_time(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoGoalDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    match_id: Uuid,
    team_id: Uuid,
    player_id: Uuid,
    side: MatchSide,
    is_penalty: bool,
    scored_at: DateTime,
}

impl From<GoalEntity> for MongoGoalDocument {
    fn from(value: GoalEntity) -> Self {
        Self {
            id: value.id,
            match_id: value.match_id,
            team_id: value.team_id,
            player_id: value.player_id,
            side: value.side,
            is_penalty: value.is_penalty,
            scored_at: DateTime::from_system_time(value.scored_at),
        }
    }
}

impl From<MongoGoalDocument> for GoalEntity {
    fn from(value: MongoGoalDocument) -> Self {
        Self {
            id: value.id,
            match_id: value.match_id,
            team_id: value.team_id,
            player_id: value.player_id,
            side: value.side,
            is_penalty: value.is_penalty,
            scored_at: value.scored_at.to_system_time(),
        }
    }
}

pub fn uuid_as_binary(id: Uuid) -> Binary {
    Binary {
        subtype: BinarySubtype::Uuid,
        bytes: id.into_bytes().to_vec(),
    }
}

pub fn doc_id(id: Uuid) -> Document {
    doc! {"_id": uuid_as_binary(id)}
}

/// Translate a [`MatchPatch`] into a `$set` update document, always bumping
/// `updated_at`.
pub fn match_patch_update(id: Uuid, patch: &MatchPatch) -> MongoResult<Document> {
    let encode = |err| MongoDaoError::EncodePatch { id, source: err };
    let mut set = doc! {"updated_at": DateTime::now()};

    if let Some(home_team_id) = patch.home_team_id {
        set.insert("home_team_id", uuid_as_binary(home_team_id));
    }
    if let Some(away_team_id) = patch.away_team_id {
        set.insert("away_team_id", uuid_as_binary(away_team_id));
    }
    if let Some(scheduled_at) = patch.scheduled_at {
        set.insert("scheduled_at", DateTime::from_system_time(scheduled_at));
    }
    if let Some(is_live) = patch.is_live {
        set.insert("is_live", is_live);
    }
    if let Some(status) = patch.status {
        set.insert("status", serialize_to_bson(&status).map_err(encode)?);
    }
    if let Some(stage) = patch.stage {
        set.insert("stage", serialize_to_bson(&stage).map_err(encode)?);
    }
    if let Some(start_time) = patch.start_time {
        set.insert("start_time", DateTime::from_system_time(start_time));
    }
    if let Some(elapsed) = patch.first_half_elapsed_secs {
        set.insert("first_half_elapsed_secs", elapsed);
    }
    if let Some(elapsed) = patch.second_half_elapsed_secs {
        set.insert("second_half_elapsed_secs", elapsed);
    }
    if let Some(elapsed) = patch.extra_time_elapsed_secs {
        set.insert("extra_time_elapsed_secs", elapsed);
    }

    Ok(doc! {"$set": set})
}
