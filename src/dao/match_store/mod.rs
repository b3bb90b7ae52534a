#[cfg(test)]
pub mod memory;
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use crate::dao::models::{GoalEntity, MatchEntity, MatchPatch, PlayerEntity, TeamEntity};
use crate::dao::storage::StorageResult;
use futures::future::BoxFuture;
use uuid::Uuid;

/// Abstraction over the persistence layer for teams, players, matches, and
/// goals.
///
/// `save_*` methods upsert; `delete_*` and `update_match` report whether a
/// record was actually touched so callers can map misses to not-found.
pub trait MatchStore: Send + Sync {
    fn save_team(&self, team: TeamEntity) -> BoxFuture<'static, StorageResult<()>>;
    fn find_team(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>>;
    fn list_teams(&self) -> BoxFuture<'static, StorageResult<Vec<TeamEntity>>>;
    fn delete_team(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>>;

    fn save_player(&self, player: PlayerEntity) -> BoxFuture<'static, StorageResult<()>>;
    fn find_player(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>>;
    fn list_players(&self) -> BoxFuture<'static, StorageResult<Vec<PlayerEntity>>>;
    fn delete_player(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>>;

    fn save_match(&self, entity: MatchEntity) -> BoxFuture<'static, StorageResult<()>>;
    fn find_match(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<MatchEntity>>>;
    /// All matches, most recently scheduled first.
    fn list_matches(&self) -> BoxFuture<'static, StorageResult<Vec<MatchEntity>>>;
    fn update_match(&self, id: Uuid, patch: MatchPatch)
    -> BoxFuture<'static, StorageResult<bool>>;
    fn delete_match(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>>;

    /// The single live match, if any.
    fn find_live_match(&self) -> BoxFuture<'static, StorageResult<Option<MatchEntity>>>;
    /// Clear the live flag on every match.
    fn set_all_not_live(&self) -> BoxFuture<'static, StorageResult<()>>;

    fn append_goal(&self, goal: GoalEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Goals of a match ordered by creation time.
    fn goals_for_match(&self, match_id: Uuid)
    -> BoxFuture<'static, StorageResult<Vec<GoalEntity>>>;
    /// Goals credited to a player ordered by creation time.
    fn goals_for_player(
        &self,
        player_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<GoalEntity>>>;

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
