use std::sync::Arc;

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{Client, Collection, Database, IndexModel, bson::doc, options::IndexOptions};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    config::MongoConfig,
    connection::establish_connection,
    error::{MongoDaoError, MongoResult},
    models::{
        MongoGoalDocument, MongoMatchDocument, MongoPlayerDocument, MongoTeamDocument, doc_id,
        match_patch_update, uuid_as_binary,
    },
};
use crate::dao::{
    match_store::MatchStore,
    models::{GoalEntity, MatchEntity, MatchPatch, PlayerEntity, TeamEntity},
    storage::StorageResult,
};

const TEAM_COLLECTION: &str = "teams";
const PLAYER_COLLECTION: &str = "players";
const MATCH_COLLECTION: &str = "matches";
const GOAL_COLLECTION: &str = "goals";

/// MongoDB-backed implementation of [`MatchStore`].
#[derive(Clone)]
pub struct MongoMatchStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    state: RwLock<MongoState>,
    config: MongoConfig,
}

struct MongoState {
    client: Client,
    database: Database,
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        let database = {
            let guard = self.state.read().await;
            guard.database.clone()
        };

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let (client, database) =
            establish_connection(&self.config.options, &self.config.database_name).await?;
        let mut guard = self.state.write().await;
        guard.client = client;
        guard.database = database;
        Ok(())
    }
}

impl MongoMatchStore {
    /// Establish a connection to MongoDB and ensure indexes are present.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (client, database) =
            establish_connection(&config.options, &config.database_name).await?;

        let inner = Arc::new(MongoInner {
            state: RwLock::new(MongoState { client, database }),
            config,
        });

        let store = Self { inner };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> MongoResult<()> {
        let database = self.database().await;

        let matches = database.collection::<MongoMatchDocument>(MATCH_COLLECTION);
        let live_index = IndexModel::builder()
            .keys(doc! {"is_live": 1})
            .options(
                IndexOptions::builder()
                    .name(Some("match_live_idx".to_owned()))
                    .build(),
            )
            .build();
        matches
            .create_index(live_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: MATCH_COLLECTION,
                index: "is_live",
                source,
            })?;

        let goals = database.collection::<MongoGoalDocument>(GOAL_COLLECTION);
        let goal_index = IndexModel::builder()
            .keys(doc! {"match_id": 1, "scored_at": 1})
            .options(
                IndexOptions::builder()
                    .name(Some("goal_match_idx".to_owned()))
                    .build(),
            )
            .build();
        goals
            .create_index(goal_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: GOAL_COLLECTION,
                index: "match_id,scored_at",
                source,
            })?;

        let players = database.collection::<MongoPlayerDocument>(PLAYER_COLLECTION);
        let player_index = IndexModel::builder()
            .keys(doc! {"team_id": 1})
            .options(
                IndexOptions::builder()
                    .name(Some("player_team_idx".to_owned()))
                    .build(),
            )
            .build();
        players
            .create_index(player_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: PLAYER_COLLECTION,
                index: "team_id",
                source,
            })?;

        Ok(())
    }

    async fn database(&self) -> Database {
        let guard = self.inner.state.read().await;
        guard.database.clone()
    }

    async fn team_collection(&self) -> Collection<MongoTeamDocument> {
        self.database()
            .await
            .collection::<MongoTeamDocument>(TEAM_COLLECTION)
    }

    async fn player_collection(&self) -> Collection<MongoPlayerDocument> {
        self.database()
            .await
            .collection::<MongoPlayerDocument>(PLAYER_COLLECTION)
    }

    async fn match_collection(&self) -> Collection<MongoMatchDocument> {
        self.database()
            .await
            .collection::<MongoMatchDocument>(MATCH_COLLECTION)
    }

    async fn goal_collection(&self) -> Collection<MongoGoalDocument> {
        self.database()
            .await
            .collection::<MongoGoalDocument>(GOAL_COLLECTION)
    }

    async fn save_team(&self, team: TeamEntity) -> MongoResult<()> {
        let id = team.id;
        let document: MongoTeamDocument = team.into();
        self.team_collection()
            .await
            .replace_one(doc_id(id), &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::SaveRecord {
                collection: TEAM_COLLECTION,
                id,
                source,
            })?;
        Ok(())
    }

    async fn find_team(&self, id: Uuid) -> MongoResult<Option<TeamEntity>> {
        let document = self
            .team_collection()
            .await
            .find_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::LoadRecord {
                collection: TEAM_COLLECTION,
                id,
                source,
            })?;
        Ok(document.map(Into::into))
    }

    async fn list_teams(&self) -> MongoResult<Vec<TeamEntity>> {
        let documents: Vec<MongoTeamDocument> = self
            .team_collection()
            .await
            .find(doc! {})
            .sort(doc! {"name": 1})
            .await
            .map_err(|source| MongoDaoError::ListCollection {
                collection: TEAM_COLLECTION,
                source,
            })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListCollection {
                collection: TEAM_COLLECTION,
                source,
            })?;
        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn delete_team(&self, id: Uuid) -> MongoResult<bool> {
        let result = self
            .team_collection()
            .await
            .delete_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::DeleteRecord {
                collection: TEAM_COLLECTION,
                id,
                source,
            })?;
        Ok(result.deleted_count > 0)
    }

    async fn save_player(&self, player: PlayerEntity) -> MongoResult<()> {
        let id = player.id;
        let document: MongoPlayerDocument = player.into();
        self.player_collection()
            .await
            .replace_one(doc_id(id), &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::SaveRecord {
                collection: PLAYER_COLLECTION,
                id,
                source,
            })?;
        Ok(())
    }

    async fn find_player(&self, id: Uuid) -> MongoResult<Option<PlayerEntity>> {
        let document = self
            .player_collection()
            .await
            .find_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::LoadRecord {
                collection: PLAYER_COLLECTION,
                id,
                source,
            })?;
        Ok(document.map(Into::into))
    }

    async fn list_players(&self) -> MongoResult<Vec<PlayerEntity>> {
        let documents: Vec<MongoPlayerDocument> = self
            .player_collection()
            .await
            .find(doc! {})
            .sort(doc! {"name": 1})
            .await
            .map_err(|source| MongoDaoError::ListCollection {
                collection: PLAYER_COLLECTION,
                source,
            })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListCollection {
                collection: PLAYER_COLLECTION,
                source,
            })?;
        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn delete_player(&self, id: Uuid) -> MongoResult<bool> {
        let result = self
            .player_collection()
            .await
            .delete_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::DeleteRecord {
                collection: PLAYER_COLLECTION,
                id,
                source,
            })?;
        Ok(result.deleted_count > 0)
    }

    async fn save_match(&self, entity: MatchEntity) -> MongoResult<()> {
        let id = entity.id;
        let document: MongoMatchDocument = entity.into();
        self.match_collection()
            .await
            .replace_one(doc_id(id), &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::SaveRecord {
                collection: MATCH_COLLECTION,
                id,
                source,
            })?;
        Ok(())
    }

    async fn find_match(&self, id: Uuid) -> MongoResult<Option<MatchEntity>> {
        let document = self
            .match_collection()
            .await
            .find_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::LoadRecord {
                collection: MATCH_COLLECTION,
                id,
                source,
            })?;
        Ok(document.map(Into::into))
    }

    async fn list_matches(&self) -> MongoResult<Vec<MatchEntity>> {
        let documents: Vec<MongoMatchDocument> = self
            .match_collection()
            .await
            .find(doc! {})
            .sort(doc! {"scheduled_at": -1})
            .await
            .map_err(|source| MongoDaoError::ListCollection {
                collection: MATCH_COLLECTION,
                source,
            })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListCollection {
                collection: MATCH_COLLECTION,
                source,
            })?;
        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn update_match(&self, id: Uuid, patch: MatchPatch) -> MongoResult<bool> {
        let update = match_patch_update(id, &patch)?;
        let result = self
            .match_collection()
            .await
            .update_one(doc_id(id), update)
            .await
            .map_err(|source| MongoDaoError::SaveRecord {
                collection: MATCH_COLLECTION,
                id,
                source,
            })?;
        Ok(result.matched_count > 0)
    }

    async fn delete_match(&self, id: Uuid) -> MongoResult<bool> {
        let result = self
            .match_collection()
            .await
            .delete_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::DeleteRecord {
                collection: MATCH_COLLECTION,
                id,
                source,
            })?;
        Ok(result.deleted_count > 0)
    }

    async fn find_live_match(&self) -> MongoResult<Option<MatchEntity>> {
        let document = self
            .match_collection()
            .await
            .find_one(doc! {"is_live": true})
            .await
            .map_err(|source| MongoDaoError::ListCollection {
                collection: MATCH_COLLECTION,
                source,
            })?;
        Ok(document.map(Into::into))
    }

    async fn set_all_not_live(&self) -> MongoResult<()> {
        self.match_collection()
            .await
            .update_many(doc! {}, doc! {"$set": {"is_live": false}})
            .await
            .map_err(|source| MongoDaoError::UpdateLiveFlags { source })?;
        Ok(())
    }

    async fn append_goal(&self, goal: GoalEntity) -> MongoResult<()> {
        let id = goal.id;
        let document: MongoGoalDocument = goal.into();
        self.goal_collection()
            .await
            .insert_one(&document)
            .await
            .map_err(|source| MongoDaoError::SaveRecord {
                collection: GOAL_COLLECTION,
                id,
                source,
            })?;
        Ok(())
    }

    async fn goals_for_match(&self, match_id: Uuid) -> MongoResult<Vec<GoalEntity>> {
        let documents: Vec<MongoGoalDocument> = self
            .goal_collection()
            .await
            .find(doc! {"match_id": uuid_as_binary(match_id)})
            .sort(doc! {"scored_at": 1})
            .await
            .map_err(|source| MongoDaoError::ListCollection {
                collection: GOAL_COLLECTION,
                source,
            })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListCollection {
                collection: GOAL_COLLECTION,
                source,
            })?;
        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn goals_for_player(&self, player_id: Uuid) -> MongoResult<Vec<GoalEntity>> {
        let documents: Vec<MongoGoalDocument> = self
            .goal_collection()
            .await
            .find(doc! {"player_id": uuid_as_binary(player_id)})
            .sort(doc! {"scored_at": 1})
            .await
            .map_err(|source| MongoDaoError::ListCollection {
                collection: GOAL_COLLECTION,
                source,
            })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListCollection {
                collection: GOAL_COLLECTION,
                source,
            })?;
        Ok(documents.into_iter().map(Into::into).collect())
    }
}

impl MatchStore for MongoMatchStore {
    fn save_team(&self, team: TeamEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_team(team).await.map_err(Into::into) })
    }

    fn find_team(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_team(id).await.map_err(Into::into) })
    }

    fn list_teams(&self) -> BoxFuture<'static, StorageResult<Vec<TeamEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_teams().await.map_err(Into::into) })
    }

    fn delete_team(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.delete_team(id).await.map_err(Into::into) })
    }

    fn save_player(&self, player: PlayerEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_player(player).await.map_err(Into::into) })
    }

    fn find_player(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_player(id).await.map_err(Into::into) })
    }

    fn list_players(&self) -> BoxFuture<'static, StorageResult<Vec<PlayerEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_players().await.map_err(Into::into) })
    }

    fn delete_player(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.delete_player(id).await.map_err(Into::into) })
    }

    fn save_match(&self, entity: MatchEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_match(entity).await.map_err(Into::into) })
    }

    fn find_match(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<MatchEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_match(id).await.map_err(Into::into) })
    }

    fn list_matches(&self) -> BoxFuture<'static, StorageResult<Vec<MatchEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_matches().await.map_err(Into::into) })
    }

    fn update_match(
        &self,
        id: Uuid,
        patch: MatchPatch,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.update_match(id, patch).await.map_err(Into::into) })
    }

    fn delete_match(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.delete_match(id).await.map_err(Into::into) })
    }

    fn find_live_match(&self) -> BoxFuture<'static, StorageResult<Option<MatchEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_live_match().await.map_err(Into::into) })
    }

    fn set_all_not_live(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.set_all_not_live().await.map_err(Into::into) })
    }

    fn append_goal(&self, goal: GoalEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.append_goal(goal).await.map_err(Into::into) })
    }

    fn goals_for_match(
        &self,
        match_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<GoalEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.goals_for_match(match_id).await.map_err(Into::into) })
    }

    fn goals_for_player(
        &self,
        player_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<GoalEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.goals_for_player(player_id).await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.reconnect().await.map_err(Into::into) })
    }
}
