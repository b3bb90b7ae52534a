//! In-memory [`MatchStore`] used by service unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;
use uuid::Uuid;

use crate::dao::{
    match_store::MatchStore,
    models::{GoalEntity, MatchEntity, MatchPatch, PlayerEntity, TeamEntity},
    storage::StorageResult,
};

#[derive(Default)]
struct Inner {
    teams: HashMap<Uuid, TeamEntity>,
    players: HashMap<Uuid, PlayerEntity>,
    matches: HashMap<Uuid, MatchEntity>,
    goals: Vec<GoalEntity>,
}

/// Hash-map backed store mirroring the persistence contract for tests.
#[derive(Clone, Default)]
pub struct MemoryMatchStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryMatchStore {
    /// Fresh empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn with_inner<T>(&self, f: impl FnOnce(&mut Inner) -> T) -> T {
        let mut guard = self.inner.lock().expect("memory store poisoned");
        f(&mut guard)
    }
}

impl MatchStore for MemoryMatchStore {
    fn save_team(&self, team: TeamEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.with_inner(|inner| {
                inner.teams.insert(team.id, team);
            });
            Ok(())
        })
    }

    fn find_team(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.with_inner(|inner| inner.teams.get(&id).cloned())) })
    }

    fn list_teams(&self) -> BoxFuture<'static, StorageResult<Vec<TeamEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.with_inner(|inner| inner.teams.values().cloned().collect())) })
    }

    fn delete_team(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.with_inner(|inner| inner.teams.remove(&id).is_some())) })
    }

    fn save_player(&self, player: PlayerEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.with_inner(|inner| {
                inner.players.insert(player.id, player);
            });
            Ok(())
        })
    }

    fn find_player(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.with_inner(|inner| inner.players.get(&id).cloned())) })
    }

    fn list_players(&self) -> BoxFuture<'static, StorageResult<Vec<PlayerEntity>>> {
        let store = self.clone();
        Box::pin(
            async move { Ok(store.with_inner(|inner| inner.players.values().cloned().collect())) },
        )
    }

    fn delete_player(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.with_inner(|inner| inner.players.remove(&id).is_some())) })
    }

    fn save_match(&self, entity: MatchEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.with_inner(|inner| {
                inner.matches.insert(entity.id, entity);
            });
            Ok(())
        })
    }

    fn find_match(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<MatchEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.with_inner(|inner| inner.matches.get(&id).cloned())) })
    }

    fn list_matches(&self) -> BoxFuture<'static, StorageResult<Vec<MatchEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(store.with_inner(|inner| {
                let mut matches: Vec<_> = inner.matches.values().cloned().collect();
                matches.sort_by(|a, b| b.scheduled_at.cmp(&a.scheduled_at));
                matches
            }))
        })
    }

    fn update_match(
        &self,
        id: Uuid,
        patch: MatchPatch,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(store.with_inner(|inner| match inner.matches.get_mut(&id) {
                Some(entity) => {
                    patch.apply_to(entity);
                    true
                }
                None => false,
            }))
        })
    }

    fn delete_match(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.with_inner(|inner| inner.matches.remove(&id).is_some())) })
    }

    fn find_live_match(&self) -> BoxFuture<'static, StorageResult<Option<MatchEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(store
                .with_inner(|inner| inner.matches.values().find(|m| m.is_live).cloned()))
        })
    }

    fn set_all_not_live(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.with_inner(|inner| {
                for entity in inner.matches.values_mut() {
                    entity.is_live = false;
                }
            });
            Ok(())
        })
    }

    fn append_goal(&self, goal: GoalEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.with_inner(|inner| inner.goals.push(goal));
            Ok(())
        })
    }

    fn goals_for_match(
        &self,
        match_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<GoalEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(store.with_inner(|inner| {
                inner
                    .goals
                    .iter()
                    .filter(|goal| goal.match_id == match_id)
                    .cloned()
                    .collect()
            }))
        })
    }

    fn goals_for_player(
        &self,
        player_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<GoalEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(store.with_inner(|inner| {
                inner
                    .goals
                    .iter()
                    .filter(|goal| goal.player_id == player_id)
                    .cloned()
                    .collect()
            }))
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async move { Ok(()) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async move { Ok(()) })
    }
}
