//! Live session coordinator.
//!
//! All state-mutating commands against the single live match run behind one
//! gate mutex and re-read the match from the store immediately before
//! computing their effect, so the read-compute-persist sequence never acts
//! on stale data and never interleaves with another command or a live
//! switch.

use std::time::SystemTime;

use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    dao::models::{GoalEntity, MatchEntity, MatchPatch, MatchSide, MatchStage, MatchStatus},
    dto::common::{GoalFlag, MatchSnapshot, TeamRef},
    error::ServiceError,
    services::live_events,
    state::{
        SharedState,
        clock::{self, ClockCommand, TimerSignal},
    },
};

/// Timer event matching the current persisted state, used to answer
/// `timer:request` for (re)connecting sessions.
pub async fn timer_snapshot(state: &SharedState) -> Result<TimerSignal, ServiceError> {
    let store = state.require_match_store().await?;
    let Some(live) = store.find_live_match().await? else {
        return Ok(TimerSignal::Stop);
    };

    let timings = state.timings().await;
    Ok(clock::timer_signal(&live, SystemTime::now(), &timings))
}

/// Snapshot of the live match, `None` when nothing is live. Answers
/// `match:request` and follows every state-changing command.
pub async fn match_snapshot(state: &SharedState) -> Result<Option<MatchSnapshot>, ServiceError> {
    let store = state.require_match_store().await?;
    let Some(live) = store.find_live_match().await? else {
        return Ok(None);
    };

    Ok(Some(build_snapshot(state, &live).await?))
}

async fn build_snapshot(
    state: &SharedState,
    live: &MatchEntity,
) -> Result<MatchSnapshot, ServiceError> {
    let store = state.require_match_store().await?;

    let home_team = store
        .find_team(live.home_team_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("team `{}` not found", live.home_team_id)))?;
    let away_team = store
        .find_team(live.away_team_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("team `{}` not found", live.away_team_id)))?;

    let goals = store.goals_for_match(live.id).await?;
    let (home_goals, away_goals): (Vec<_>, Vec<_>) = goals
        .iter()
        .partition(|goal| goal.side == MatchSide::Home);

    Ok(MatchSnapshot {
        id: live.id,
        stage: live.stage,
        home_team: TeamRef::from(&home_team),
        away_team: TeamRef::from(&away_team),
        home_team_goals: home_goals.into_iter().map(GoalFlag::from).collect(),
        away_team_goals: away_goals.into_iter().map(GoalFlag::from).collect(),
    })
}

/// Apply one clock command against the live match and broadcast the results.
///
/// Commands arriving while nothing is live, or whose preconditions do not
/// hold, are silently ignored so one stray admin action never disturbs the
/// shared stream.
pub async fn apply_clock_command(
    state: &SharedState,
    command: ClockCommand,
) -> Result<(), ServiceError> {
    let _gate = state.live_gate().lock().await;

    let store = state.require_match_store().await?;
    let Some(live) = store.find_live_match().await? else {
        debug!(?command, "ignoring live command: no live match");
        return Ok(());
    };

    let timings = state.timings().await;
    let outcome = clock::advance(command, &live, SystemTime::now(), &timings);

    if let Some(patch) = outcome.patch {
        store.update_match(live.id, patch).await?;
    }
    if let Some(signal) = outcome.signal {
        live_events::broadcast_timer(state, signal);
    }

    if command.announces_match_info() {
        // Re-read so the snapshot reflects the persisted update.
        let snapshot = match store.find_live_match().await? {
            Some(updated) => Some(build_snapshot(state, &updated).await?),
            None => None,
        };
        live_events::broadcast_match_info(state, snapshot);
    }

    Ok(())
}

/// Rewrite the extra-time duration, in minutes. Shared config is mutated
/// immediately; an extra-time countdown already running keeps its original
/// anchor until the next `start-extraTime`.
pub async fn set_extra_time(state: &SharedState, minutes: i64) -> Result<(), ServiceError> {
    if minutes <= 0 {
        return Err(ServiceError::InvalidInput(
            "extra time must be a positive number of minutes".into(),
        ));
    }

    state.set_extra_time_duration(minutes * 60).await;
    info!(minutes, "extra-time duration updated");
    Ok(())
}

/// Record a goal for `(team_id, player_id)` against the live match.
///
/// The goal is dropped without error unless a live match exists in a
/// scoreable status and the pair belongs to one of the contesting teams;
/// `is_penalty` is fixed at creation from the current stage.
pub async fn record_goal(
    state: &SharedState,
    team_id: Uuid,
    player_id: Uuid,
) -> Result<(), ServiceError> {
    let _gate = state.live_gate().lock().await;

    let store = state.require_match_store().await?;
    let Some(live) = store.find_live_match().await? else {
        debug!(%team_id, %player_id, "ignoring goal: no live match");
        return Ok(());
    };

    if !matches!(live.status, MatchStatus::InProgress | MatchStatus::Paused) {
        debug!(%team_id, status = ?live.status, "ignoring goal: match is not in play");
        return Ok(());
    }

    let Some(side) = live.side_of(team_id) else {
        debug!(%team_id, "ignoring goal: team is not part of the live match");
        return Ok(());
    };

    let Some(player) = store.find_player(player_id).await? else {
        debug!(%player_id, "ignoring goal: unknown player");
        return Ok(());
    };
    if player.team_id != team_id {
        debug!(%player_id, %team_id, "ignoring goal: player does not belong to the team");
        return Ok(());
    }

    let goal = GoalEntity {
        id: Uuid::new_v4(),
        match_id: live.id,
        team_id,
        player_id,
        side,
        is_penalty: live.stage == Some(MatchStage::PenaltyShootout),
        scored_at: SystemTime::now(),
    };
    store.append_goal(goal).await?;

    let team = store
        .find_team(team_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("team `{team_id}` not found")))?;

    let snapshot = build_snapshot(state, &live).await?;
    live_events::broadcast_match_info(state, Some(snapshot));
    live_events::broadcast_goal_scored(state, player.name, team.name);

    Ok(())
}

/// The current live match with teams and goals embedded, for the admin REST
/// surface.
pub async fn current_live(state: &SharedState) -> Result<MatchEntity, ServiceError> {
    let store = state.require_match_store().await?;
    store
        .find_live_match()
        .await?
        .ok_or_else(|| ServiceError::NotFound("no live match".into()))
}

/// Make `match_id` the single live match, clearing the flag everywhere else
/// first.
///
/// Runs under the command gate so the clear-then-set write pair cannot
/// interleave with a live command or another switch in this process. The
/// store-level operation remains two writes; a multi-process deployment
/// would need a conditional update instead.
pub async fn set_live(state: &SharedState, match_id: Uuid) -> Result<MatchEntity, ServiceError> {
    let _gate = state.live_gate().lock().await;

    let store = state.require_match_store().await?;
    if store.find_match(match_id).await?.is_none() {
        return Err(ServiceError::NotFound(format!(
            "match `{match_id}` not found"
        )));
    }

    store.set_all_not_live().await?;
    store
        .update_match(
            match_id,
            MatchPatch {
                is_live: Some(true),
                ..MatchPatch::default()
            },
        )
        .await?;

    let updated = store
        .find_match(match_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("match `{match_id}` not found")))?;
    info!(%match_id, "match set live");
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::{Duration, SystemTime};

    use tokio::sync::broadcast::error::TryRecvError;

    use crate::{
        config::MatchTimings,
        dao::{
            match_store::{MatchStore, memory::MemoryMatchStore},
            models::{PlayerEntity, TeamEntity},
        },
        dto::live::ServerMessage,
        state::AppState,
    };

    struct Fixture {
        state: SharedState,
        store: MemoryMatchStore,
        match_id: Uuid,
        home_team: TeamEntity,
        away_team: TeamEntity,
        home_player: PlayerEntity,
        away_player: PlayerEntity,
    }

    async fn fixture() -> Fixture {
        let store = MemoryMatchStore::new();
        let state = AppState::new(MatchTimings::default());
        state.set_match_store(Arc::new(store.clone())).await;

        let home_team = TeamEntity::new("Harbor City".into());
        let away_team = TeamEntity::new("Northern Rovers".into());
        store.save_team(home_team.clone()).await.unwrap();
        store.save_team(away_team.clone()).await.unwrap();

        let home_player = PlayerEntity::new("Dana Keller".into(), home_team.id);
        let away_player = PlayerEntity::new("Iman Sissoko".into(), away_team.id);
        store.save_player(home_player.clone()).await.unwrap();
        store.save_player(away_player.clone()).await.unwrap();

        let entity = MatchEntity::scheduled(home_team.id, away_team.id, SystemTime::now());
        let match_id = entity.id;
        store.save_match(entity).await.unwrap();

        Fixture {
            state,
            store,
            match_id,
            home_team,
            away_team,
            home_player,
            away_player,
        }
    }

    fn drain(
        receiver: &mut tokio::sync::broadcast::Receiver<ServerMessage>,
    ) -> Vec<ServerMessage> {
        let mut messages = Vec::new();
        while let Ok(message) = receiver.try_recv() {
            messages.push(message);
        }
        messages
    }

    #[tokio::test]
    async fn set_live_keeps_exactly_one_match_live() {
        let fx = fixture().await;
        let other = MatchEntity::scheduled(
            fx.away_team.id,
            fx.home_team.id,
            SystemTime::now() + Duration::from_secs(86_400),
        );
        let other_id = other.id;
        fx.store.save_match(other).await.unwrap();

        set_live(&fx.state, fx.match_id).await.unwrap();
        set_live(&fx.state, other_id).await.unwrap();

        let matches = fx.store.list_matches().await.unwrap();
        let live: Vec<_> = matches.iter().filter(|m| m.is_live).collect();
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].id, other_id);
    }

    #[tokio::test]
    async fn set_live_rejects_unknown_match() {
        let fx = fixture().await;
        let err = set_live(&fx.state, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn first_half_kick_off_broadcasts_timer_and_snapshot() {
        let fx = fixture().await;
        set_live(&fx.state, fx.match_id).await.unwrap();
        let mut events = fx.state.events().subscribe();

        apply_clock_command(&fx.state, ClockCommand::StartFirstHalf)
            .await
            .unwrap();

        let messages = drain(&mut events);
        assert!(matches!(messages[0], ServerMessage::TimerStart(900)));
        match &messages[1] {
            ServerMessage::MatchInfo(Some(snapshot)) => {
                assert_eq!(snapshot.stage, Some(MatchStage::FirstHalf));
                assert_eq!(snapshot.home_team.name, fx.home_team.name);
                assert_eq!(snapshot.away_team.name, fx.away_team.name);
            }
            other => panic!("expected match snapshot, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn pause_then_resume_preserves_remaining_time() {
        let fx = fixture().await;
        set_live(&fx.state, fx.match_id).await.unwrap();
        apply_clock_command(&fx.state, ClockCommand::StartFirstHalf)
            .await
            .unwrap();
        let mut events = fx.state.events().subscribe();

        apply_clock_command(&fx.state, ClockCommand::Pause)
            .await
            .unwrap();
        apply_clock_command(&fx.state, ClockCommand::Resume)
            .await
            .unwrap();

        // Commands run back to back, so the whole half is still on the
        // clock, within tick granularity.
        let messages = drain(&mut events);
        assert!(matches!(messages[0], ServerMessage::TimerPause(secs) if (899..=900).contains(&secs)));
        assert!(matches!(messages[1], ServerMessage::TimerResume(secs) if (899..=900).contains(&secs)));

        let live = fx.store.find_live_match().await.unwrap().unwrap();
        assert_eq!(live.status, MatchStatus::InProgress);
        assert!((0..=1).contains(&live.first_half_elapsed_secs));
        assert!(live.start_time.is_some());
    }

    #[tokio::test]
    async fn second_pause_emits_nothing_further() {
        let fx = fixture().await;
        set_live(&fx.state, fx.match_id).await.unwrap();
        apply_clock_command(&fx.state, ClockCommand::StartFirstHalf)
            .await
            .unwrap();
        apply_clock_command(&fx.state, ClockCommand::Pause)
            .await
            .unwrap();

        let mut events = fx.state.events().subscribe();
        apply_clock_command(&fx.state, ClockCommand::Pause)
            .await
            .unwrap();

        assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
        let live = fx.store.find_live_match().await.unwrap().unwrap();
        assert_eq!(live.status, MatchStatus::Paused);
    }

    #[tokio::test]
    async fn commands_without_a_live_match_are_ignored() {
        let fx = fixture().await;
        let mut events = fx.state.events().subscribe();

        apply_clock_command(&fx.state, ClockCommand::StartFirstHalf)
            .await
            .unwrap();
        apply_clock_command(&fx.state, ClockCommand::Pause)
            .await
            .unwrap();

        assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
        assert_eq!(timer_snapshot(&fx.state).await.unwrap(), TimerSignal::Stop);
        assert_eq!(match_snapshot(&fx.state).await.unwrap(), None);
    }

    #[tokio::test]
    async fn halftime_snapshot_reports_stage_and_stopped_timer() {
        let fx = fixture().await;
        set_live(&fx.state, fx.match_id).await.unwrap();
        apply_clock_command(&fx.state, ClockCommand::StartFirstHalf)
            .await
            .unwrap();
        apply_clock_command(&fx.state, ClockCommand::DeclareHalftime)
            .await
            .unwrap();

        let snapshot = match_snapshot(&fx.state).await.unwrap().unwrap();
        assert_eq!(snapshot.stage, Some(MatchStage::Halftime));
        assert_eq!(timer_snapshot(&fx.state).await.unwrap(), TimerSignal::Stop);
    }

    #[tokio::test]
    async fn shootout_goals_are_penalties_and_regular_goals_are_not() {
        let fx = fixture().await;
        set_live(&fx.state, fx.match_id).await.unwrap();

        apply_clock_command(&fx.state, ClockCommand::StartFirstHalf)
            .await
            .unwrap();
        record_goal(&fx.state, fx.home_team.id, fx.home_player.id)
            .await
            .unwrap();

        apply_clock_command(&fx.state, ClockCommand::StartPenaltyShootout)
            .await
            .unwrap();
        record_goal(&fx.state, fx.away_team.id, fx.away_player.id)
            .await
            .unwrap();

        let goals = fx.store.goals_for_match(fx.match_id).await.unwrap();
        assert_eq!(goals.len(), 2);
        assert!(!goals[0].is_penalty);
        assert!(goals[1].is_penalty);

        let snapshot = match_snapshot(&fx.state).await.unwrap().unwrap();
        assert_eq!(snapshot.home_team_goals.len(), 1);
        assert_eq!(snapshot.away_team_goals.len(), 1);
        assert!(snapshot.away_team_goals[0].is_penalty);
    }

    #[tokio::test]
    async fn goal_broadcasts_snapshot_then_scorer_notification() {
        let fx = fixture().await;
        set_live(&fx.state, fx.match_id).await.unwrap();
        apply_clock_command(&fx.state, ClockCommand::StartFirstHalf)
            .await
            .unwrap();

        let mut events = fx.state.events().subscribe();
        record_goal(&fx.state, fx.home_team.id, fx.home_player.id)
            .await
            .unwrap();

        let messages = drain(&mut events);
        assert!(matches!(messages[0], ServerMessage::MatchInfo(Some(_))));
        match &messages[1] {
            ServerMessage::GoalScored(payload) => {
                assert_eq!(payload.player, fx.home_player.name);
                assert_eq!(payload.team, fx.home_team.name);
            }
            other => panic!("expected goal notification, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn goals_from_invalid_actors_are_silently_dropped() {
        let fx = fixture().await;
        set_live(&fx.state, fx.match_id).await.unwrap();
        apply_clock_command(&fx.state, ClockCommand::StartFirstHalf)
            .await
            .unwrap();
        let mut events = fx.state.events().subscribe();

        // Player on the wrong team.
        record_goal(&fx.state, fx.home_team.id, fx.away_player.id)
            .await
            .unwrap();
        // Team that is not part of the fixture.
        record_goal(&fx.state, Uuid::new_v4(), fx.home_player.id)
            .await
            .unwrap();
        // Unknown player.
        record_goal(&fx.state, fx.home_team.id, Uuid::new_v4())
            .await
            .unwrap();

        assert!(fx.store.goals_for_match(fx.match_id).await.unwrap().is_empty());
        assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn goals_are_rejected_before_kick_off_and_after_full_time() {
        let fx = fixture().await;
        set_live(&fx.state, fx.match_id).await.unwrap();

        record_goal(&fx.state, fx.home_team.id, fx.home_player.id)
            .await
            .unwrap();
        assert!(fx.store.goals_for_match(fx.match_id).await.unwrap().is_empty());

        apply_clock_command(&fx.state, ClockCommand::StartFirstHalf)
            .await
            .unwrap();
        apply_clock_command(&fx.state, ClockCommand::Finish)
            .await
            .unwrap();
        record_goal(&fx.state, fx.home_team.id, fx.home_player.id)
            .await
            .unwrap();
        assert!(fx.store.goals_for_match(fx.match_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn set_extra_time_applies_to_the_next_extra_time_period() {
        let fx = fixture().await;
        set_live(&fx.state, fx.match_id).await.unwrap();
        let mut events = fx.state.events().subscribe();

        set_extra_time(&fx.state, 10).await.unwrap();
        // Config change alone broadcasts nothing.
        assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));

        apply_clock_command(&fx.state, ClockCommand::StartExtraTime)
            .await
            .unwrap();
        let messages = drain(&mut events);
        assert!(matches!(messages[0], ServerMessage::TimerStart(600)));
    }

    #[tokio::test]
    async fn set_extra_time_rejects_non_positive_minutes() {
        let fx = fixture().await;
        let err = set_extra_time(&fx.state, 0).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn finish_stops_the_timer_and_keeps_the_match_in_the_store() {
        let fx = fixture().await;
        set_live(&fx.state, fx.match_id).await.unwrap();
        apply_clock_command(&fx.state, ClockCommand::StartSecondHalf)
            .await
            .unwrap();
        let mut events = fx.state.events().subscribe();

        apply_clock_command(&fx.state, ClockCommand::Finish)
            .await
            .unwrap();

        let messages = drain(&mut events);
        assert!(matches!(messages[0], ServerMessage::TimerStop));
        assert!(matches!(messages[1], ServerMessage::MatchInfo(Some(_))));

        let entity = fx.store.find_match(fx.match_id).await.unwrap().unwrap();
        assert_eq!(entity.status, MatchStatus::Finished);
        assert_eq!(timer_snapshot(&fx.state).await.unwrap(), TimerSignal::Stop);
    }
}
