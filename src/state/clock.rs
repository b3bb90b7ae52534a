//! Pure clock engine for the live match.
//!
//! Remaining time is always derived from a wall-clock anchor
//! (`start_time`) plus the configured period duration, never stored
//! directly; a pause captures the consumed seconds into the per-stage
//! elapsed field, and a resume re-anchors `start_time` so that
//! `now - start_time` equals the stored elapsed value again. The engine
//! performs no I/O: callers read the match, feed it here, and persist the
//! returned patch.

use std::time::{Duration, SystemTime};

use crate::{
    config::MatchTimings,
    dao::models::{MatchEntity, MatchPatch, MatchStage, MatchStatus},
};

/// Timer event produced by a clock computation, carrying remaining seconds
/// where applicable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerSignal {
    /// A countdown is running from the given remaining seconds.
    Start(i64),
    /// The countdown is frozen at the given remaining seconds.
    Pause(i64),
    /// The countdown continues from the given remaining seconds.
    Resume(i64),
    /// No countdown applies.
    Stop,
}

/// Admin command fed to the clock engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockCommand {
    /// Kick off the first half.
    StartFirstHalf,
    /// Kick off the second half.
    StartSecondHalf,
    /// Enter the untimed halftime break.
    DeclareHalftime,
    /// Kick off the extra-time period.
    StartExtraTime,
    /// Enter the untimed penalty shootout.
    StartPenaltyShootout,
    /// Freeze the running countdown.
    Pause,
    /// Continue a paused countdown.
    Resume,
    /// End the match.
    Finish,
}

impl ClockCommand {
    /// Whether the coordinator re-broadcasts the match snapshot after this
    /// command. Pause/resume only touch the timer.
    pub fn announces_match_info(self) -> bool {
        !matches!(self, ClockCommand::Pause | ClockCommand::Resume)
    }
}

/// Result of advancing the clock: an optional partial update to persist and
/// an optional timer event to broadcast. Both absent means the command was
/// ignored.
#[derive(Debug, Clone)]
pub struct ClockOutcome {
    /// Fields to persist on the live match.
    pub patch: Option<MatchPatch>,
    /// Timer event to fan out to every session.
    pub signal: Option<TimerSignal>,
}

impl ClockOutcome {
    fn ignored() -> Self {
        Self {
            patch: None,
            signal: None,
        }
    }

    fn signal_only(signal: TimerSignal) -> Self {
        Self {
            patch: None,
            signal: Some(signal),
        }
    }
}

/// Countdown length for a stage; `None` for the untimed stages.
fn stage_duration_secs(stage: MatchStage, timings: &MatchTimings) -> Option<i64> {
    match stage {
        MatchStage::FirstHalf | MatchStage::SecondHalf => Some(timings.half_duration_secs),
        MatchStage::ExtraTime => Some(timings.extra_time_duration_secs),
        MatchStage::Halftime | MatchStage::PenaltyShootout => None,
    }
}

fn wall_elapsed_secs(start: SystemTime, now: SystemTime) -> i64 {
    now.duration_since(start)
        .map(|elapsed| elapsed.as_secs() as i64)
        .unwrap_or(0)
}

fn stored_elapsed_secs(entity: &MatchEntity, stage: MatchStage) -> i64 {
    match stage {
        MatchStage::FirstHalf => entity.first_half_elapsed_secs,
        MatchStage::SecondHalf => entity.second_half_elapsed_secs,
        MatchStage::ExtraTime => entity.extra_time_elapsed_secs,
        MatchStage::Halftime | MatchStage::PenaltyShootout => 0,
    }
}

/// Seconds left on the countdown at `now`, or `None` when no countdown
/// applies (untimed stage, not started, finished).
///
/// The value may be negative once the period overruns; clamping to zero
/// happens at the wire boundary.
pub fn remaining_secs(
    entity: &MatchEntity,
    now: SystemTime,
    timings: &MatchTimings,
) -> Option<i64> {
    let stage = entity.stage?;
    let duration = stage_duration_secs(stage, timings)?;
    match entity.status {
        MatchStatus::InProgress => {
            let start = entity.start_time?;
            Some(duration - wall_elapsed_secs(start, now))
        }
        MatchStatus::Paused => Some(duration - stored_elapsed_secs(entity, stage)),
        MatchStatus::NotStarted | MatchStatus::Finished => None,
    }
}

/// The timer event a (re)connecting session should receive for the current
/// persisted state. This is the only catch-up mechanism: late joiners pull
/// the same computation every other session saw pushed.
pub fn timer_signal(entity: &MatchEntity, now: SystemTime, timings: &MatchTimings) -> TimerSignal {
    match entity.status {
        MatchStatus::InProgress => match remaining_secs(entity, now, timings) {
            Some(remaining) => TimerSignal::Start(remaining),
            None => TimerSignal::Stop,
        },
        MatchStatus::Paused => match remaining_secs(entity, now, timings) {
            Some(remaining) => TimerSignal::Pause(remaining),
            None => TimerSignal::Stop,
        },
        MatchStatus::NotStarted | MatchStatus::Finished => TimerSignal::Stop,
    }
}

/// Advance the persisted clock state for one admin command.
///
/// One rule per command; commands whose preconditions do not hold (pausing a
/// match that is not running, resuming one that is not paused) are ignored
/// so a stray admin click never disturbs the broadcast stream.
pub fn advance(
    command: ClockCommand,
    entity: &MatchEntity,
    now: SystemTime,
    timings: &MatchTimings,
) -> ClockOutcome {
    match command {
        ClockCommand::StartFirstHalf => kick_off(MatchStage::FirstHalf, now, timings),
        ClockCommand::StartSecondHalf => kick_off(MatchStage::SecondHalf, now, timings),
        ClockCommand::DeclareHalftime => kick_off(MatchStage::Halftime, now, timings),
        ClockCommand::StartExtraTime => kick_off(MatchStage::ExtraTime, now, timings),
        ClockCommand::StartPenaltyShootout => kick_off(MatchStage::PenaltyShootout, now, timings),
        ClockCommand::Pause => pause(entity, now, timings),
        ClockCommand::Resume => resume(entity, now, timings),
        ClockCommand::Finish => ClockOutcome {
            patch: Some(MatchPatch {
                status: Some(MatchStatus::Finished),
                ..MatchPatch::default()
            }),
            signal: Some(TimerSignal::Stop),
        },
    }
}

/// Every stage entry runs the same way: the stage becomes current, the match
/// is in progress, and the wall clock is re-anchored to `now`. Timed stages
/// start a fresh countdown, untimed ones stop the board.
fn kick_off(stage: MatchStage, now: SystemTime, timings: &MatchTimings) -> ClockOutcome {
    let signal = match stage_duration_secs(stage, timings) {
        Some(duration) => TimerSignal::Start(duration),
        None => TimerSignal::Stop,
    };

    ClockOutcome {
        patch: Some(MatchPatch {
            stage: Some(stage),
            status: Some(MatchStatus::InProgress),
            start_time: Some(now),
            ..MatchPatch::default()
        }),
        signal: Some(signal),
    }
}

fn pause(entity: &MatchEntity, now: SystemTime, timings: &MatchTimings) -> ClockOutcome {
    if entity.status != MatchStatus::InProgress {
        return ClockOutcome::ignored();
    }
    let Some(stage) = entity.stage else {
        return ClockOutcome::ignored();
    };
    let Some(duration) = stage_duration_secs(stage, timings) else {
        // Untimed stage: nothing to freeze, just confirm the stopped board.
        return ClockOutcome::signal_only(TimerSignal::Stop);
    };
    let Some(start) = entity.start_time else {
        return ClockOutcome::ignored();
    };

    let elapsed = wall_elapsed_secs(start, now);
    let mut patch = MatchPatch {
        status: Some(MatchStatus::Paused),
        ..MatchPatch::default()
    };
    match stage {
        MatchStage::FirstHalf => patch.first_half_elapsed_secs = Some(elapsed),
        MatchStage::SecondHalf => patch.second_half_elapsed_secs = Some(elapsed),
        MatchStage::ExtraTime => patch.extra_time_elapsed_secs = Some(elapsed),
        MatchStage::Halftime | MatchStage::PenaltyShootout => {}
    }

    ClockOutcome {
        patch: Some(patch),
        signal: Some(TimerSignal::Pause(duration - elapsed)),
    }
}

fn resume(entity: &MatchEntity, now: SystemTime, timings: &MatchTimings) -> ClockOutcome {
    if entity.status != MatchStatus::Paused {
        return ClockOutcome::ignored();
    }
    let Some(stage) = entity.stage else {
        return ClockOutcome::ignored();
    };
    let Some(duration) = stage_duration_secs(stage, timings) else {
        return ClockOutcome::signal_only(TimerSignal::Stop);
    };

    let elapsed = stored_elapsed_secs(entity, stage);
    // Re-anchor so that `now - start_time` reproduces the stored elapsed
    // time for every later remaining() computation.
    let start_time = now - Duration::from_secs(elapsed.max(0) as u64);

    ClockOutcome {
        patch: Some(MatchPatch {
            status: Some(MatchStatus::InProgress),
            start_time: Some(start_time),
            ..MatchPatch::default()
        }),
        signal: Some(TimerSignal::Resume(duration - elapsed)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    const HALF: i64 = 900;
    const EXTRA: i64 = 600;

    fn timings() -> MatchTimings {
        MatchTimings {
            half_duration_secs: HALF,
            extra_time_duration_secs: EXTRA,
            penalty_shootout_duration_secs: 900,
        }
    }

    fn t(secs: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000 + secs)
    }

    fn live_match() -> MatchEntity {
        let mut entity = MatchEntity::scheduled(Uuid::new_v4(), Uuid::new_v4(), t(0));
        entity.is_live = true;
        entity
    }

    fn apply(entity: &mut MatchEntity, command: ClockCommand, now: SystemTime) -> ClockOutcome {
        let outcome = advance(command, entity, now, &timings());
        if let Some(patch) = &outcome.patch {
            patch.apply_to(entity);
        }
        outcome
    }

    #[test]
    fn first_half_kick_off_starts_full_countdown() {
        let mut entity = live_match();
        let outcome = apply(&mut entity, ClockCommand::StartFirstHalf, t(0));

        assert_eq!(outcome.signal, Some(TimerSignal::Start(HALF)));
        assert_eq!(entity.status, MatchStatus::InProgress);
        assert_eq!(entity.stage, Some(MatchStage::FirstHalf));
        assert_eq!(entity.start_time, Some(t(0)));
        assert_eq!(remaining_secs(&entity, t(0), &timings()), Some(HALF));
    }

    #[test]
    fn remaining_counts_down_against_the_wall_clock() {
        let mut entity = live_match();
        apply(&mut entity, ClockCommand::StartFirstHalf, t(0));

        assert_eq!(remaining_secs(&entity, t(300), &timings()), Some(HALF - 300));
        // A period that overruns goes negative; the wire layer clamps.
        assert_eq!(remaining_secs(&entity, t(1000), &timings()), Some(-100));
    }

    #[test]
    fn pause_persists_elapsed_and_freezes_remaining() {
        let mut entity = live_match();
        apply(&mut entity, ClockCommand::StartFirstHalf, t(0));
        let outcome = apply(&mut entity, ClockCommand::Pause, t(300));

        assert_eq!(outcome.signal, Some(TimerSignal::Pause(600)));
        assert_eq!(entity.status, MatchStatus::Paused);
        assert_eq!(entity.first_half_elapsed_secs, 300);
        // Frozen: the answer does not change while paused.
        assert_eq!(remaining_secs(&entity, t(450), &timings()), Some(600));
    }

    #[test]
    fn resume_re_anchors_start_time_and_preserves_remaining() {
        let mut entity = live_match();
        apply(&mut entity, ClockCommand::StartFirstHalf, t(0));
        apply(&mut entity, ClockCommand::Pause, t(300));
        let outcome = apply(&mut entity, ClockCommand::Resume, t(400));

        assert_eq!(outcome.signal, Some(TimerSignal::Resume(600)));
        assert_eq!(entity.status, MatchStatus::InProgress);
        assert_eq!(entity.start_time, Some(t(400) - Duration::from_secs(300)));
        assert_eq!(remaining_secs(&entity, t(400), &timings()), Some(600));
    }

    #[test]
    fn pause_resume_round_trip_over_every_timed_stage() {
        for (command, stage) in [
            (ClockCommand::StartFirstHalf, MatchStage::FirstHalf),
            (ClockCommand::StartSecondHalf, MatchStage::SecondHalf),
            (ClockCommand::StartExtraTime, MatchStage::ExtraTime),
        ] {
            let duration = stage_duration_secs(stage, &timings()).unwrap();
            let mut entity = live_match();
            apply(&mut entity, command, t(0));
            apply(&mut entity, ClockCommand::Pause, t(120));
            apply(&mut entity, ClockCommand::Resume, t(500));

            assert_eq!(entity.stage, Some(stage));
            assert_eq!(
                remaining_secs(&entity, t(500), &timings()),
                Some(duration - 120)
            );
        }
    }

    #[test]
    fn second_pause_is_a_no_op_without_any_event() {
        let mut entity = live_match();
        apply(&mut entity, ClockCommand::StartFirstHalf, t(0));
        apply(&mut entity, ClockCommand::Pause, t(300));
        let before = entity.clone();

        let outcome = apply(&mut entity, ClockCommand::Pause, t(350));
        assert!(outcome.patch.is_none());
        assert!(outcome.signal.is_none());
        assert_eq!(entity, before);
    }

    #[test]
    fn resume_requires_a_paused_match() {
        let mut entity = live_match();
        apply(&mut entity, ClockCommand::StartFirstHalf, t(0));

        let outcome = advance(ClockCommand::Resume, &entity, t(10), &timings());
        assert!(outcome.patch.is_none());
        assert!(outcome.signal.is_none());
    }

    #[test]
    fn halftime_and_shootout_stop_the_board() {
        let mut entity = live_match();
        apply(&mut entity, ClockCommand::StartFirstHalf, t(0));
        let outcome = apply(&mut entity, ClockCommand::DeclareHalftime, t(900));

        assert_eq!(outcome.signal, Some(TimerSignal::Stop));
        assert_eq!(entity.stage, Some(MatchStage::Halftime));
        assert_eq!(entity.status, MatchStatus::InProgress);
        assert_eq!(remaining_secs(&entity, t(901), &timings()), None);
        assert_eq!(timer_signal(&entity, t(901), &timings()), TimerSignal::Stop);

        let outcome = apply(&mut entity, ClockCommand::StartPenaltyShootout, t(950));
        assert_eq!(outcome.signal, Some(TimerSignal::Stop));
        assert_eq!(entity.stage, Some(MatchStage::PenaltyShootout));
    }

    #[test]
    fn pausing_an_untimed_stage_persists_nothing() {
        let mut entity = live_match();
        apply(&mut entity, ClockCommand::DeclareHalftime, t(0));
        let before = entity.clone();

        let outcome = advance(ClockCommand::Pause, &entity, t(60), &timings());
        assert!(outcome.patch.is_none());
        assert_eq!(outcome.signal, Some(TimerSignal::Stop));
        assert_eq!(entity, before);
    }

    #[test]
    fn resuming_halftime_only_confirms_the_stopped_board() {
        let mut entity = live_match();
        apply(&mut entity, ClockCommand::DeclareHalftime, t(0));
        entity.status = MatchStatus::Paused;

        let outcome = advance(ClockCommand::Resume, &entity, t(60), &timings());
        assert!(outcome.patch.is_none());
        assert_eq!(outcome.signal, Some(TimerSignal::Stop));
    }

    #[test]
    fn extra_time_uses_its_own_duration() {
        let mut entity = live_match();
        let outcome = apply(&mut entity, ClockCommand::StartExtraTime, t(0));
        assert_eq!(outcome.signal, Some(TimerSignal::Start(EXTRA)));
        assert_eq!(remaining_secs(&entity, t(60), &timings()), Some(EXTRA - 60));
    }

    #[test]
    fn finish_stops_the_timer_and_closes_the_match() {
        let mut entity = live_match();
        apply(&mut entity, ClockCommand::StartSecondHalf, t(0));
        let outcome = apply(&mut entity, ClockCommand::Finish, t(30));

        assert_eq!(outcome.signal, Some(TimerSignal::Stop));
        assert_eq!(entity.status, MatchStatus::Finished);
        assert_eq!(remaining_secs(&entity, t(31), &timings()), None);
        assert_eq!(timer_signal(&entity, t(31), &timings()), TimerSignal::Stop);
    }

    #[test]
    fn late_joiner_signal_matches_the_persisted_state() {
        let mut entity = live_match();
        assert_eq!(timer_signal(&entity, t(0), &timings()), TimerSignal::Stop);

        apply(&mut entity, ClockCommand::StartFirstHalf, t(0));
        assert_eq!(
            timer_signal(&entity, t(100), &timings()),
            TimerSignal::Start(HALF - 100)
        );

        apply(&mut entity, ClockCommand::Pause, t(200));
        assert_eq!(
            timer_signal(&entity, t(260), &timings()),
            TimerSignal::Pause(HALF - 200)
        );
    }
}
