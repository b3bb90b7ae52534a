//! Wire protocol of the realtime channel.
//!
//! Every frame is a JSON envelope `{"event": <name>, "data": <payload>}`;
//! event names follow the original scoreboard protocol (`timer:*`,
//! `match:*`, `goal:scored`).

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{dto::common::MatchSnapshot, state::clock::TimerSignal};

/// Messages accepted from realtime clients (viewers and the admin console).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(tag = "event", content = "data")]
pub enum ClientMessage {
    /// Ask for the timer event matching the current state.
    #[serde(rename = "timer:request")]
    TimerRequest,
    /// Ask for the current live-match snapshot.
    #[serde(rename = "match:request")]
    MatchRequest,
    /// Kick off the first half.
    #[serde(rename = "match:start-firstHalf")]
    StartFirstHalf,
    /// Kick off the second half.
    #[serde(rename = "match:start-secondHalf")]
    StartSecondHalf,
    /// Enter the halftime break.
    #[serde(rename = "match:declare-halftime")]
    DeclareHalftime,
    /// Kick off extra time.
    #[serde(rename = "match:start-extraTime")]
    StartExtraTime,
    /// Enter the penalty shootout.
    #[serde(rename = "match:start-penaltyShootout")]
    StartPenaltyShootout,
    /// Freeze the running countdown.
    #[serde(rename = "match:pause")]
    Pause,
    /// Continue a paused countdown.
    #[serde(rename = "match:resume")]
    Resume,
    /// Rewrite the extra-time duration.
    #[serde(rename = "match:set-extra-time")]
    SetExtraTime(SetExtraTimeRequest),
    /// Record a goal for a player of one of the contesting teams.
    #[serde(rename = "match:make-goal")]
    MakeGoal(MakeGoalRequest),
    /// End the match.
    #[serde(rename = "match:finish")]
    Finish,
}

impl ClientMessage {
    /// Parse a raw text frame into a client message.
    pub fn from_json_str(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}

/// Payload of `match:set-extra-time`, in minutes.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetExtraTimeRequest {
    pub extra_time: i64,
}

/// Payload of `match:make-goal`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MakeGoalRequest {
    pub team_id: Uuid,
    pub player_id: Uuid,
}

/// Messages pushed to connected sessions, either broadcast to everyone or
/// answered to the requesting session.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "event", content = "data")]
pub enum ServerMessage {
    /// A countdown is running from the given remaining seconds.
    #[serde(rename = "timer:start")]
    TimerStart(i64),
    /// The countdown froze at the given remaining seconds.
    #[serde(rename = "timer:pause")]
    TimerPause(i64),
    /// The countdown continues from the given remaining seconds.
    #[serde(rename = "timer:resume")]
    TimerResume(i64),
    /// No countdown applies; clear the board.
    #[serde(rename = "timer:stop")]
    TimerStop,
    /// Current live-match snapshot, `null` when nothing is live.
    #[serde(rename = "match:info")]
    MatchInfo(Option<MatchSnapshot>),
    /// Transient goal notification with scorer and team names.
    #[serde(rename = "goal:scored")]
    GoalScored(GoalScoredPayload),
}

impl ServerMessage {
    /// Wire name of this message's event.
    pub fn event_name(&self) -> &'static str {
        match self {
            ServerMessage::TimerStart(_) => "timer:start",
            ServerMessage::TimerPause(_) => "timer:pause",
            ServerMessage::TimerResume(_) => "timer:resume",
            ServerMessage::TimerStop => "timer:stop",
            ServerMessage::MatchInfo(_) => "match:info",
            ServerMessage::GoalScored(_) => "goal:scored",
        }
    }
}

impl From<TimerSignal> for ServerMessage {
    /// Remaining seconds are clamped to zero here, at the wire boundary; the
    /// engine itself may report negative values once a period overruns.
    fn from(signal: TimerSignal) -> Self {
        match signal {
            TimerSignal::Start(secs) => ServerMessage::TimerStart(secs.max(0)),
            TimerSignal::Pause(secs) => ServerMessage::TimerPause(secs.max(0)),
            TimerSignal::Resume(secs) => ServerMessage::TimerResume(secs.max(0)),
            TimerSignal::Stop => ServerMessage::TimerStop,
        }
    }
}

/// Payload of `goal:scored` for transient UI display.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GoalScoredPayload {
    pub player: String,
    pub team: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unit_commands_parse_from_bare_envelopes() {
        assert_eq!(
            ClientMessage::from_json_str(r#"{"event":"match:pause"}"#).unwrap(),
            ClientMessage::Pause
        );
        assert_eq!(
            ClientMessage::from_json_str(r#"{"event":"timer:request"}"#).unwrap(),
            ClientMessage::TimerRequest
        );
        assert_eq!(
            ClientMessage::from_json_str(r#"{"event":"match:start-penaltyShootout"}"#).unwrap(),
            ClientMessage::StartPenaltyShootout
        );
    }

    #[test]
    fn payload_commands_parse_camel_case_fields() {
        let team_id = Uuid::new_v4();
        let player_id = Uuid::new_v4();
        let raw = format!(
            r#"{{"event":"match:make-goal","data":{{"teamId":"{team_id}","playerId":"{player_id}"}}}}"#
        );
        assert_eq!(
            ClientMessage::from_json_str(&raw).unwrap(),
            ClientMessage::MakeGoal(MakeGoalRequest { team_id, player_id })
        );

        let raw = r#"{"event":"match:set-extra-time","data":{"extraTime":30}}"#;
        assert_eq!(
            ClientMessage::from_json_str(raw).unwrap(),
            ClientMessage::SetExtraTime(SetExtraTimeRequest { extra_time: 30 })
        );
    }

    #[test]
    fn server_messages_carry_original_event_names() {
        let frame = serde_json::to_value(ServerMessage::TimerStart(900)).unwrap();
        assert_eq!(frame, json!({"event": "timer:start", "data": 900}));

        let frame = serde_json::to_value(ServerMessage::TimerStop).unwrap();
        assert_eq!(frame, json!({"event": "timer:stop"}));

        let frame = serde_json::to_value(ServerMessage::MatchInfo(None)).unwrap();
        assert_eq!(frame, json!({"event": "match:info", "data": null}));
    }

    #[test]
    fn timer_signals_clamp_negative_remaining_to_zero() {
        assert!(matches!(
            ServerMessage::from(TimerSignal::Start(-42)),
            ServerMessage::TimerStart(0)
        ));
        assert!(matches!(
            ServerMessage::from(TimerSignal::Pause(-1)),
            ServerMessage::TimerPause(0)
        ));
        assert!(matches!(
            ServerMessage::from(TimerSignal::Resume(37)),
            ServerMessage::TimerResume(37)
        ));
        assert!(matches!(
            ServerMessage::from(TimerSignal::Stop),
            ServerMessage::TimerStop
        ));
    }
}
