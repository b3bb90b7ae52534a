//! Fan-out of realtime events to every connected session.
//!
//! Messages are serialized once, pushed to each registered WebSocket
//! session, and mirrored onto the SSE broadcast hub.

use axum::extract::ws::Message;
use tracing::warn;

use crate::{
    dto::{
        common::MatchSnapshot,
        live::{GoalScoredPayload, ServerMessage},
    },
    state::{SharedState, clock::TimerSignal},
};

/// Deliver a server message to all realtime sessions and SSE subscribers.
pub fn broadcast(state: &SharedState, message: &ServerMessage) {
    let payload = match serde_json::to_string(message) {
        Ok(payload) => payload,
        Err(err) => {
            warn!(event = message.event_name(), error = %err, "failed to serialize broadcast message");
            return;
        }
    };

    let mut closed = Vec::new();
    for connection in state.sessions().iter() {
        if connection
            .tx
            .send(Message::Text(payload.clone().into()))
            .is_err()
        {
            closed.push(connection.id);
        }
    }
    for session_id in closed {
        state.sessions().remove(&session_id);
        warn!(%session_id, "removed closed realtime session during broadcast");
    }

    state.events().broadcast(message.clone());
}

/// Broadcast a timer event; remaining seconds are clamped by the wire DTO.
pub fn broadcast_timer(state: &SharedState, signal: TimerSignal) {
    broadcast(state, &ServerMessage::from(signal));
}

/// Broadcast the current live-match snapshot (or `null`).
pub fn broadcast_match_info(state: &SharedState, snapshot: Option<MatchSnapshot>) {
    broadcast(state, &ServerMessage::MatchInfo(snapshot));
}

/// Broadcast the transient goal notification with scorer and team names.
pub fn broadcast_goal_scored(state: &SharedState, player: String, team: String) {
    broadcast(state, &ServerMessage::GoalScored(GoalScoredPayload { player, team }));
}
