use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    dto::live::{ClientMessage, ServerMessage},
    error::ServiceError,
    services::live_service,
    state::{SessionConnection, SharedState, clock::ClockCommand},
};

/// Handle the full lifecycle of one realtime session (viewer or admin
/// console) over a WebSocket.
pub async fn handle_socket(state: SharedState, socket: WebSocket) {
    let (mut sender, mut receiver) = socket.split();
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Message>();

    // Dedicated writer task keeps outbound messages flowing even while we
    // await inbound frames.
    let writer_task = tokio::spawn(async move {
        while let Some(message) = outbound_rx.recv().await {
            if sender.send(message).await.is_err() {
                break;
            }
        }
    });

    let session_id = Uuid::new_v4();
    state.sessions().insert(
        session_id,
        SessionConnection {
            id: session_id,
            tx: outbound_tx.clone(),
        },
    );
    info!(%session_id, "realtime session connected");

    while let Some(message) = receiver.next().await {
        match message {
            Ok(Message::Text(text)) => match ClientMessage::from_json_str(&text) {
                Ok(inbound) => {
                    // The realtime protocol is fire-and-forget: failures are
                    // logged, never echoed into the shared stream.
                    if let Err(err) = dispatch(&state, inbound, &outbound_tx).await {
                        warn!(%session_id, error = %err, "realtime command failed");
                    }
                }
                Err(err) => {
                    warn!(%session_id, error = %err, "failed to parse realtime message");
                }
            },
            Ok(Message::Ping(payload)) => {
                let _ = outbound_tx.send(Message::Pong(payload));
            }
            Ok(Message::Close(frame)) => {
                info!(%session_id, "realtime session closed");
                let _ = outbound_tx.send(Message::Close(frame));
                break;
            }
            Ok(Message::Binary(_)) => {}
            Ok(Message::Pong(_)) => {}
            Err(err) => {
                warn!(%session_id, error = %err, "websocket error");
                break;
            }
        }
    }

    state.sessions().remove(&session_id);
    info!(%session_id, "realtime session disconnected");

    finalize(writer_task, outbound_tx).await;
}

/// Route one inbound message to the coordinator. Requests answer the asking
/// session directly; commands broadcast through the coordinator.
async fn dispatch(
    state: &SharedState,
    message: ClientMessage,
    tx: &mpsc::UnboundedSender<Message>,
) -> Result<(), ServiceError> {
    match message {
        ClientMessage::TimerRequest => {
            let signal = live_service::timer_snapshot(state).await?;
            send_message_to_session(tx, &ServerMessage::from(signal), "timer snapshot");
        }
        ClientMessage::MatchRequest => {
            let snapshot = live_service::match_snapshot(state).await?;
            send_message_to_session(tx, &ServerMessage::MatchInfo(snapshot), "match snapshot");
        }
        ClientMessage::StartFirstHalf => {
            live_service::apply_clock_command(state, ClockCommand::StartFirstHalf).await?;
        }
        ClientMessage::StartSecondHalf => {
            live_service::apply_clock_command(state, ClockCommand::StartSecondHalf).await?;
        }
        ClientMessage::DeclareHalftime => {
            live_service::apply_clock_command(state, ClockCommand::DeclareHalftime).await?;
        }
        ClientMessage::StartExtraTime => {
            live_service::apply_clock_command(state, ClockCommand::StartExtraTime).await?;
        }
        ClientMessage::StartPenaltyShootout => {
            live_service::apply_clock_command(state, ClockCommand::StartPenaltyShootout).await?;
        }
        ClientMessage::Pause => {
            live_service::apply_clock_command(state, ClockCommand::Pause).await?;
        }
        ClientMessage::Resume => {
            live_service::apply_clock_command(state, ClockCommand::Resume).await?;
        }
        ClientMessage::Finish => {
            live_service::apply_clock_command(state, ClockCommand::Finish).await?;
        }
        ClientMessage::SetExtraTime(request) => {
            live_service::set_extra_time(state, request.extra_time).await?;
        }
        ClientMessage::MakeGoal(request) => {
            live_service::record_goal(state, request.team_id, request.player_id).await?;
        }
    }

    Ok(())
}

/// Serialize a payload and push it onto the session's writer channel.
pub fn send_message_to_session(
    tx: &mpsc::UnboundedSender<Message>,
    message: &ServerMessage,
    context: &str,
) {
    match serde_json::to_string(message) {
        Ok(payload) => {
            if tx.send(Message::Text(payload.into())).is_err() {
                debug!(context, "session writer closed before delivery");
            }
        }
        Err(err) => {
            warn!(context, error = %err, "failed to serialize session message");
        }
    }
}

/// Ensure the writer task winds down before we return from the socket handler.
async fn finalize(writer_task: JoinHandle<()>, outbound_tx: mpsc::UnboundedSender<Message>) {
    drop(outbound_tx);
    let _ = writer_task.await;
}
