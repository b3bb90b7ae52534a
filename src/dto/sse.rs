use crate::dto::live::ServerMessage;

#[derive(Clone, Debug)]
/// Dispatched payload carried across the SSE channel.
pub struct ServerEvent {
    pub event: Option<String>,
    pub data: String,
}

impl TryFrom<&ServerMessage> for ServerEvent {
    type Error = serde_json::Error;

    /// Split a realtime message into its SSE representation: the wire event
    /// name plus the bare data payload.
    fn try_from(message: &ServerMessage) -> Result<Self, Self::Error> {
        let data = match message {
            ServerMessage::TimerStart(secs)
            | ServerMessage::TimerPause(secs)
            | ServerMessage::TimerResume(secs) => serde_json::to_string(secs)?,
            ServerMessage::TimerStop => "null".to_owned(),
            ServerMessage::MatchInfo(snapshot) => serde_json::to_string(snapshot)?,
            ServerMessage::GoalScored(payload) => serde_json::to_string(payload)?,
        };

        Ok(Self {
            event: Some(message.event_name().to_owned()),
            data,
        })
    }
}
