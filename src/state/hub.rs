use tokio::sync::broadcast;

use crate::dto::live::ServerMessage;

/// Broadcast hub fanning server messages out to the public SSE stream.
pub struct EventHub {
    sender: broadcast::Sender<ServerMessage>,
}

impl EventHub {
    /// Construct a new hub backed by a Tokio broadcast channel with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Register a new subscriber that will receive subsequent events.
    pub fn subscribe(&self) -> broadcast::Receiver<ServerMessage> {
        self.sender.subscribe()
    }

    /// Send an event to all current subscribers, ignoring delivery errors.
    pub fn broadcast(&self, message: ServerMessage) {
        let _ = self.sender.send(message);
    }
}
