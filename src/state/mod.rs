/// Pure clock engine for the live match.
pub mod clock;
/// Broadcast hub for the public SSE stream.
pub mod hub;

use std::sync::Arc;

use axum::extract::ws::Message;
use dashmap::DashMap;
use tokio::sync::{Mutex, RwLock, mpsc, watch};
use uuid::Uuid;

use crate::{
    config::MatchTimings, dao::match_store::MatchStore, error::ServiceError, state::hub::EventHub,
};

pub use self::clock::{ClockCommand, ClockOutcome, TimerSignal};

/// Shared handle to the application state.
pub type SharedState = Arc<AppState>;

/// Broadcast channel capacity for the public SSE stream.
const EVENT_HUB_CAPACITY: usize = 16;

#[derive(Clone)]
/// Handle used to push messages to a connected realtime session.
pub struct SessionConnection {
    /// Identifier assigned to the session on connect.
    pub id: Uuid,
    /// Outbound channel feeding the session's socket writer task.
    pub tx: mpsc::UnboundedSender<Message>,
}

/// Central application state storing persistent connections, the storage
/// handle, and the live-match coordination primitives.
pub struct AppState {
    match_store: RwLock<Option<Arc<dyn MatchStore>>>,
    sessions: DashMap<Uuid, SessionConnection>,
    events: EventHub,
    timings: RwLock<MatchTimings>,
    live_gate: Mutex<()>,
    degraded: watch::Sender<bool>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned
    /// cheaply.
    ///
    /// The application starts in degraded mode until a storage backend is
    /// installed.
    pub fn new(timings: MatchTimings) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        Arc::new(Self {
            match_store: RwLock::new(None),
            sessions: DashMap::new(),
            events: EventHub::new(EVENT_HUB_CAPACITY),
            timings: RwLock::new(timings),
            live_gate: Mutex::new(()),
            degraded: degraded_tx,
        })
    }

    /// Obtain a handle to the current match store, if one is installed.
    pub async fn match_store(&self) -> Option<Arc<dyn MatchStore>> {
        let guard = self.match_store.read().await;
        guard.as_ref().cloned()
    }

    /// Obtain the match store or fail with the degraded-mode error.
    pub async fn require_match_store(&self) -> Result<Arc<dyn MatchStore>, ServiceError> {
        self.match_store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a storage backend and leave degraded mode.
    pub async fn set_match_store(&self, store: Arc<dyn MatchStore>) {
        {
            let mut guard = self.match_store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false).await;
    }

    /// Current degraded flag.
    pub async fn is_degraded(&self) -> bool {
        let guard = self.match_store.read().await;
        guard.is_none()
    }

    /// Update and broadcast the degraded flag when the value changes.
    pub async fn update_degraded(&self, value: bool) {
        if *self.degraded.borrow() == value {
            return;
        }

        let _ = self.degraded.send(value);
    }

    /// Subscribe to degraded mode updates.
    pub fn degraded_watcher(&self) -> watch::Receiver<bool> {
        self.degraded.subscribe()
    }

    /// Registry of active realtime sessions keyed by their identifier.
    pub fn sessions(&self) -> &DashMap<Uuid, SessionConnection> {
        &self.sessions
    }

    /// Broadcast hub backing the public SSE stream.
    pub fn events(&self) -> &EventHub {
        &self.events
    }

    /// Snapshot of the current match timings.
    pub async fn timings(&self) -> MatchTimings {
        *self.timings.read().await
    }

    /// Rewrite the extra-time duration; takes effect on the next extra-time
    /// kick-off.
    pub async fn set_extra_time_duration(&self, secs: i64) {
        let mut guard = self.timings.write().await;
        guard.extra_time_duration_secs = secs;
    }

    /// Mutex serializing every live-match command (and live switch) so the
    /// read-compute-persist sequence never interleaves.
    pub fn live_gate(&self) -> &Mutex<()> {
        &self.live_gate
    }
}
