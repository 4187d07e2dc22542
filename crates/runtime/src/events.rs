//! Journey progress notifications.
//!
//! Publishing is best effort: events without subscribers are dropped, and a
//! lagging subscriber only loses its own backlog.

use serde::Serialize;
use tokio::sync::broadcast;

use crate::state::TravelStatus;

/// Notification emitted as a journey progresses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TravelEvent {
    StatusChanged {
        status: TravelStatus,
        destination: Option<String>,
    },
    HopStarted {
        stop_index: usize,
        attempt: u32,
    },
    HopCompleted {
        stop_index: usize,
    },
    AttemptFailed {
        stop_index: usize,
        attempt: u32,
        reason: String,
    },
}

/// Broadcast channel shared by the executor and its handles.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<TravelEvent>,
}

impl EventBus {
    /// Creates a bus buffering up to `capacity` events per subscriber.
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn publish(&self, event: TravelEvent) {
        if self.tx.send(event).is_err() {
            // No subscribers - this is normal, not an error
            tracing::trace!(target: "runtime::events", "no subscribers for travel event");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TravelEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::with_capacity(transit_core::TravelConfig::DEFAULT_EVENT_BUFFER_SIZE)
    }
}
