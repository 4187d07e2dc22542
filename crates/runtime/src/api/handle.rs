//! Cloneable façade for observing and cancelling a journey.
//!
//! [`TravelHandle`] is what UI threads and supervisors hold while the
//! executor runs on its own task: status polling never waits on the journey.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::broadcast;
use tokio::time::Instant;

use crate::events::{EventBus, TravelEvent};
use crate::state::{TravelSnapshot, TravelState, TravelStatus};

/// Client-facing handle to a [`crate::TravelExecutor`].
#[derive(Clone)]
pub struct TravelHandle {
    state: Arc<RwLock<TravelState>>,
    cancel: Arc<AtomicBool>,
    events: EventBus,
}

impl TravelHandle {
    pub(crate) fn new(
        state: Arc<RwLock<TravelState>>,
        cancel: Arc<AtomicBool>,
        events: EventBus,
    ) -> Self {
        Self {
            state,
            cancel,
            events,
        }
    }

    /// Snapshot of the current or most recent journey.
    pub fn status(&self) -> TravelSnapshot {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .snapshot(Instant::now())
    }

    pub fn is_traveling(&self) -> bool {
        self.status_kind().is_in_flight()
    }

    /// Requests cancellation of the in-flight journey.
    ///
    /// Observed at the next hop attempt boundary; an interaction already in
    /// progress runs to completion first. A no-op when nothing is in flight.
    pub fn cancel(&self) {
        if self.is_traveling() {
            tracing::info!(target: "runtime::handle", "travel cancellation requested");
            self.cancel.store(true, Ordering::SeqCst);
        }
    }

    /// Subscribe to journey progress events.
    pub fn subscribe(&self) -> broadcast::Receiver<TravelEvent> {
        self.events.subscribe()
    }

    fn status_kind(&self) -> TravelStatus {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .status()
    }
}
