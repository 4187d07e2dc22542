//! In-flight journey progress.
//!
//! One [`TravelState`] exists per executor. Only the executor mutates it;
//! other tasks read it through [`TravelSnapshot`] copies taken by the
//! [`crate::TravelHandle`].

use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;
use transit_core::{Destination, Hop, Location, Route};

use crate::api::TravelError;

/// Lifecycle of a travel request.
///
/// `Idle -> Planning -> Traveling -> {Arrived | Failed | Interrupted | Timeout}`.
/// Terminal states stay observable until the next request starts planning.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    strum::Display,
    strum::AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TravelStatus {
    #[default]
    Idle,
    Planning,
    Traveling,
    Arrived,
    Failed,
    Interrupted,
    Timeout,
}

impl TravelStatus {
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Arrived | Self::Failed | Self::Interrupted | Self::Timeout
        )
    }

    /// A journey owns the avatar while planning or traveling.
    pub const fn is_in_flight(self) -> bool {
        matches!(self, Self::Planning | Self::Traveling)
    }
}

/// Mutable record of the current (or most recent) journey.
#[derive(Clone, Debug, Default)]
pub struct TravelState {
    status: TravelStatus,
    current_destination: Option<Destination>,
    current_route: Option<Route>,
    stop_index: usize,
    attempts: u32,
    start_time: Option<Instant>,
    finish_time: Option<Instant>,
    last_known_location: Option<Location>,
    failure: Option<TravelError>,
}

impl TravelState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> TravelStatus {
        self.status
    }

    pub fn current_destination(&self) -> Option<&Destination> {
        self.current_destination.as_ref()
    }

    pub fn current_route(&self) -> Option<&Route> {
        self.current_route.as_ref()
    }

    pub fn stop_index(&self) -> usize {
        self.stop_index
    }

    /// Failed attempts on the current hop only.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn last_known_location(&self) -> Option<&Location> {
        self.last_known_location.as_ref()
    }

    pub fn failure(&self) -> Option<&TravelError> {
        self.failure.as_ref()
    }

    /// Hop at `stop_index`, if a route is in progress.
    pub fn current_hop(&self) -> Option<&Hop> {
        self.current_route.as_ref()?.hop(self.stop_index)
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        match self.start_time {
            Some(start) => self.finish_time.unwrap_or(now).saturating_duration_since(start),
            None => Duration::ZERO,
        }
    }

    /// `0 <= stop_index <= hops`, and `stop_index == hops` exactly when arrived.
    pub fn invariants_hold(&self) -> bool {
        match &self.current_route {
            Some(route) => {
                self.stop_index <= route.len()
                    && ((self.stop_index == route.len()) == (self.status == TravelStatus::Arrived))
            }
            None => self.stop_index == 0,
        }
    }

    pub fn snapshot(&self, now: Instant) -> TravelSnapshot {
        TravelSnapshot {
            status: self.status,
            current_destination: self.current_destination.clone(),
            current_route: self.current_route.clone(),
            current_stop: self.current_hop().cloned(),
            stop_index: self.stop_index,
            attempts: self.attempts,
            elapsed: self.elapsed(now),
            last_known_location: self.last_known_location.clone(),
            failure: self.failure.clone(),
        }
    }

    /// Discards everything from the previous journey and enters planning.
    pub(crate) fn begin(&mut self, now: Instant) {
        *self = Self {
            status: TravelStatus::Planning,
            start_time: Some(now),
            ..Self::default()
        };
    }

    pub(crate) fn set_destination(&mut self, destination: Destination) {
        self.current_destination = Some(destination);
    }

    pub(crate) fn observe_location(&mut self, location: Location) {
        self.last_known_location = Some(location);
    }

    pub(crate) fn start_route(&mut self, route: Route) {
        self.current_route = Some(route);
        self.status = TravelStatus::Traveling;
        self.stop_index = 0;
        self.attempts = 0;
    }

    /// Counts a failed attempt on the current hop and returns the new total.
    pub(crate) fn record_failed_attempt(&mut self) -> u32 {
        self.attempts += 1;
        self.attempts
    }

    /// Commits the current hop. Completing the last hop arrives in the same
    /// step, so no reader sees `stop_index == hops` while still traveling.
    pub(crate) fn advance(&mut self, now: Instant) -> bool {
        let hops = self.current_route.as_ref().map_or(0, Route::len);
        self.stop_index = (self.stop_index + 1).min(hops);
        self.attempts = 0;
        let arrived = self.stop_index == hops;
        if arrived {
            self.finish(TravelStatus::Arrived, None, now);
        }
        arrived
    }

    pub(crate) fn finish(
        &mut self,
        status: TravelStatus,
        failure: Option<TravelError>,
        now: Instant,
    ) {
        debug_assert!(status.is_terminal());
        self.status = status;
        self.failure = failure;
        self.finish_time.get_or_insert(now);
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Read-only copy of [`TravelState`] handed to pollers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TravelSnapshot {
    pub status: TravelStatus,
    pub current_destination: Option<Destination>,
    pub current_route: Option<Route>,
    /// Hop in progress; `None` once arrived or when no route is active.
    pub current_stop: Option<Hop>,
    pub stop_index: usize,
    pub attempts: u32,
    pub elapsed: Duration,
    pub last_known_location: Option<Location>,
    pub failure: Option<TravelError>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use transit_core::{Coordinates, DestinationKind, EdgeCost};

    fn route(hops: usize) -> Route {
        let destination = Destination::new(
            "Tuz",
            "talus",
            "dearic",
            Coordinates::ORIGIN,
            DestinationKind::Trainer,
        )
        .unwrap();
        let hops = (0..hops)
            .map(|i| Hop {
                origin: Location::new("talus", format!("stop{i}")),
                interactable_coordinates: Coordinates::ORIGIN,
                interactable_name: "pilot".into(),
                planet: "talus".into(),
                city: format!("stop{}", i + 1),
                is_transfer: i > 0,
                cost: EdgeCost::ZERO,
            })
            .collect();
        Route::new(hops, destination).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn advancing_resets_attempts_and_arrives_at_end() {
        let mut state = TravelState::new();
        state.begin(Instant::now());
        state.start_route(route(2));
        assert!(state.invariants_hold());

        assert_eq!(state.record_failed_attempt(), 1);
        assert!(!state.advance(Instant::now()));
        assert_eq!(state.attempts(), 0);
        assert_eq!(state.stop_index(), 1);
        assert!(state.invariants_hold());

        assert!(state.advance(Instant::now()));
        assert_eq!(state.status(), TravelStatus::Arrived);
        assert!(state.invariants_hold());
        assert!(state.current_hop().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn elapsed_freezes_when_finished() {
        let mut state = TravelState::new();
        let start = Instant::now();
        state.begin(start);
        tokio::time::advance(Duration::from_secs(5)).await;
        state.finish(
            TravelStatus::Timeout,
            Some(TravelError::Timeout {
                limit: Duration::from_secs(5),
            }),
            Instant::now(),
        );
        tokio::time::advance(Duration::from_secs(60)).await;

        assert_eq!(state.elapsed(Instant::now()), Duration::from_secs(5));
        assert_eq!(state.snapshot(Instant::now()).status, TravelStatus::Timeout);
    }

    #[test]
    fn begin_discards_previous_journey() {
        let mut state = TravelState::new();
        let now = Instant::now();
        state.begin(now);
        state.start_route(route(1));
        state.record_failed_attempt();
        state.finish(
            TravelStatus::Failed,
            Some(TravelError::HopExhausted {
                hop_index: 0,
                attempts: 1,
            }),
            now,
        );

        state.begin(now);
        assert_eq!(state.status(), TravelStatus::Planning);
        assert!(state.current_route().is_none());
        assert!(state.failure().is_none());
        assert_eq!(state.attempts(), 0);
    }

    #[test]
    fn status_labels_are_screaming_case() {
        assert_eq!(TravelStatus::Traveling.to_string(), "TRAVELING");
        assert!(TravelStatus::Timeout.is_terminal());
        assert!(TravelStatus::Planning.is_in_flight());
        assert!(!TravelStatus::Idle.is_in_flight());
    }
}
