//! Journey execution state machine.
//!
//! [`TravelExecutor`] turns a destination name into a planned route and walks
//! it hop by hop through the [`Locator`], [`Interactor`] and [`Mover`]
//! collaborators. Only the per-hop interaction/verification is retried, up to
//! `max_attempts`; every other failure ends the request immediately. The
//! avatar is a single physical resource, so one executor runs one journey at
//! a time and rejects overlapping requests.

use core::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio::time::Instant;
use tracing::{debug, info, warn};
use transit_core::{
    Destination, DestinationKind, Hop, Location, RouteGraph, RoutePlan, RoutePlanner, StopCatalog,
    TransitError, TravelConfig,
};

use crate::api::{
    AllowAll, BuildError, CollaboratorError, Interactor, Locator, Mover, PreconditionPolicy,
    Result, TravelError, TravelHandle,
};
use crate::events::{EventBus, TravelEvent};
use crate::state::{TravelSnapshot, TravelState, TravelStatus};

/// Why a single hop attempt did not land at its target stop.
#[derive(Debug)]
enum AttemptFailure {
    Obstructed,
    NoDialogue,
    NotVerified { reported: Option<Location> },
    Collaborator {
        call: &'static str,
        error: CollaboratorError,
    },
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Obstructed => write!(f, "movement to interactable was obstructed"),
            Self::NoDialogue => write!(f, "no matching dialogue option"),
            Self::NotVerified { reported: Some(location) } => {
                write!(f, "arrival not verified, still at {location}")
            }
            Self::NotVerified { reported: None } => {
                write!(f, "arrival not verified, location unreadable")
            }
            Self::Collaborator { call, error } => write!(f, "{call} failed: {error}"),
        }
    }
}

/// Drives one journey at a time over a fixed catalog.
pub struct TravelExecutor {
    catalog: Arc<StopCatalog>,
    graph: RouteGraph,
    config: TravelConfig,
    locator: Arc<dyn Locator>,
    interactor: Arc<dyn Interactor>,
    mover: Arc<dyn Mover>,
    policy: Arc<dyn PreconditionPolicy>,
    state: Arc<RwLock<TravelState>>,
    cancel: Arc<AtomicBool>,
    events: EventBus,
}

impl TravelExecutor {
    pub fn builder() -> TravelExecutorBuilder {
        TravelExecutorBuilder::new()
    }

    /// Cloneable handle for polling, cancelling and subscribing.
    pub fn handle(&self) -> TravelHandle {
        TravelHandle::new(self.state.clone(), self.cancel.clone(), self.events.clone())
    }

    /// Snapshot of the current or most recent journey.
    pub fn status(&self) -> TravelSnapshot {
        self.read_state().snapshot(Instant::now())
    }

    pub fn config(&self) -> &TravelConfig {
        &self.config
    }

    pub fn catalog(&self) -> &StopCatalog {
        &self.catalog
    }

    pub fn graph(&self) -> &RouteGraph {
        &self.graph
    }

    /// Plans without moving. See [`RoutePlanner::plan_route`].
    pub fn plan(&self, origin: &Location, destination: &Destination) -> Option<RoutePlan> {
        RoutePlanner::new(&self.catalog, &self.graph).plan_route(origin, destination)
    }

    /// Returns a finished executor to `Idle`.
    ///
    /// # Errors
    ///
    /// [`TravelError::AlreadyTraveling`] while a journey is in flight.
    pub fn reset(&self) -> Result<()> {
        let mut state = self.write_state();
        if state.status().is_in_flight() {
            return Err(TravelError::AlreadyTraveling);
        }
        state.reset();
        Ok(())
    }

    /// Travels to a cataloged trainer.
    pub async fn travel_to_trainer(&self, name: &str) -> Result<()> {
        self.travel(Some(DestinationKind::Trainer), name).await
    }

    /// Travels to a cataloged quest giver.
    pub async fn travel_to_quest(&self, name: &str) -> Result<()> {
        self.travel(Some(DestinationKind::Quest), name).await
    }

    /// Travels to a cataloged gated location.
    pub async fn travel_to_unlock(&self, name: &str) -> Result<()> {
        self.travel(Some(DestinationKind::Unlock), name).await
    }

    /// Travels to a destination from any partition.
    pub async fn travel_to(&self, name: &str) -> Result<()> {
        self.travel(None, name).await
    }

    async fn travel(&self, kind: Option<DestinationKind>, name: &str) -> Result<()> {
        self.begin()?;
        let _abandoned = AbandonGuard { executor: self };

        let found = match kind {
            Some(kind) => self
                .catalog
                .destination(kind, name)
                .ok_or_else(|| TravelError::unknown(kind, name)),
            None => self
                .catalog
                .find_destination(name)
                .ok_or_else(|| TravelError::UnknownDestination {
                    name: name.to_owned(),
                }),
        };
        let destination = match found {
            Ok(destination) => destination.clone(),
            Err(error) => return self.conclude(TravelStatus::Failed, Some(error)),
        };

        info!(
            target: "runtime::executor",
            destination = destination.name(),
            kind = %destination.kind(),
            "travel requested"
        );
        self.write_state().set_destination(destination.clone());

        if !self.policy.is_satisfied(&destination) {
            let error = TravelError::PreconditionNotMet {
                destination: destination.name().to_owned(),
            };
            return self.conclude(TravelStatus::Failed, Some(error));
        }

        let Some(origin) = self.locate_origin().await else {
            return self.conclude(TravelStatus::Failed, Some(TravelError::LocationUnknown));
        };

        match self.plan(&origin, &destination) {
            None => {
                let error = TravelError::NoRouteAvailable {
                    destination: destination.name().to_owned(),
                };
                self.conclude(TravelStatus::Failed, Some(error))
            }
            Some(RoutePlan::AlreadyThere { stop }) => {
                debug!(
                    target: "runtime::executor",
                    stop = %stop,
                    "already at destination stop"
                );
                self.conclude(TravelStatus::Arrived, None)
            }
            Some(RoutePlan::Travel(route)) => {
                info!(
                    target: "runtime::executor",
                    destination = destination.name(),
                    origin = %origin,
                    hops = route.len(),
                    transfers = route.transfer_count(),
                    estimated_time = route.estimated_time(),
                    "route planned"
                );
                self.write_state().start_route(route);
                self.publish_status(TravelStatus::Traveling);
                self.drive().await
            }
        }
    }

    /// Claims the avatar for a new journey.
    fn begin(&self) -> Result<()> {
        {
            let mut state = self.write_state();
            if state.status().is_in_flight() {
                warn!(
                    target: "runtime::executor",
                    destination = state.current_destination().map(Destination::name),
                    stop_index = state.stop_index(),
                    status = %state.status(),
                    "travel request rejected, journey already in progress"
                );
                return Err(TravelError::AlreadyTraveling);
            }
            self.cancel.store(false, Ordering::SeqCst);
            state.begin(Instant::now());
        }
        self.publish_status(TravelStatus::Planning);
        Ok(())
    }

    /// Resolves the avatar's position to a cataloged stop.
    async fn locate_origin(&self) -> Option<Location> {
        let location = match self.locator.current_location().await {
            Ok(Some(location)) => location,
            Ok(None) => {
                warn!(target: "runtime::executor", "locator could not read current location");
                return None;
            }
            Err(error) => {
                warn!(target: "runtime::executor", error = %error, "locator failed");
                return None;
            }
        };

        self.write_state().observe_location(location.clone());

        if self.catalog.stop(&location).is_none() {
            warn!(
                target: "runtime::executor",
                location = %location,
                "current location has no cataloged stop"
            );
            return None;
        }
        Some(location)
    }

    /// Walks the planned route until a terminal state is reached.
    async fn drive(&self) -> Result<()> {
        let max_attempts = self.config.max_attempts.max(1);
        let limit = self.config.timeout();

        loop {
            let (stop_index, attempt, hop) = {
                let state = self.read_state();
                (
                    state.stop_index(),
                    state.attempts() + 1,
                    state.current_hop().cloned(),
                )
            };
            let Some(hop) = hop else {
                return self.conclude(TravelStatus::Arrived, None);
            };

            if self.cancel.load(Ordering::SeqCst) {
                return self.conclude(
                    TravelStatus::Interrupted,
                    Some(TravelError::Interrupted { stop_index }),
                );
            }
            if self.elapsed() > limit {
                return self.conclude(TravelStatus::Timeout, Some(TravelError::Timeout { limit }));
            }

            debug!(
                target: "runtime::executor",
                stop_index,
                attempt,
                interactable = hop.interactable_name.as_str(),
                to = %hop.target(),
                "hop attempt started"
            );
            self.events.publish(TravelEvent::HopStarted {
                stop_index,
                attempt,
            });

            match self.attempt_hop(&hop).await {
                Ok(()) => {
                    let arrived = self.write_state().advance(Instant::now());
                    info!(
                        target: "runtime::executor",
                        stop_index,
                        attempt,
                        arrived_at = %hop.target(),
                        "hop completed"
                    );
                    self.events.publish(TravelEvent::HopCompleted { stop_index });
                    if arrived {
                        return self.conclude(TravelStatus::Arrived, None);
                    }
                }
                Err(failure) => {
                    let attempts = self.write_state().record_failed_attempt();
                    warn!(
                        target: "runtime::executor",
                        stop_index,
                        attempt = attempts,
                        max_attempts,
                        reason = %failure,
                        "hop attempt failed"
                    );
                    self.events.publish(TravelEvent::AttemptFailed {
                        stop_index,
                        attempt: attempts,
                        reason: failure.to_string(),
                    });

                    // the deadline wins over the retry budget
                    if self.elapsed() > limit {
                        return self
                            .conclude(TravelStatus::Timeout, Some(TravelError::Timeout { limit }));
                    }
                    if attempts >= max_attempts {
                        let error = TravelError::HopExhausted {
                            hop_index: stop_index,
                            attempts,
                        };
                        return self.conclude(TravelStatus::Failed, Some(error));
                    }

                    tokio::time::sleep(self.config.retry_backoff()).await;
                }
            }
        }
    }

    /// Move, interact, verify. Collaborator errors become attempt failures.
    async fn attempt_hop(&self, hop: &Hop) -> std::result::Result<(), AttemptFailure> {
        let moved = self
            .mover
            .move_to(
                hop.interactable_coordinates,
                &hop.origin.city,
                &hop.origin.planet,
            )
            .await
            .map_err(|error| AttemptFailure::Collaborator {
                call: "move_to",
                error,
            })?;
        if !moved {
            return Err(AttemptFailure::Obstructed);
        }

        let selected = self
            .interactor
            .open_and_select(&hop.interactable_name, &hop.target())
            .await
            .map_err(|error| AttemptFailure::Collaborator {
                call: "open_and_select",
                error,
            })?;
        if !selected {
            return Err(AttemptFailure::NoDialogue);
        }

        self.verify_arrival(hop).await
    }

    /// Polls the locator until it reports the hop's target or the
    /// verification delay runs out.
    async fn verify_arrival(&self, hop: &Hop) -> std::result::Result<(), AttemptFailure> {
        let deadline = Instant::now() + self.config.verification_delay();
        let poll = self.config.verification_poll();
        let mut reported = None;

        loop {
            let wait = poll.min(deadline.saturating_duration_since(Instant::now()));
            tokio::time::sleep(wait).await;

            match self.locator.current_location().await {
                Ok(Some(location)) => {
                    self.write_state().observe_location(location.clone());
                    if hop.arrives_at(&location) {
                        return Ok(());
                    }
                    reported = Some(location);
                }
                Ok(None) => {}
                Err(error) => {
                    debug!(
                        target: "runtime::executor",
                        error = %error,
                        "location read failed during verification"
                    );
                }
            }

            if Instant::now() >= deadline {
                return Err(AttemptFailure::NotVerified { reported });
            }
        }
    }

    /// Records a terminal state, logs the full snapshot, and maps it to the
    /// caller-facing result.
    fn conclude(&self, status: TravelStatus, failure: Option<TravelError>) -> Result<()> {
        let snapshot = {
            let mut state = self.write_state();
            state.finish(status, failure.clone(), Instant::now());
            debug_assert!(state.invariants_hold());
            state.snapshot(Instant::now())
        };

        let destination = snapshot
            .current_destination
            .as_ref()
            .map(|d| d.name().to_owned());

        match &failure {
            None => info!(
                target: "runtime::executor",
                destination = destination.as_deref(),
                stop_index = snapshot.stop_index,
                status = %status,
                attempt = snapshot.attempts,
                elapsed_ms = snapshot.elapsed.as_millis() as u64,
                snapshot = ?snapshot,
                "journey finished"
            ),
            Some(error) => warn!(
                target: "runtime::executor",
                destination = destination.as_deref(),
                stop_index = snapshot.stop_index,
                status = %status,
                attempt = snapshot.attempts,
                error_code = error.error_code(),
                severity = error.severity().as_str(),
                snapshot = ?snapshot,
                "journey ended without arriving: {error}"
            ),
        }

        self.events.publish(TravelEvent::StatusChanged {
            status,
            destination,
        });

        match failure {
            None => Ok(()),
            Some(error) => Err(error),
        }
    }

    fn publish_status(&self, status: TravelStatus) {
        let (destination, stop_index, attempt) = {
            let state = self.read_state();
            (
                state.current_destination().map(|d| d.name().to_owned()),
                state.stop_index(),
                state.attempts(),
            )
        };
        debug!(
            target: "runtime::executor",
            destination = destination.as_deref(),
            stop_index,
            status = %status,
            attempt,
            "status changed"
        );
        self.events.publish(TravelEvent::StatusChanged {
            status,
            destination,
        });
    }

    fn elapsed(&self) -> std::time::Duration {
        self.read_state().elapsed(Instant::now())
    }

    fn read_state(&self) -> RwLockReadGuard<'_, TravelState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, TravelState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Ends a journey whose future was dropped before reaching a terminal state,
/// so the executor does not stay claimed forever.
struct AbandonGuard<'a> {
    executor: &'a TravelExecutor,
}

impl Drop for AbandonGuard<'_> {
    fn drop(&mut self) {
        let stop_index = {
            let state = self.executor.read_state();
            if !state.status().is_in_flight() {
                return;
            }
            state.stop_index()
        };
        warn!(
            target: "runtime::executor",
            stop_index,
            "journey dropped before completion"
        );
        // the caller is gone; the outcome is only observable through the state
        let _ = self.executor.conclude(
            TravelStatus::Interrupted,
            Some(TravelError::Interrupted { stop_index }),
        );
    }
}

/// Builder for [`TravelExecutor`].
pub struct TravelExecutorBuilder {
    catalog: Option<Arc<StopCatalog>>,
    config: TravelConfig,
    locator: Option<Arc<dyn Locator>>,
    interactor: Option<Arc<dyn Interactor>>,
    mover: Option<Arc<dyn Mover>>,
    policy: Arc<dyn PreconditionPolicy>,
}

impl TravelExecutorBuilder {
    fn new() -> Self {
        Self {
            catalog: None,
            config: TravelConfig::default(),
            locator: None,
            interactor: None,
            mover: None,
            policy: Arc::new(AllowAll),
        }
    }

    /// Set the required stop catalog
    pub fn catalog(mut self, catalog: impl Into<Arc<StopCatalog>>) -> Self {
        self.catalog = Some(catalog.into());
        self
    }

    /// Override journey tuning
    pub fn config(mut self, config: TravelConfig) -> Self {
        self.config = config;
        self
    }

    pub fn locator(mut self, locator: Arc<dyn Locator>) -> Self {
        self.locator = Some(locator);
        self
    }

    pub fn interactor(mut self, interactor: Arc<dyn Interactor>) -> Self {
        self.interactor = Some(interactor);
        self
    }

    pub fn mover(mut self, mover: Arc<dyn Mover>) -> Self {
        self.mover = Some(mover);
        self
    }

    /// Use one object for all three collaborator roles.
    pub fn world<W>(self, world: Arc<W>) -> Self
    where
        W: Locator + Interactor + Mover + 'static,
    {
        self.locator(world.clone())
            .interactor(world.clone())
            .mover(world)
    }

    /// Set the precondition policy (defaults to [`AllowAll`])
    pub fn policy(mut self, policy: Arc<dyn PreconditionPolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn build(self) -> std::result::Result<TravelExecutor, BuildError> {
        let catalog = self.catalog.ok_or(BuildError::MissingCatalog)?;
        let locator = self
            .locator
            .ok_or(BuildError::MissingCollaborator("locator"))?;
        let interactor = self
            .interactor
            .ok_or(BuildError::MissingCollaborator("interactor"))?;
        let mover = self.mover.ok_or(BuildError::MissingCollaborator("mover"))?;

        let graph = RouteGraph::build(&catalog);
        info!(
            target: "runtime::executor",
            stops = graph.node_count(),
            edges = graph.edge_count(),
            max_attempts = self.config.max_attempts,
            timeout_seconds = self.config.timeout_seconds,
            "travel executor initialized"
        );

        let events = EventBus::with_capacity(self.config.event_buffer_size);

        Ok(TravelExecutor {
            catalog,
            graph,
            config: self.config,
            locator,
            interactor,
            mover,
            policy: self.policy,
            state: Arc::new(RwLock::new(TravelState::new())),
            cancel: Arc::new(AtomicBool::new(false)),
            events,
        })
    }
}
