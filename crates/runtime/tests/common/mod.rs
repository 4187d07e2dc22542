//! Shared fixtures for executor integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::{Notify, Semaphore};

use runtime::{CollaboratorError, Interactor, Locator, Mover, SimulatedWorld};
use transit_core::{
    Coordinates, Destination, DestinationKind, Location, Reachable, Stop, StopCatalog,
};

pub fn mos_eisley() -> Location {
    Location::new("tatooine", "mos_eisley")
}

pub fn anchorhead() -> Location {
    Location::new("tatooine", "anchorhead")
}

pub fn bestine() -> Location {
    Location::new("tatooine", "bestine")
}

pub fn aurilia() -> Location {
    Location::new("dathomir", "aurilia")
}

fn stop(location: Location, x: i32, y: i32, reachable: &[Location]) -> Stop {
    Stop::new(
        location,
        Coordinates::new(x, y),
        "Shuttle Pilot",
        reachable.iter().cloned().map(Reachable::new).collect(),
    )
    .unwrap()
}

fn destination(name: &str, at: Location, kind: DestinationKind) -> Destination {
    Destination::new(name, at.planet, at.city, Coordinates::new(5, 5), kind).unwrap()
}

/// mos_eisley -> anchorhead -> bestine, plus an isolated dathomir stop.
///
/// - trainer "Marksman" at bestine (two hops from mos_eisley)
/// - trainer "Scout" at mos_eisley (zero hops)
/// - trainer "Ranger" with a `level_20` requirement at anchorhead
/// - quest "Jawa Trader" at anchorhead
/// - unlock "Singing Mountain" at aurilia (unreachable)
pub fn chain_catalog() -> Arc<StopCatalog> {
    let mut catalog = StopCatalog::new();
    catalog
        .insert_stop(stop(mos_eisley(), 0, 0, &[anchorhead()]))
        .unwrap();
    catalog
        .insert_stop(stop(anchorhead(), 100, 0, &[bestine(), mos_eisley()]))
        .unwrap();
    catalog
        .insert_stop(stop(bestine(), 200, 0, &[anchorhead()]))
        .unwrap();
    catalog.insert_stop(stop(aurilia(), 0, 0, &[])).unwrap();

    for dest in [
        destination("Marksman", bestine(), DestinationKind::Trainer),
        destination("Scout", mos_eisley(), DestinationKind::Trainer),
        destination("Ranger", anchorhead(), DestinationKind::Trainer)
            .with_requirements(vec!["level_20".into()]),
        destination("Jawa Trader", anchorhead(), DestinationKind::Quest),
        destination("Singing Mountain", aurilia(), DestinationKind::Unlock),
    ] {
        catalog.insert_destination(dest).unwrap();
    }
    Arc::new(catalog)
}

/// Collaborator failure injected by [`TestWorld::with_fault`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fault {
    /// `move_to` returns `Err`.
    MoverError,
    /// `open_and_select` returns `Err`.
    InteractorError,
    /// The locator answers the first read, then reports nothing.
    LocatorLost,
    /// The locator answers the first read, then returns `Err`.
    LocatorError,
}

/// Catalog-backed world with call counters and failure switches.
pub struct TestWorld {
    inner: SimulatedWorld,
    pub moves: AtomicUsize,
    pub interactions: AtomicUsize,
    /// Interactions targeting this stop report "no dialogue".
    blocked: Mutex<Option<Location>>,
    /// Interactions succeed but the avatar never leaves.
    stuck: AtomicBool,
    /// Locator reports nothing.
    blind: AtomicBool,
    gate: Option<Arc<Semaphore>>,
    fault: Option<Fault>,
    pub locator_reads: AtomicUsize,
    pub mover_entered: Notify,
}

impl TestWorld {
    pub fn new(catalog: Arc<StopCatalog>, start: Location) -> Self {
        Self {
            inner: SimulatedWorld::new(catalog, start),
            moves: AtomicUsize::new(0),
            interactions: AtomicUsize::new(0),
            blocked: Mutex::new(None),
            stuck: AtomicBool::new(false),
            blind: AtomicBool::new(false),
            gate: None,
            fault: None,
            locator_reads: AtomicUsize::new(0),
            mover_entered: Notify::new(),
        }
    }

    /// Every move waits for a permit on `gate`.
    pub fn gated(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn with_fault(mut self, fault: Fault) -> Self {
        self.fault = Some(fault);
        self
    }

    pub fn block(self, target: Location) -> Self {
        *self.blocked.lock().unwrap() = Some(target);
        self
    }

    pub fn stuck(self) -> Self {
        self.stuck.store(true, Ordering::SeqCst);
        self
    }

    pub fn blind(self) -> Self {
        self.blind.store(true, Ordering::SeqCst);
        self
    }

    pub fn location(&self) -> Location {
        self.inner.location()
    }

    pub fn move_count(&self) -> usize {
        self.moves.load(Ordering::SeqCst)
    }

    pub fn interaction_count(&self) -> usize {
        self.interactions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Locator for TestWorld {
    async fn current_location(&self) -> Result<Option<Location>, CollaboratorError> {
        let reads = self.locator_reads.fetch_add(1, Ordering::SeqCst);
        if self.blind.load(Ordering::SeqCst) {
            return Ok(None);
        }
        match self.fault {
            Some(Fault::LocatorLost) if reads > 0 => Ok(None),
            Some(Fault::LocatorError) if reads > 0 => {
                Err(CollaboratorError::new("screen capture failed"))
            }
            _ => self.inner.current_location().await,
        }
    }
}

#[async_trait]
impl Mover for TestWorld {
    async fn move_to(
        &self,
        coordinates: Coordinates,
        zone: &str,
        planet: &str,
    ) -> Result<bool, CollaboratorError> {
        self.moves.fetch_add(1, Ordering::SeqCst);
        self.mover_entered.notify_one();
        if self.fault == Some(Fault::MoverError) {
            return Err(CollaboratorError::new("pathing service unavailable"));
        }
        if let Some(gate) = &self.gate {
            let _permit = gate
                .acquire()
                .await
                .map_err(|e| CollaboratorError::with_source("gate closed", e))?;
        }
        self.inner.move_to(coordinates, zone, planet).await
    }
}

#[async_trait]
impl Interactor for TestWorld {
    async fn open_and_select(
        &self,
        interactable_name: &str,
        target: &Location,
    ) -> Result<bool, CollaboratorError> {
        self.interactions.fetch_add(1, Ordering::SeqCst);
        if self.fault == Some(Fault::InteractorError) {
            return Err(CollaboratorError::new("dialogue window did not open"));
        }
        let blocked = self.blocked.lock().unwrap().as_ref() == Some(target);
        if blocked {
            return Ok(false);
        }
        if self.stuck.load(Ordering::SeqCst) {
            return Ok(true);
        }
        self.inner.open_and_select(interactable_name, target).await
    }
}
