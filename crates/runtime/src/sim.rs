//! In-process stand-in for the real environment.
//!
//! [`SimulatedWorld`] implements every collaborator over the catalog itself:
//! an interactable only sends the avatar somewhere its stop actually reaches.
//! The CLI uses it for dry runs and the integration tests use it as the
//! happy-path world.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tracing::debug;
use transit_core::{Coordinates, Location, StopCatalog};

use crate::api::{CollaboratorError, Interactor, Locator, Mover};

pub struct SimulatedWorld {
    catalog: Arc<StopCatalog>,
    avatar: Mutex<Location>,
}

impl SimulatedWorld {
    pub fn new(catalog: Arc<StopCatalog>, start: Location) -> Self {
        Self {
            catalog,
            avatar: Mutex::new(start),
        }
    }

    pub fn location(&self) -> Location {
        self.avatar
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Places the avatar somewhere without going through an interactable.
    pub fn teleport(&self, location: Location) {
        *self.avatar.lock().unwrap_or_else(PoisonError::into_inner) = location;
    }
}

#[async_trait]
impl Locator for SimulatedWorld {
    async fn current_location(&self) -> Result<Option<Location>, CollaboratorError> {
        Ok(Some(self.location()))
    }
}

#[async_trait]
impl Mover for SimulatedWorld {
    async fn move_to(
        &self,
        coordinates: Coordinates,
        zone: &str,
        planet: &str,
    ) -> Result<bool, CollaboratorError> {
        let here = self.location();
        let reachable = here.planet == planet && here.city == zone;
        debug!(
            target: "runtime::sim",
            x = coordinates.x,
            y = coordinates.y,
            zone,
            reachable,
            "simulated move"
        );
        Ok(reachable)
    }
}

#[async_trait]
impl Interactor for SimulatedWorld {
    async fn open_and_select(
        &self,
        interactable_name: &str,
        target: &Location,
    ) -> Result<bool, CollaboratorError> {
        let mut avatar = self.avatar.lock().unwrap_or_else(PoisonError::into_inner);

        let Some(stop) = self.catalog.stop(&avatar) else {
            return Ok(false);
        };
        if stop.interactable_name() != interactable_name
            || !stop.reaches(target)
            || self.catalog.stop(target).is_none()
        {
            return Ok(false);
        }

        debug!(target: "runtime::sim", from = %*avatar, to = %target, "simulated transit");
        *avatar = target.clone();
        Ok(true)
    }
}
