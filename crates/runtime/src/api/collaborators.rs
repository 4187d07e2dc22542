//! Capability traits the executor drives to act in the environment.
//!
//! Screen reading, dialogue handling and in-zone walking live outside this
//! crate. The executor only sees these narrow contracts, so production
//! adapters and test doubles are interchangeable.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use transit_core::{Coordinates, Destination, Location};

use super::errors::CollaboratorError;

/// Reports where the avatar currently is.
#[async_trait]
pub trait Locator: Send + Sync {
    /// Returns `Ok(None)` on a transient read failure (e.g. OCR miss); the
    /// executor treats that as "not verified yet", not as a crash.
    async fn current_location(&self) -> Result<Option<Location>, CollaboratorError>;
}

/// Operates transit interactables.
#[async_trait]
pub trait Interactor: Send + Sync {
    /// Opens the dialogue of `interactable_name` and selects the option for
    /// `target`. Returns `false` if no dialogue appeared or no option matched.
    async fn open_and_select(
        &self,
        interactable_name: &str,
        target: &Location,
    ) -> Result<bool, CollaboratorError>;
}

/// Walks the avatar within a zone.
#[async_trait]
pub trait Mover: Send + Sync {
    /// Returns whether movement completed without obstruction.
    async fn move_to(
        &self,
        coordinates: Coordinates,
        zone: &str,
        planet: &str,
    ) -> Result<bool, CollaboratorError>;
}

/// Decides whether a destination's requirements are currently met.
pub trait PreconditionPolicy: Send + Sync {
    fn is_satisfied(&self, destination: &Destination) -> bool;
}

/// Policy that accepts every destination.
#[derive(Clone, Copy, Debug, Default)]
pub struct AllowAll;

impl PreconditionPolicy for AllowAll {
    fn is_satisfied(&self, _destination: &Destination) -> bool {
        true
    }
}

/// Policy backed by a fixed set of held tags and known facts.
///
/// A destination passes when every requirement tag is held and every unlock
/// condition matches a known fact exactly.
#[derive(Clone, Debug, Default)]
pub struct RequirementSet {
    tags: BTreeSet<String>,
    facts: BTreeMap<String, String>,
}

impl RequirementSet {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    #[must_use]
    pub fn with_fact(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.facts.insert(key.into(), value.into());
        self
    }
}

impl PreconditionPolicy for RequirementSet {
    fn is_satisfied(&self, destination: &Destination) -> bool {
        let tags_held = destination
            .requirements()
            .iter()
            .all(|tag| self.tags.contains(tag));
        let conditions_met = destination
            .unlock_conditions()
            .iter()
            .all(|(key, value)| self.facts.get(key) == Some(value));
        tags_held && conditions_met
    }
}
