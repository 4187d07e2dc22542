//! Journey execution on top of the transit planner.
//!
//! This crate drives a planned [`transit_core::Route`] through external
//! collaborators that move the avatar, operate interactables and read its
//! location. Consumers build a [`TravelExecutor`], call one of its
//! `travel_to_*` operations, and observe progress through a [`TravelHandle`].
//!
//! Modules are organized by responsibility:
//! - [`executor`] hosts the state machine and its builder
//! - [`api`] exposes collaborator contracts, errors and the handle
//! - [`state`] holds the per-journey progress record
//! - [`events`] broadcasts progress notifications
//! - [`sim`] provides a catalog-backed world for dry runs
pub mod api;
pub mod events;
pub mod executor;
pub mod sim;
pub mod state;

pub use api::{
    AllowAll, BuildError, CollaboratorError, Interactor, Locator, Mover, PreconditionPolicy,
    RequirementSet, Result, TravelError, TravelHandle,
};
pub use events::{EventBus, TravelEvent};
pub use executor::{TravelExecutor, TravelExecutorBuilder};
pub use sim::SimulatedWorld;
pub use state::{TravelSnapshot, TravelState, TravelStatus};
