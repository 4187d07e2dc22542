//! Transit network model and route planning shared across the travel stack.
//!
//! `transit-core` defines the immutable catalog of transit stops and points of
//! interest, the directed [`graph::RouteGraph`] built from it, and the
//! deterministic [`planner::RoutePlanner`]. Nothing here performs I/O or
//! waits on time; the runtime crate drives journeys on top of these types.
pub mod catalog;
pub mod config;
pub mod error;
pub mod graph;
pub mod planner;
pub mod route;

pub use catalog::{
    CatalogError, Coordinates, Destination, DestinationKind, Location, Reachable, Stop,
    StopCatalog,
};
pub use config::TravelConfig;
pub use error::{ErrorSeverity, TransitError};
pub use graph::{Edge, EdgeCost, RouteGraph};
pub use planner::{RoutePlan, RoutePlanner};
pub use route::{Hop, Route, RouteError};
