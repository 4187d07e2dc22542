//! Planned routes: ordered hops toward a destination.

use crate::catalog::{Coordinates, Destination, Location};
use crate::error::{ErrorSeverity, TransitError};
use crate::graph::EdgeCost;

/// One edge traversal, realized by operating `interactable_name` at `origin`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hop {
    /// Stop the hop departs from.
    pub origin: Location,
    /// Where the interactable stands at `origin`; the mover walks here first.
    pub interactable_coordinates: Coordinates,
    pub interactable_name: String,
    /// Stop the hop arrives at. Verification compares the reported location to this.
    pub planet: String,
    pub city: String,
    pub is_transfer: bool,
    pub cost: EdgeCost,
}

impl Hop {
    /// Arrival stop as a [`Location`].
    pub fn target(&self) -> Location {
        Location::new(self.planet.clone(), self.city.clone())
    }

    pub fn arrives_at(&self, location: &Location) -> bool {
        self.planet == location.planet && self.city == location.city
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("a route must contain at least one hop")]
    EmptyRoute,
}

impl TransitError for RouteError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyRoute => "ROUTE_EMPTY",
        }
    }
}

/// A non-empty hop sequence ending at the stop serving `destination`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Route {
    hops: Vec<Hop>,
    destination: Destination,
    total_distance: u32,
    estimated_time: u32,
}

impl Route {
    /// Builds a route, summing hop costs into the aggregates.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::EmptyRoute`] for an empty hop list. "Already at
    /// the destination" is expressed with [`crate::RoutePlan::AlreadyThere`],
    /// never with an empty route.
    pub fn new(hops: Vec<Hop>, destination: Destination) -> Result<Self, RouteError> {
        if hops.is_empty() {
            return Err(RouteError::EmptyRoute);
        }

        let total = hops
            .iter()
            .fold(EdgeCost::ZERO, |acc, hop| acc + hop.cost);

        Ok(Self {
            hops,
            destination,
            total_distance: total.distance,
            estimated_time: total.travel_time,
        })
    }

    pub fn hops(&self) -> &[Hop] {
        &self.hops
    }

    pub fn hop(&self, index: usize) -> Option<&Hop> {
        self.hops.get(index)
    }

    /// Always at least 1.
    pub fn len(&self) -> usize {
        self.hops.len()
    }

    /// Always false; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    /// Stop the final hop arrives at.
    pub fn final_stop(&self) -> Location {
        // non-empty by construction
        self.hops[self.hops.len() - 1].target()
    }

    pub fn total_distance(&self) -> u32 {
        self.total_distance
    }

    /// Seconds.
    pub fn estimated_time(&self) -> u32 {
        self.estimated_time
    }

    pub fn transfer_count(&self) -> usize {
        self.hops.iter().filter(|hop| hop.is_transfer).count()
    }
}
