//! Directed stop-to-stop connectivity derived from the catalog.
//!
//! Each stop is a node and each `reachable` entry a directed edge. Edges are
//! not assumed symmetric: a one-way shuttle is represented as a single edge.

use std::collections::BTreeMap;
use std::ops::Add;

use tracing::warn;

use crate::catalog::{Location, Reachable, Stop, StopCatalog};

/// Static cost of traversing one edge.
///
/// Field order matters: the derived ordering compares travel time first and
/// distance second, which is the planner's tie-break key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeCost {
    /// Seconds.
    pub travel_time: u32,
    /// World units.
    pub distance: u32,
}

impl EdgeCost {
    pub const ZERO: Self = Self {
        travel_time: 0,
        distance: 0,
    };

    /// Distance assumed for edges crossing planets without explicit data.
    pub const INTERPLANETARY_DISTANCE: u32 = 10_000;

    /// Travel time assumed for edges without explicit data.
    pub const DEFAULT_HOP_SECONDS: u32 = 60;

    pub const fn new(travel_time: u32, distance: u32) -> Self {
        Self {
            travel_time,
            distance,
        }
    }

    fn derive(from: &Stop, to: &Stop, reachable: &Reachable) -> Self {
        let distance = reachable.distance.unwrap_or_else(|| {
            if from.location().is_same_planet(to.location()) {
                from.coordinates().distance_to(to.coordinates())
            } else {
                Self::INTERPLANETARY_DISTANCE
            }
        });
        let travel_time = reachable.travel_time.unwrap_or(Self::DEFAULT_HOP_SECONDS);
        Self::new(travel_time, distance)
    }
}

impl Add for EdgeCost {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            travel_time: self.travel_time.saturating_add(rhs.travel_time),
            distance: self.distance.saturating_add(rhs.distance),
        }
    }
}

/// A directed edge `from -> to`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edge {
    pub to: Location,
    pub cost: EdgeCost,
}

/// Adjacency structure over cataloged stops.
#[derive(Clone, Debug, Default)]
pub struct RouteGraph {
    adjacency: BTreeMap<Location, Vec<Edge>>,
}

impl RouteGraph {
    /// Builds the graph from a catalog.
    ///
    /// Reachable entries pointing at uncataloged stops, or back at the stop
    /// itself, are dropped with a warning. When a stop lists the same target
    /// twice the cheaper entry wins. Edge lists are sorted by target location.
    pub fn build(catalog: &StopCatalog) -> Self {
        let mut adjacency = BTreeMap::new();

        for stop in catalog.stops() {
            let mut edges: BTreeMap<Location, EdgeCost> = BTreeMap::new();

            for reachable in stop.reachable() {
                if &reachable.location == stop.location() {
                    warn!(
                        target: "transit::graph",
                        stop = %stop.location(),
                        "ignoring self-referencing reachable entry"
                    );
                    continue;
                }

                let Some(target) = catalog.stop(&reachable.location) else {
                    warn!(
                        target: "transit::graph",
                        from = %stop.location(),
                        to = %reachable.location,
                        "reachable entry references an uncataloged stop, edge dropped"
                    );
                    continue;
                };

                let cost = EdgeCost::derive(stop, target, reachable);
                edges
                    .entry(reachable.location.clone())
                    .and_modify(|existing| *existing = (*existing).min(cost))
                    .or_insert(cost);
            }

            let edges = edges
                .into_iter()
                .map(|(to, cost)| Edge { to, cost })
                .collect();
            adjacency.insert(stop.location().clone(), edges);
        }

        Self { adjacency }
    }

    pub fn contains(&self, location: &Location) -> bool {
        self.adjacency.contains_key(location)
    }

    /// Outgoing edges in target order; empty for unknown locations.
    pub fn edges_from(&self, location: &Location) -> &[Edge] {
        self.adjacency
            .get(location)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn edge(&self, from: &Location, to: &Location) -> Option<&Edge> {
        self.edges_from(from).iter().find(|edge| &edge.to == to)
    }

    pub fn is_directly_connected(&self, from: &Location, to: &Location) -> bool {
        self.edge(from, to).is_some()
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Coordinates;

    fn stop(planet: &str, city: &str, at: (i32, i32), reachable: Vec<Reachable>) -> Stop {
        Stop::new(
            Location::new(planet, city),
            Coordinates::new(at.0, at.1),
            format!("{city} shuttle"),
            reachable,
        )
        .unwrap()
    }

    fn to(planet: &str, city: &str) -> Reachable {
        Reachable::new(Location::new(planet, city))
    }

    #[test]
    fn edges_are_directed() {
        let mut catalog = StopCatalog::new();
        catalog
            .insert_stop(stop("naboo", "theed", (0, 0), vec![to("naboo", "keren")]))
            .unwrap();
        catalog
            .insert_stop(stop("naboo", "keren", (30, 40), Vec::new()))
            .unwrap();

        let graph = RouteGraph::build(&catalog);
        let theed = Location::new("naboo", "theed");
        let keren = Location::new("naboo", "keren");

        assert!(graph.is_directly_connected(&theed, &keren));
        assert!(!graph.is_directly_connected(&keren, &theed));
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn costs_default_from_coordinates_and_planets() {
        let mut catalog = StopCatalog::new();
        catalog
            .insert_stop(stop(
                "naboo",
                "theed",
                (0, 0),
                vec![
                    to("naboo", "keren"),
                    to("tatooine", "bestine").with_travel_time(300),
                ],
            ))
            .unwrap();
        catalog
            .insert_stop(stop("naboo", "keren", (30, 40), Vec::new()))
            .unwrap();
        catalog
            .insert_stop(stop("tatooine", "bestine", (0, 0), Vec::new()))
            .unwrap();

        let graph = RouteGraph::build(&catalog);
        let theed = Location::new("naboo", "theed");

        let local = graph.edge(&theed, &Location::new("naboo", "keren")).unwrap();
        assert_eq!(local.cost, EdgeCost::new(EdgeCost::DEFAULT_HOP_SECONDS, 50));

        let remote = graph
            .edge(&theed, &Location::new("tatooine", "bestine"))
            .unwrap();
        assert_eq!(
            remote.cost,
            EdgeCost::new(300, EdgeCost::INTERPLANETARY_DISTANCE)
        );
    }

    #[test]
    fn dangling_and_self_edges_are_dropped() {
        let mut catalog = StopCatalog::new();
        catalog
            .insert_stop(stop(
                "naboo",
                "theed",
                (0, 0),
                vec![to("naboo", "theed"), to("naboo", "moenia")],
            ))
            .unwrap();

        let graph = RouteGraph::build(&catalog);
        assert!(graph.contains(&Location::new("naboo", "theed")));
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.edges_from(&Location::new("naboo", "moenia")).is_empty());
    }
}
