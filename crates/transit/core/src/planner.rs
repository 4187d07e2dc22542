//! Stop-level route planning.
//!
//! The planner runs a layered breadth-first search over [`RouteGraph`]:
//! hop count is the primary key, summed [`EdgeCost`] breaks ties between
//! equally short paths, and remaining ties fall to the lexically smallest
//! predecessor. Every hop is an interaction that can fail, so fewer hops are
//! preferred even when they are individually longer.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use tracing::debug;

use crate::catalog::{Destination, Location, StopCatalog};
use crate::graph::{EdgeCost, RouteGraph};
use crate::route::{Hop, Route};

/// Outcome of a successful planning request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoutePlan {
    /// The origin already is the destination's stop; no travel is needed.
    AlreadyThere { stop: Location },
    /// At least one hop is required.
    Travel(Route),
}

impl RoutePlan {
    pub fn route(&self) -> Option<&Route> {
        match self {
            Self::AlreadyThere { .. } => None,
            Self::Travel(route) => Some(route),
        }
    }

    pub fn hop_count(&self) -> usize {
        self.route().map_or(0, Route::len)
    }
}

/// Deterministic planner over a catalog and its graph.
pub struct RoutePlanner<'a> {
    catalog: &'a StopCatalog,
    graph: &'a RouteGraph,
}

impl<'a> RoutePlanner<'a> {
    pub fn new(catalog: &'a StopCatalog, graph: &'a RouteGraph) -> Self {
        Self { catalog, graph }
    }

    /// Plans a route from `origin` to the stop serving `destination`.
    ///
    /// Returns `None` when no path exists, including when the origin is not a
    /// cataloged stop or the destination has no serving stop. That outcome is
    /// common (catalog gaps) and is not an error.
    pub fn plan_route(&self, origin: &Location, destination: &Destination) -> Option<RoutePlan> {
        let target = self.catalog.nearest_stop(destination)?.location().clone();

        if origin == &target {
            return Some(RoutePlan::AlreadyThere { stop: target });
        }

        let path = self.shortest_path(origin, &target)?;
        let route = self.build_route(&path, destination)?;

        debug!(
            target: "transit::planner",
            origin = %origin,
            destination = destination.name(),
            hops = route.len(),
            estimated_time = route.estimated_time(),
            "route planned"
        );

        Some(RoutePlan::Travel(route))
    }

    /// Minimum-hop, then minimum-cost, stop path from `origin` to `target`.
    fn shortest_path(&self, origin: &Location, target: &Location) -> Option<Vec<Location>> {
        if !self.graph.contains(origin) {
            return None;
        }

        // location -> (best cost at its BFS layer, predecessor)
        let mut settled: BTreeMap<Location, (EdgeCost, Option<Location>)> = BTreeMap::new();
        settled.insert(origin.clone(), (EdgeCost::ZERO, None));
        let mut frontier = vec![origin.clone()];

        while !frontier.is_empty() && !settled.contains_key(target) {
            let mut layer: BTreeMap<Location, (EdgeCost, Location)> = BTreeMap::new();

            // frontier is sorted, so on equal cost the first predecessor seen
            // is the lexically smallest one
            for node in &frontier {
                let base = settled[node].0;
                for edge in self.graph.edges_from(node) {
                    if settled.contains_key(&edge.to) {
                        continue;
                    }
                    let cost = base + edge.cost;
                    match layer.entry(edge.to.clone()) {
                        Entry::Vacant(entry) => {
                            entry.insert((cost, node.clone()));
                        }
                        Entry::Occupied(mut entry) => {
                            if cost < entry.get().0 {
                                entry.insert((cost, node.clone()));
                            }
                        }
                    }
                }
            }

            frontier = layer.keys().cloned().collect();
            for (location, (cost, predecessor)) in layer {
                settled.insert(location, (cost, Some(predecessor)));
            }
        }

        let mut path = vec![target.clone()];
        let mut cursor = settled.get(target)?.1.clone();
        while let Some(location) = cursor {
            cursor = settled.get(&location).and_then(|(_, prev)| prev.clone());
            path.push(location);
        }
        path.reverse();
        Some(path)
    }

    fn build_route(&self, path: &[Location], destination: &Destination) -> Option<Route> {
        let mut hops = Vec::with_capacity(path.len().saturating_sub(1));

        for (index, pair) in path.windows(2).enumerate() {
            let (from, to) = (&pair[0], &pair[1]);
            let stop = self.catalog.stop(from)?;
            let edge = self.graph.edge(from, to)?;

            hops.push(Hop {
                origin: from.clone(),
                interactable_coordinates: stop.coordinates(),
                interactable_name: stop.interactable_name().to_owned(),
                planet: to.planet.clone(),
                city: to.city.clone(),
                // the first hop boards from where the avatar stands; every later
                // hop changes onto the next stop's line
                is_transfer: index > 0,
                cost: edge.cost,
            });
        }

        Route::new(hops, destination.clone()).ok()
    }
}
