//! Immutable catalog of transit stops and named points of interest.
//!
//! The catalog is loaded once at startup (see `transit-content`) and never
//! mutated afterwards. Stops are keyed by [`Location`]; destinations are split
//! into trainer, quest and unlock partitions so lookups can fail with a
//! partition-specific error.

mod destination;
mod error;
mod stop;

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

pub use destination::{Destination, DestinationKind};
pub use error::CatalogError;
pub use stop::{Coordinates, Location, Reachable, Stop};

/// Every known stop plus the three destination partitions.
#[derive(Clone, Debug, Default)]
pub struct StopCatalog {
    stops: BTreeMap<Location, Stop>,
    trainers: BTreeMap<String, Destination>,
    quests: BTreeMap<String, Destination>,
    unlocks: BTreeMap<String, Destination>,
}

impl StopCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a stop.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateStop`] if a stop already exists at the
    /// same `(planet, city)`.
    pub fn insert_stop(&mut self, stop: Stop) -> Result<(), CatalogError> {
        match self.stops.entry(stop.location().clone()) {
            Entry::Occupied(entry) => Err(CatalogError::DuplicateStop(entry.key().to_string())),
            Entry::Vacant(entry) => {
                entry.insert(stop);
                Ok(())
            }
        }
    }

    /// Adds a destination to the partition matching its kind.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateDestination`] if the partition already
    /// holds an entry with the same name.
    pub fn insert_destination(&mut self, destination: Destination) -> Result<(), CatalogError> {
        let kind = destination.kind();
        match self.partition_mut(kind).entry(destination.name().to_owned()) {
            Entry::Occupied(entry) => Err(CatalogError::DuplicateDestination {
                kind,
                name: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                entry.insert(destination);
                Ok(())
            }
        }
    }

    pub fn stop(&self, location: &Location) -> Option<&Stop> {
        self.stops.get(location)
    }

    /// Stops in lexical `(planet, city)` order.
    pub fn stops(&self) -> impl Iterator<Item = &Stop> {
        self.stops.values()
    }

    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    pub fn destination(&self, kind: DestinationKind, name: &str) -> Option<&Destination> {
        self.partition(kind).get(name)
    }

    /// Looks a name up across partitions in trainer, quest, unlock order.
    pub fn find_destination(&self, name: &str) -> Option<&Destination> {
        self.trainers
            .get(name)
            .or_else(|| self.quests.get(name))
            .or_else(|| self.unlocks.get(name))
    }

    pub fn destinations(&self, kind: DestinationKind) -> impl Iterator<Item = &Destination> {
        self.partition(kind).values()
    }

    /// Resolves a destination to the stop used for routing.
    ///
    /// The stop in the destination's own city wins. Otherwise the closest stop
    /// on the same planet by coordinates, ties broken by location order.
    /// Destinations on planets without stops are unreachable.
    pub fn nearest_stop(&self, destination: &Destination) -> Option<&Stop> {
        if let Some(stop) = self.stops.get(destination.location()) {
            return Some(stop);
        }

        // BTreeMap iteration is ordered, and min_by_key keeps the first minimum
        self.stops
            .values()
            .filter(|stop| stop.planet() == destination.planet())
            .min_by_key(|stop| stop.coordinates().distance_to(destination.coordinates()))
    }

    fn partition(&self, kind: DestinationKind) -> &BTreeMap<String, Destination> {
        match kind {
            DestinationKind::Trainer => &self.trainers,
            DestinationKind::Quest => &self.quests,
            DestinationKind::Unlock => &self.unlocks,
        }
    }

    fn partition_mut(&mut self, kind: DestinationKind) -> &mut BTreeMap<String, Destination> {
        match kind {
            DestinationKind::Trainer => &mut self.trainers,
            DestinationKind::Quest => &mut self.quests,
            DestinationKind::Unlock => &mut self.unlocks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop(planet: &str, city: &str, x: i32, y: i32) -> Stop {
        Stop::new(
            Location::new(planet, city),
            Coordinates::new(x, y),
            "shuttle",
            Vec::new(),
        )
        .unwrap()
    }

    fn trainer(name: &str, planet: &str, city: &str, x: i32, y: i32) -> Destination {
        Destination::new(name, planet, city, Coordinates::new(x, y), DestinationKind::Trainer)
            .unwrap()
    }

    #[test]
    fn duplicate_stops_are_rejected() {
        let mut catalog = StopCatalog::new();
        catalog.insert_stop(stop("naboo", "theed", 0, 0)).unwrap();
        let err = catalog.insert_stop(stop("naboo", "theed", 5, 5)).unwrap_err();
        assert_eq!(err, CatalogError::DuplicateStop("naboo/theed".into()));
        assert_eq!(catalog.stop_count(), 1);
    }

    #[test]
    fn same_name_is_allowed_across_partitions() {
        let mut catalog = StopCatalog::new();
        catalog.insert_destination(trainer("Rook", "naboo", "theed", 0, 0)).unwrap();
        let quest =
            Destination::new("Rook", "naboo", "keren", Coordinates::ORIGIN, DestinationKind::Quest)
                .unwrap();
        catalog.insert_destination(quest).unwrap();

        assert!(catalog.destination(DestinationKind::Trainer, "Rook").is_some());
        assert_eq!(
            catalog.find_destination("Rook").map(Destination::kind),
            Some(DestinationKind::Trainer)
        );

        let err = catalog
            .insert_destination(trainer("Rook", "naboo", "moenia", 0, 0))
            .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateDestination { .. }));
    }

    #[test]
    fn nearest_stop_prefers_same_city_then_distance() {
        let mut catalog = StopCatalog::new();
        catalog.insert_stop(stop("naboo", "theed", 0, 0)).unwrap();
        catalog.insert_stop(stop("naboo", "keren", 100, 0)).unwrap();
        catalog.insert_stop(stop("tatooine", "bestine", 1, 1)).unwrap();

        let in_city = trainer("A", "naboo", "keren", 0, 0);
        assert_eq!(catalog.nearest_stop(&in_city).unwrap().city(), "keren");

        let wilderness = trainer("B", "naboo", "lake_retreat", 90, 0);
        assert_eq!(catalog.nearest_stop(&wilderness).unwrap().city(), "keren");

        let elsewhere = trainer("C", "dantooine", "outpost", 0, 0);
        assert!(catalog.nearest_stop(&elsewhere).is_none());
    }
}
