//! Catalog document loader.
//!
//! Loads stops and the three destination partitions from a single RON file.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;
use transit_core::{
    Coordinates, Destination, DestinationKind, Location, Reachable, Stop, StopCatalog,
};

use crate::loaders::{LoadResult, read_file};

/// Catalog document structure for RON files.
#[derive(Debug, Deserialize)]
struct CatalogRon {
    #[serde(default)]
    stops: Vec<StopRon>,
    #[serde(default)]
    trainers: Vec<DestinationRon>,
    #[serde(default)]
    quests: Vec<DestinationRon>,
    #[serde(default)]
    unlocks: Vec<DestinationRon>,
}

#[derive(Debug, Deserialize)]
struct StopRon {
    planet: String,
    city: String,
    coordinates: (i32, i32), // (x, y)
    interactable: String,
    #[serde(default)]
    reachable: Vec<ReachableRon>,
}

#[derive(Debug, Deserialize)]
struct ReachableRon {
    planet: String,
    city: String,
    #[serde(default)]
    distance: Option<u32>,
    #[serde(default)]
    travel_time: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct DestinationRon {
    name: String,
    planet: String,
    city: String,
    // required: routing falls back to the closest stop by these
    coordinates: (i32, i32),
    #[serde(default)]
    requirements: Vec<String>,
    #[serde(default)]
    unlock_conditions: BTreeMap<String, String>,
}

impl ReachableRon {
    fn into_reachable(self) -> Reachable {
        Reachable {
            location: Location::new(self.planet, self.city),
            distance: self.distance,
            travel_time: self.travel_time,
        }
    }
}

impl DestinationRon {
    fn into_destination(self, kind: DestinationKind) -> LoadResult<Destination> {
        let (x, y) = self.coordinates;
        let destination = Destination::new(
            self.name,
            self.planet,
            self.city,
            Coordinates::new(x, y),
            kind,
        )?
        .with_requirements(self.requirements)
        .with_unlock_conditions(self.unlock_conditions);
        Ok(destination)
    }
}

/// Loader for the stop catalog from RON files.
pub struct CatalogLoader;

impl CatalogLoader {
    /// Load a catalog from a RON file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the RON catalog document
    ///
    /// # Errors
    ///
    /// Fails on unreadable files, malformed RON, empty load-bearing fields,
    /// and duplicate stops or destination names.
    pub fn load(path: &Path) -> LoadResult<StopCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid catalog {}: {}", path.display(), e))
    }

    /// Parse a catalog from RON text.
    pub fn parse(content: &str) -> LoadResult<StopCatalog> {
        let data: CatalogRon = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse catalog RON: {}", e))?;

        let mut catalog = StopCatalog::new();

        for raw in data.stops {
            let (x, y) = raw.coordinates;
            let reachable = raw
                .reachable
                .into_iter()
                .map(ReachableRon::into_reachable)
                .collect();
            let stop = Stop::new(
                Location::new(raw.planet, raw.city),
                Coordinates::new(x, y),
                raw.interactable,
                reachable,
            )?;
            catalog.insert_stop(stop)?;
        }

        let partitions = [
            (DestinationKind::Trainer, data.trainers),
            (DestinationKind::Quest, data.quests),
            (DestinationKind::Unlock, data.unlocks),
        ];
        for (kind, entries) in partitions {
            for raw in entries {
                catalog.insert_destination(raw.into_destination(kind)?)?;
            }
        }

        debug!(
            target: "transit::content",
            stops = catalog.stop_count(),
            "catalog loaded"
        );

        Ok(catalog)
    }
}
