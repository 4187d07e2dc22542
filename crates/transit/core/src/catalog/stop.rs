use core::fmt;

use super::CatalogError;

/// Planar in-zone coordinates as reported by the environment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinates {
    pub x: i32,
    pub y: i32,
}

impl Coordinates {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance rounded to the nearest whole unit.
    pub fn distance_to(self, other: Self) -> u32 {
        let dx = f64::from(self.x) - f64::from(other.x);
        let dy = f64::from(self.y) - f64::from(other.y);
        // sqrt of the squared i32 span always fits in u32
        (dx * dx + dy * dy).sqrt().round() as u32
    }
}

/// A `(planet, city)` pair. Identifies a stop and is what the locator reports.
///
/// Ordering is lexical by planet, then city; the planner relies on it for
/// stable tie-breaking.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    pub planet: String,
    pub city: String,
}

impl Location {
    pub fn new(planet: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            planet: planet.into(),
            city: city.into(),
        }
    }

    pub fn is_same_planet(&self, other: &Location) -> bool {
        self.planet == other.planet
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.planet, self.city)
    }
}

/// One-hop connectivity from a stop, with optional static cost data.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reachable {
    pub location: Location,
    /// Distance in world units, derived from coordinates when absent.
    pub distance: Option<u32>,
    /// Travel time in seconds, [`crate::EdgeCost::DEFAULT_HOP_SECONDS`] when absent.
    pub travel_time: Option<u32>,
}

impl Reachable {
    pub fn new(location: Location) -> Self {
        Self {
            location,
            distance: None,
            travel_time: None,
        }
    }

    #[must_use]
    pub fn with_distance(mut self, distance: u32) -> Self {
        self.distance = Some(distance);
        self
    }

    #[must_use]
    pub fn with_travel_time(mut self, seconds: u32) -> Self {
        self.travel_time = Some(seconds);
        self
    }
}

/// A transit node: where travel is initiated by operating `interactable_name`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Stop {
    location: Location,
    coordinates: Coordinates,
    interactable_name: String,
    reachable: Vec<Reachable>,
}

impl Stop {
    /// Creates a stop, rejecting empty identifying fields.
    pub fn new(
        location: Location,
        coordinates: Coordinates,
        interactable_name: impl Into<String>,
        reachable: Vec<Reachable>,
    ) -> Result<Self, CatalogError> {
        let interactable_name = interactable_name.into();
        let missing = if location.planet.trim().is_empty() {
            Some("planet")
        } else if location.city.trim().is_empty() {
            Some("city")
        } else if interactable_name.trim().is_empty() {
            Some("interactable_name")
        } else {
            None
        };

        if let Some(field) = missing {
            return Err(CatalogError::InvalidStop {
                location: location.to_string(),
                field,
            });
        }

        Ok(Self {
            location,
            coordinates,
            interactable_name,
            reachable,
        })
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn planet(&self) -> &str {
        &self.location.planet
    }

    pub fn city(&self) -> &str {
        &self.location.city
    }

    pub fn coordinates(&self) -> Coordinates {
        self.coordinates
    }

    pub fn interactable_name(&self) -> &str {
        &self.interactable_name
    }

    pub fn reachable(&self) -> &[Reachable] {
        &self.reachable
    }

    pub fn reaches(&self, location: &Location) -> bool {
        self.reachable.iter().any(|r| &r.location == location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_euclidean_and_rounded() {
        let a = Coordinates::new(0, 0);
        let b = Coordinates::new(3, 4);
        assert_eq!(a.distance_to(b), 5);
        assert_eq!(b.distance_to(a), 5);
        assert_eq!(a.distance_to(Coordinates::new(1, 1)), 1);
    }

    #[test]
    fn location_orders_by_planet_then_city() {
        let mut locations = vec![
            Location::new("tatooine", "mos_eisley"),
            Location::new("corellia", "tyrena"),
            Location::new("corellia", "coronet"),
        ];
        locations.sort();
        assert_eq!(locations[0], Location::new("corellia", "coronet"));
        assert_eq!(locations[2].to_string(), "tatooine/mos_eisley");
    }

    #[test]
    fn stop_rejects_blank_interactable() {
        let err = Stop::new(
            Location::new("naboo", "theed"),
            Coordinates::ORIGIN,
            "  ",
            Vec::new(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            CatalogError::InvalidStop {
                location: "naboo/theed".into(),
                field: "interactable_name",
            }
        );
    }
}
