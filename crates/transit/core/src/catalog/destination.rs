use std::collections::BTreeMap;

use super::{CatalogError, Coordinates, Location};

/// Catalog partition a point of interest belongs to.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DestinationKind {
    Trainer,
    Quest,
    Unlock,
}

/// A named point of interest: trainer, quest giver, or gated location.
///
/// `requirements` and `unlock_conditions` are opaque to the travel stack; a
/// precondition policy interprets them before any planning happens.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Destination {
    name: String,
    location: Location,
    coordinates: Coordinates,
    kind: DestinationKind,
    requirements: Vec<String>,
    unlock_conditions: BTreeMap<String, String>,
}

impl Destination {
    /// Creates a destination.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidDestination`] if `name`, `planet` or
    /// `city` is empty; every lookup downstream keys on them.
    pub fn new(
        name: impl Into<String>,
        planet: impl Into<String>,
        city: impl Into<String>,
        coordinates: Coordinates,
        kind: DestinationKind,
    ) -> Result<Self, CatalogError> {
        let name = name.into();
        let location = Location::new(planet, city);

        let missing = if name.trim().is_empty() {
            Some("name")
        } else if location.planet.trim().is_empty() {
            Some("planet")
        } else if location.city.trim().is_empty() {
            Some("city")
        } else {
            None
        };

        if let Some(field) = missing {
            return Err(CatalogError::InvalidDestination { name, field });
        }

        Ok(Self {
            name,
            location,
            coordinates,
            kind,
            requirements: Vec::new(),
            unlock_conditions: BTreeMap::new(),
        })
    }

    #[must_use]
    pub fn with_requirements(mut self, requirements: Vec<String>) -> Self {
        self.requirements = requirements;
        self
    }

    #[must_use]
    pub fn with_unlock_conditions(mut self, conditions: BTreeMap<String, String>) -> Self {
        self.unlock_conditions = conditions;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
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

    pub fn kind(&self) -> DestinationKind {
        self.kind
    }

    pub fn requirements(&self) -> &[String] {
        &self.requirements
    }

    pub fn unlock_conditions(&self) -> &BTreeMap<String, String> {
        &self.unlock_conditions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_load_bearing_fields() {
        let err = Destination::new("", "naboo", "theed", Coordinates::ORIGIN, DestinationKind::Quest)
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidDestination { field: "name", .. }));

        let err = Destination::new("Bib", "", "theed", Coordinates::ORIGIN, DestinationKind::Quest)
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidDestination { field: "planet", .. }));

        let err = Destination::new("Bib", "naboo", " ", Coordinates::ORIGIN, DestinationKind::Quest)
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidDestination { field: "city", .. }));
    }

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("TRAINER".parse::<DestinationKind>().unwrap(), DestinationKind::Trainer);
        assert_eq!(DestinationKind::Unlock.to_string(), "unlock");
    }
}
