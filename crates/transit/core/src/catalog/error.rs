//! Catalog construction errors.

use crate::error::{ErrorSeverity, TransitError};

use super::DestinationKind;

/// Errors raised while building the immutable catalog.
///
/// All variants are validation failures: the catalog document is malformed
/// and loading should stop rather than thread bad records into planning.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("destination '{name}' has an empty {field}")]
    InvalidDestination { name: String, field: &'static str },

    #[error("stop at '{location}' has an empty {field}")]
    InvalidStop {
        location: String,
        field: &'static str,
    },

    #[error("stop at '{0}' is defined more than once")]
    DuplicateStop(String),

    #[error("{kind} '{name}' is defined more than once")]
    DuplicateDestination { kind: DestinationKind, name: String },
}

impl TransitError for CatalogError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidDestination { .. } => "CATALOG_INVALID_DESTINATION",
            Self::InvalidStop { .. } => "CATALOG_INVALID_STOP",
            Self::DuplicateStop(_) => "CATALOG_DUPLICATE_STOP",
            Self::DuplicateDestination { .. } => "CATALOG_DUPLICATE_DESTINATION",
        }
    }
}
