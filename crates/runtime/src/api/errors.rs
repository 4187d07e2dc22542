//! Unified error types surfaced by the travel API.
//!
//! [`TravelError`] is the terminal reason a travel request reports to its
//! caller; [`CollaboratorError`] is what external collaborators return when
//! they cannot even answer. The executor never propagates the latter: it is
//! logged and counted against the current hop's retry budget.
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use transit_core::{DestinationKind, ErrorSeverity, TransitError};

pub type Result<T> = std::result::Result<T, TravelError>;

/// Why a travel request did not arrive.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum TravelError {
    #[error("destination '{name}' is not cataloged")]
    UnknownDestination { name: String },

    #[error("trainer '{name}' is not cataloged")]
    UnknownTrainer { name: String },

    #[error("quest '{name}' is not cataloged")]
    UnknownQuest { name: String },

    #[error("unlock '{name}' is not cataloged")]
    UnknownUnlock { name: String },

    #[error("current location does not match a cataloged stop")]
    LocationUnknown,

    #[error("no route to '{destination}'")]
    NoRouteAvailable { destination: String },

    #[error("preconditions for '{destination}' are not met")]
    PreconditionNotMet { destination: String },

    #[error("hop {hop_index} failed after {attempts} attempts")]
    HopExhausted { hop_index: usize, attempts: u32 },

    #[error("journey exceeded its {limit:?} deadline")]
    Timeout { limit: Duration },

    #[error("journey interrupted at hop {stop_index}")]
    Interrupted { stop_index: usize },

    #[error("a journey is already in progress")]
    AlreadyTraveling,
}

impl TravelError {
    /// Partition-specific lookup failure for `kind`.
    pub fn unknown(kind: DestinationKind, name: impl Into<String>) -> Self {
        let name = name.into();
        match kind {
            DestinationKind::Trainer => Self::UnknownTrainer { name },
            DestinationKind::Quest => Self::UnknownQuest { name },
            DestinationKind::Unlock => Self::UnknownUnlock { name },
        }
    }
}

impl TransitError for TravelError {
    fn severity(&self) -> ErrorSeverity {
        use TravelError::*;
        match self {
            UnknownDestination { .. }
            | UnknownTrainer { .. }
            | UnknownQuest { .. }
            | UnknownUnlock { .. }
            | NoRouteAvailable { .. }
            | PreconditionNotMet { .. }
            | AlreadyTraveling => ErrorSeverity::Validation,

            LocationUnknown => ErrorSeverity::Recoverable,

            HopExhausted { .. } | Timeout { .. } | Interrupted { .. } => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        use TravelError::*;
        match self {
            UnknownDestination { .. } => "TRAVEL_UNKNOWN_DESTINATION",
            UnknownTrainer { .. } => "TRAVEL_UNKNOWN_TRAINER",
            UnknownQuest { .. } => "TRAVEL_UNKNOWN_QUEST",
            UnknownUnlock { .. } => "TRAVEL_UNKNOWN_UNLOCK",
            LocationUnknown => "TRAVEL_LOCATION_UNKNOWN",
            NoRouteAvailable { .. } => "TRAVEL_NO_ROUTE",
            PreconditionNotMet { .. } => "TRAVEL_PRECONDITION_NOT_MET",
            HopExhausted { .. } => "TRAVEL_HOP_EXHAUSTED",
            Timeout { .. } => "TRAVEL_TIMEOUT",
            Interrupted { .. } => "TRAVEL_INTERRUPTED",
            AlreadyTraveling => "TRAVEL_ALREADY_TRAVELING",
        }
    }
}

/// Reasons a [`crate::TravelExecutor`] cannot be assembled.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("executor requires a stop catalog before building")]
    MissingCatalog,

    #[error("executor requires a {0} collaborator before building")]
    MissingCollaborator(&'static str),
}

/// Failure reported by a collaborator that could not complete a call at all.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct CollaboratorError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl CollaboratorError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}
