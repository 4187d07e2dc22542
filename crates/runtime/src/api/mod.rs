//! Public API surface for embedding the travel executor.
//!
//! Collaborator contracts, the status handle, and the error taxonomy live
//! here; the executor itself is in [`crate::executor`].
pub mod collaborators;
pub mod errors;
pub mod handle;

pub use collaborators::{AllowAll, Interactor, Locator, Mover, PreconditionPolicy, RequirementSet};
pub use errors::{BuildError, CollaboratorError, Result, TravelError};
pub use handle::TravelHandle;
