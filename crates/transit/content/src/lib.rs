//! Data-driven travel content and loaders.
//!
//! This crate reads the static inputs of the travel stack from disk:
//! - Transit stops with their one-hop connectivity (RON catalog document)
//! - Trainer, quest and unlock destinations (same RON document)
//! - Journey tuning parameters (TOML)
//!
//! Raw file records are converted into the validated `transit-core` types at
//! load time, so malformed entries fail fast instead of reaching the planner.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{CatalogLoader, ConfigLoader, ContentFactory, LoadResult};
