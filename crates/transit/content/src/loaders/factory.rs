//! Content factory for loading travel data from a data directory.

use std::path::{Path, PathBuf};

use transit_core::{StopCatalog, TravelConfig};

use crate::loaders::{CatalogLoader, ConfigLoader, LoadResult};

/// Content factory that loads all travel content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── travel.toml
/// └── catalog.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub const CATALOG_FILE: &'static str = "catalog.ron";
    pub const CONFIG_FILE: &'static str = "travel.toml";

    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load the stop catalog from `catalog.ron`.
    pub fn load_catalog(&self) -> LoadResult<StopCatalog> {
        CatalogLoader::load(&self.data_dir.join(Self::CATALOG_FILE))
    }

    /// Load journey tuning from `travel.toml`, or defaults if the file is absent.
    pub fn load_config(&self) -> LoadResult<TravelConfig> {
        let path = self.data_dir.join(Self::CONFIG_FILE);
        if !path.exists() {
            tracing::debug!(
                target: "transit::content",
                path = %path.display(),
                "no travel config found, using defaults"
            );
            return Ok(TravelConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
