//! Travel configuration loader.

use std::path::Path;

use transit_core::TravelConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for journey tuning from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Keys missing from the file keep their defaults.
    pub fn load(path: &Path) -> LoadResult<TravelConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse config data from TOML text.
    pub fn parse(content: &str) -> LoadResult<TravelConfig> {
        let config: TravelConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if config.max_attempts == 0 {
            anyhow::bail!("max_attempts must be at least 1");
        }

        Ok(config)
    }
}
