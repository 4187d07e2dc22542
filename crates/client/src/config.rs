//! Environment overrides for the travel binary.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use transit_core::TravelConfig;

/// Settings read from the process environment after `.env` is loaded.
#[derive(Clone, Debug, Default)]
pub struct ClientConfig {
    pub data_dir: Option<PathBuf>,
    pub max_attempts: Option<u32>,
    pub timeout_seconds: Option<u64>,
    pub session_id: Option<String>,
}

impl ClientConfig {
    pub const DEFAULT_DATA_DIR: &'static str = "data";

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `TRAVEL_DATA_DIR` - Directory holding `catalog.ron` and `travel.toml` (default: `./data`)
    /// - `TRAVEL_MAX_ATTEMPTS` - Per-hop attempt budget, overrides `travel.toml`
    /// - `TRAVEL_TIMEOUT_SECONDS` - Journey deadline, overrides `travel.toml`
    /// - `TRAVEL_SESSION_ID` - Log session name (default: timestamp based)
    pub fn from_env() -> Self {
        Self {
            data_dir: env::var("TRAVEL_DATA_DIR").ok().map(PathBuf::from),
            max_attempts: read_env::<u32>("TRAVEL_MAX_ATTEMPTS").map(|n| n.max(1)),
            timeout_seconds: read_env::<u64>("TRAVEL_TIMEOUT_SECONDS"),
            session_id: env::var("TRAVEL_SESSION_ID").ok(),
        }
    }

    /// Data directory, preferring an explicit command-line value.
    pub fn resolve_data_dir(&self, cli: Option<PathBuf>) -> PathBuf {
        cli.or_else(|| self.data_dir.clone())
            .unwrap_or_else(|| PathBuf::from(Self::DEFAULT_DATA_DIR))
    }

    /// Layers the environment overrides on top of file-based tuning.
    pub fn apply(&self, mut config: TravelConfig) -> TravelConfig {
        if let Some(max_attempts) = self.max_attempts {
            config = config.with_max_attempts(max_attempts);
        }
        if let Some(seconds) = self.timeout_seconds {
            config = config.with_timeout(Duration::from_secs(seconds));
        }
        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
