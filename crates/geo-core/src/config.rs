//! Configuration for geocoding and file locations.
//!
//! Load order: `geo.toml` → environment variables → defaults.
//! Command-line flags are applied on top by the CLI.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name looked up in the working directory by [`GeoConfig::load`].
pub const CONFIG_FILE: &str = "geo.toml";

/// Public Nominatim instance.
pub const DEFAULT_ENDPOINT: &str = "https://nominatim.openstreetmap.org";

/// User-Agent sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = "h501-student";

/// Default GraphML output file name.
pub const DEFAULT_GRAPH_FILE: &str = "G.graphml";

/// Top-level pipeline configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoConfig {
    pub geocoder: GeocoderConfig,
    pub paths: PathsConfig,
}

/// Geocoding service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    /// Base URL of the Nominatim-compatible service.
    pub endpoint: String,
    /// User-Agent sent with every request. Nominatim rejects anonymous clients.
    pub user_agent: String,
    /// Per-lookup timeout in seconds.
    pub timeout_secs: u64,
    /// What to do when a match lacks a `type` classification.
    pub missing_type: MissingTypePolicy,
}

/// Handling of a successful match whose raw payload has no `type` field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingTypePolicy {
    /// Abort the batch with a typed error.
    #[default]
    Fail,
    /// Record the location as fully missing and keep going.
    Degrade,
}

/// Input/output file locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Geocoded table written by the loader and read by the graph builder.
    pub csv: PathBuf,
    /// GraphML file written by the graph builder.
    pub graph: PathBuf,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 10,
            missing_type: MissingTypePolicy::Fail,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            csv: PathBuf::from(crate::table::DEFAULT_CSV_FILE),
            graph: PathBuf::from(DEFAULT_GRAPH_FILE),
        }
    }
}

/// Helper to parse an env var and apply it to a config field.
fn env_override<T: std::str::FromStr>(var: &str, target: &mut T) {
    if let Ok(v) = std::env::var(var)
        && let Ok(n) = v.parse()
    {
        *target = n;
    }
}

impl GeoConfig {
    /// Load config from `geo.toml` in `dir`, with env var overrides.
    /// Falls back to defaults if no config file exists.
    pub fn load(dir: &Path) -> Result<Self> {
        Self::load_file(&dir.join(CONFIG_FILE))
    }

    /// Load config from an explicit file path, with env var overrides.
    /// A missing file yields defaults.
    pub fn load_file(config_path: &Path) -> Result<Self> {
        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            toml::from_str(&content)?
        } else {
            Self::default()
        };

        env_override("GEO_ENDPOINT", &mut config.geocoder.endpoint);
        env_override("GEO_USER_AGENT", &mut config.geocoder.user_agent);
        env_override("GEO_TIMEOUT_SECS", &mut config.geocoder.timeout_secs);
        env_override("GEO_CSV_PATH", &mut config.paths.csv);
        env_override("GEO_GRAPH_PATH", &mut config.paths.graph);

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.geocoder.timeout_secs == 0 {
            anyhow::bail!("geocoder.timeout_secs must be greater than zero");
        }
        if self.geocoder.user_agent.trim().is_empty() {
            anyhow::bail!("geocoder.user_agent must not be empty");
        }
        Ok(())
    }

    /// Per-lookup timeout as a [`std::time::Duration`].
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.geocoder.timeout_secs)
    }
}
