use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::model::{AUTO_TIMEZONE, Coordinates};

pub const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Where the two Open-Meteo services live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub geocoding_url: String,
    pub forecast_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            geocoding_url: DEFAULT_GEOCODING_URL.to_string(),
            forecast_url: DEFAULT_FORECAST_URL.to_string(),
        }
    }
}

/// Geocoding request parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub language: String,
    /// How many candidates to ask for. Only the first one is used.
    pub candidate_count: u8,
    /// Looked up when `meteo` runs without a subcommand.
    pub default_city: Option<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            candidate_count: 5,
            default_city: Some("Cairo".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Used for coordinate lookups, where no place timezone is known.
    pub default_timezone: String,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self { default_timezone: AUTO_TIMEZONE.to_string() }
    }
}

/// Device location options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeolocationConfig {
    pub enable_high_accuracy: bool,
    pub timeout_ms: u64,
    /// Fixed location reported by `meteo here`.
    pub home: Option<Coordinates>,
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        Self { enable_high_accuracy: false, timeout_ms: 10_000, home: None }
    }
}

impl GeolocationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// [search]
/// default_city = "Cairo"
///
/// [geolocation.home]
/// latitude = 30.0444
/// longitude = 31.2357
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub endpoints: Endpoints,
    pub search: SearchConfig,
    pub forecast: ForecastConfig,
    pub geolocation: GeolocationConfig,
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "meteo", "meteo-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Set or clear the home location used for `meteo here`.
    pub fn set_home(&mut self, home: Option<Coordinates>) {
        self.geolocation.home = home;
    }
}
