//! Device location sources.

use async_trait::async_trait;
use std::{fmt::Debug, time::Duration};

use crate::{config::GeolocationConfig, error::GeolocationError, model::Coordinates};

/// Options handed to a location source for one acquisition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub enable_high_accuracy: bool,
    pub timeout: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self { enable_high_accuracy: false, timeout: Duration::from_secs(10) }
    }
}

impl From<&GeolocationConfig> for PositionOptions {
    fn from(cfg: &GeolocationConfig) -> Self {
        Self { enable_high_accuracy: cfg.enable_high_accuracy, timeout: cfg.timeout() }
    }
}

#[async_trait]
pub trait LocationSource: Send + Sync + Debug {
    /// Whether this source can produce a location at all.
    fn is_supported(&self) -> bool;

    /// Current position. Callers bound this by `options.timeout`.
    async fn current_position(
        &self,
        options: &PositionOptions,
    ) -> Result<Coordinates, GeolocationError>;
}

/// Location fixed in the configuration file.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredLocation {
    home: Option<Coordinates>,
}

impl ConfiguredLocation {
    pub fn new(home: Option<Coordinates>) -> Self {
        Self { home }
    }
}

impl From<&GeolocationConfig> for ConfiguredLocation {
    fn from(cfg: &GeolocationConfig) -> Self {
        Self::new(cfg.home)
    }
}

#[async_trait]
impl LocationSource for ConfiguredLocation {
    fn is_supported(&self) -> bool {
        self.home.is_some()
    }

    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> Result<Coordinates, GeolocationError> {
        self.home.ok_or(GeolocationError::PositionUnavailable)
    }
}

/// Acquire a position from `source`, giving up after `options.timeout`.
pub async fn acquire(
    source: &dyn LocationSource,
    options: &PositionOptions,
) -> Result<Coordinates, GeolocationError> {
    match tokio::time::timeout(options.timeout, source.current_position(options)).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(timeout = ?options.timeout, "location acquisition timed out");
            Err(GeolocationError::Timeout)
        }
    }
}
