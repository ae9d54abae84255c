use crate::{
    Config,
    model::{ForecastResponse, Place},
    provider::open_meteo::OpenMeteoProvider,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod open_meteo;

/// Resolves free text to a place.
#[async_trait]
pub trait GeocodingProvider: Send + Sync + Debug {
    /// Best match for `name`, or `None` when the service knows no such place.
    /// `name` must be trimmed and non-empty.
    async fn resolve(&self, name: &str) -> anyhow::Result<Option<Place>>;
}

/// Fetches current conditions for a coordinate.
#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    async fn fetch_current(
        &self,
        latitude: f64,
        longitude: f64,
        timezone: &str,
    ) -> anyhow::Result<ForecastResponse>;
}

/// Construct the Open-Meteo provider from config. It serves both roles.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<OpenMeteoProvider>> {
    let provider = OpenMeteoProvider::from_config(config)?;
    Ok(Arc::new(provider))
}
