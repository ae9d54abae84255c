//! Core library for the `meteo` CLI.
//!
//! This crate defines:
//! - Configuration handling
//! - Open-Meteo geocoding and forecast clients behind provider traits
//! - The weather code table and display formatting
//! - Query orchestration with a latest-query-wins guard
//!
//! It is used by `meteo-cli`, but any [`RenderSink`] can drive it.

pub mod codes;
pub mod config;
pub mod error;
pub mod geolocation;
pub mod model;
pub mod provider;
pub mod render;
pub mod service;

pub use codes::{WeatherCodeEntry, lookup};
pub use config::Config;
pub use error::{GeolocationError, QueryError};
pub use geolocation::{ConfiguredLocation, LocationSource, PositionOptions};
pub use model::{Coordinates, CurrentWeather, ForecastResponse, Place};
pub use provider::{ForecastProvider, GeocodingProvider, provider_from_config};
pub use render::{RenderSink, WeatherView};
pub use service::{QueryOutcome, WeatherService};
