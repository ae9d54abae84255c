//! Display fields and the surface they are written to.

use serde::Serialize;

use crate::{codes, model::CurrentWeather};

pub const HUMIDITY_PLACEHOLDER: &str = "—";

/// Everything a display surface shows for one successful query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherView {
    /// Rounded, e.g. "25°C".
    pub temperature: String,
    pub description: &'static str,
    pub icon: &'static str,
    pub code: i32,
    /// Unrounded, e.g. "25.3 °C".
    pub feels_like: String,
    /// e.g. "10 km/h (180°)".
    pub wind: String,
    pub humidity: &'static str,
    pub observed_at: String,
    pub location: String,
}

impl WeatherView {
    pub fn new(current: &CurrentWeather, location: impl Into<String>) -> Self {
        let entry = codes::lookup(current.weathercode);

        let observed_at = current
            .observed_at()
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| current.time.clone());

        Self {
            temperature: format!("{}°C", round_half_up(current.temperature)),
            description: entry.description,
            icon: entry.icon,
            code: current.weathercode,
            feels_like: format!("{} °C", current.temperature),
            wind: format!("{} km/h ({}°)", current.windspeed, current.winddirection),
            humidity: HUMIDITY_PLACEHOLDER,
            observed_at,
            location: location.into(),
        }
    }
}

/// Halves round towards positive infinity: 2.5 -> 3, -2.5 -> -2.
fn round_half_up(value: f64) -> i64 {
    let floor = value.floor();
    // `value + 0.5` would itself round up just below a half.
    let rounded = if value - floor >= 0.5 { floor + 1.0 } else { floor };
    rounded as i64
}

/// The display surface. A query writes progress and status text while it
/// runs and finishes with either a message or a render.
pub trait RenderSink: Send + Sync {
    /// Transient "working on it" text.
    fn progress(&self, text: &str);
    /// Final status or error text for a query that produced no render.
    fn message(&self, text: &str);
    /// Remove any progress or status text.
    fn clear(&self);
    fn render(&self, view: &WeatherView);
}
