use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Timezone value asking the forecast service to pick the local zone
/// of the requested coordinates.
pub const AUTO_TIMEZONE: &str = "auto";

fn auto_timezone() -> String {
    AUTO_TIMEZONE.to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// "Lat 30.04, Lon 31.24"
    pub fn label(&self) -> String {
        format!("Lat {:.2}, Lon {:.2}", self.latitude, self.longitude)
    }
}

/// Best geocoding match for a place name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    #[serde(default)]
    pub country: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default = "auto_timezone")]
    pub timezone: String,
}

impl Place {
    /// "Cairo, Egypt", or just the name when the service omits the country.
    pub fn label(&self) -> String {
        match self.country.as_deref() {
            Some(country) if !country.is_empty() => format!("{}, {}", self.name, country),
            _ => self.name.clone(),
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

/// Snapshot observation from the forecast service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    /// °C
    pub temperature: f64,
    /// km/h
    pub windspeed: f64,
    /// degrees
    pub winddirection: f64,
    pub weathercode: i32,
    /// Local time at the location, e.g. "2024-01-01T12:00".
    pub time: String,
}

impl CurrentWeather {
    pub fn observed_at(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.time, "%Y-%m-%dT%H:%M")
            .or_else(|_| NaiveDateTime::parse_from_str(&self.time, "%Y-%m-%dT%H:%M:%S"))
            .ok()
    }
}

/// Forecast payload. `current_weather` may legitimately be missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub current_weather: Option<CurrentWeather>,
}
