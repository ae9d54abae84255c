//! WMO weather interpretation codes as reported by Open-Meteo.
//!
//! See: https://open-meteo.com/en/docs#weathervariables

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeatherCodeEntry {
    pub code: i32,
    pub description: &'static str,
    pub icon: &'static str,
}

/// Returned for any code the table does not know.
pub const UNKNOWN: WeatherCodeEntry = WeatherCodeEntry {
    code: -1,
    description: "Unknown",
    icon: "❓",
};

const fn entry(code: i32, description: &'static str, icon: &'static str) -> WeatherCodeEntry {
    WeatherCodeEntry { code, description, icon }
}

// Sorted by code; `lookup` relies on it.
static TABLE: [WeatherCodeEntry; 28] = [
    entry(0, "Clear sky", "☀️"),
    entry(1, "Mainly clear", "🌤️"),
    entry(2, "Partly cloudy", "⛅"),
    entry(3, "Overcast", "☁️"),
    entry(45, "Fog", "🌫️"),
    entry(48, "Depositing rime fog", "🌫️"),
    entry(51, "Light drizzle", "🌦️"),
    entry(53, "Moderate drizzle", "🌦️"),
    entry(55, "Dense drizzle", "🌧️"),
    entry(56, "Light freezing drizzle", "🌧️❄️"),
    entry(57, "Dense freezing drizzle", "🌧️❄️"),
    entry(61, "Slight rain", "🌧️"),
    entry(63, "Moderate rain", "🌧️"),
    entry(65, "Heavy rain", "🌧️"),
    entry(66, "Light freezing rain", "🌧️❄️"),
    entry(67, "Heavy freezing rain", "🌧️❄️"),
    entry(71, "Slight snow fall", "🌨️"),
    entry(73, "Moderate snow fall", "🌨️"),
    entry(75, "Heavy snow fall", "🌨️"),
    entry(77, "Snow grains", "🌨️"),
    entry(80, "Slight rain showers", "🌧️"),
    entry(81, "Moderate rain showers", "🌧️"),
    entry(82, "Violent rain showers", "⛈️"),
    entry(85, "Slight snow showers", "🌨️"),
    entry(86, "Heavy snow showers", "🌨️"),
    entry(95, "Thunderstorm", "⛈️"),
    entry(96, "Thunderstorm with slight hail", "⛈️"),
    entry(99, "Thunderstorm with heavy hail", "⛈️"),
];

/// Look up a weather code. Never fails: unknown codes map to [`UNKNOWN`]
/// carrying the requested code.
pub fn lookup(code: i32) -> WeatherCodeEntry {
    TABLE
        .binary_search_by_key(&code, |e| e.code)
        .map(|idx| TABLE[idx])
        .unwrap_or(WeatherCodeEntry { code, ..UNKNOWN })
}

/// All known entries in ascending code order.
pub fn entries() -> &'static [WeatherCodeEntry] {
    &TABLE
}
