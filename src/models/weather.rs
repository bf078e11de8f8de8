//! Weather data model and the OpenWeatherMap wire format

use serde::{Deserialize, Serialize};

/// A single point-in-time temperature reading
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct WeatherSnapshot {
    /// Temperature in Celsius
    pub temperature_celsius: f64,
}

impl WeatherSnapshot {
    #[must_use]
    pub fn new(temperature_celsius: f64) -> Self {
        Self {
            temperature_celsius,
        }
    }

    /// Temperature with the fractional part dropped (21.7 -> 21, -3.8 -> -3)
    #[must_use]
    pub fn whole_degrees(&self) -> i64 {
        self.temperature_celsius.trunc() as i64
    }

    /// Format temperature with unit
    #[must_use]
    pub fn format_temperature(&self) -> String {
        format!("{:.1}°C", self.temperature_celsius)
    }
}

/// Current weather response from the OpenWeatherMap `data/2.5/weather` endpoint.
///
/// Only the fields the service reads are modelled; everything else is ignored.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct CurrentWeatherResponse {
    #[serde(default)]
    pub main: Option<MainReadings>,
}

/// The `main` block of an OpenWeatherMap response
#[derive(Debug, Deserialize, Clone, Default)]
pub struct MainReadings {
    /// Temperature in the requested units (metric here)
    #[serde(default)]
    pub temp: Option<f64>,
}

impl CurrentWeatherResponse {
    /// Extract `main.temp`, if present
    #[must_use]
    pub fn snapshot(&self) -> Option<WeatherSnapshot> {
        self.main
            .as_ref()
            .and_then(|main| main.temp)
            .map(WeatherSnapshot::new)
    }
}
