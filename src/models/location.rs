//! Location model for the visitor's geolocated city

use serde::{Deserialize, Serialize};

/// City used whenever geolocation cannot produce a result
pub const FALLBACK_CITY: &str = "New York";
/// Latitude of [`FALLBACK_CITY`]
pub const FALLBACK_LATITUDE: f64 = 40.7128;
/// Longitude of [`FALLBACK_CITY`]
pub const FALLBACK_LONGITUDE: f64 = -74.0060;

/// Where a visitor appears to be, as far as one request is concerned
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ClientLocation {
    /// City name as reported by the geolocation service
    pub city: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl ClientLocation {
    /// Create a new location
    #[must_use]
    pub fn new(city: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            city: city.into(),
            latitude,
            longitude,
        }
    }

    /// The fixed fallback location (New York)
    #[must_use]
    pub fn fallback() -> Self {
        Self::new(FALLBACK_CITY, FALLBACK_LATITUDE, FALLBACK_LONGITUDE)
    }

    /// Whether both coordinates are usable for a weather lookup.
    ///
    /// A coordinate of exactly zero counts as missing, so locations on the
    /// equator or the prime meridian never get a weather lookup.
    #[must_use]
    pub fn has_coordinates(&self) -> bool {
        self.latitude != 0.0 && self.longitude != 0.0
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}
