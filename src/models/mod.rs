//! Data models for the geogreet service
//!
//! This module contains the per-request domain models organized by concern:
//! - Location: the visitor's city and coordinates
//! - Weather: the temperature snapshot and the upstream payload it comes from
//! - Greeting: the JSON bodies returned by `/api/hello`

pub mod greeting;
pub mod location;
pub mod weather;

// Re-export all public types for convenient access
pub use greeting::{ErrorBody, Greeting, GreetingResponse};
pub use location::ClientLocation;
pub use weather::{CurrentWeatherResponse, WeatherSnapshot};
