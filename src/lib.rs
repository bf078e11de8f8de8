//! `geogreet` - visitor greetings with local weather
//!
//! This library provides an HTTP service that locates a visitor by IP
//! address and greets them with the current temperature in their city.

pub mod api;
pub mod config;
pub mod error;
pub mod geolocation;
pub mod greeting;
pub mod models;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use config::GreeterConfig;
pub use error::GreeterError;
pub use geolocation::GeoLookupClient;
pub use greeting::GreetingHandler;
pub use models::{ClientLocation, Greeting, GreetingResponse, WeatherSnapshot};
pub use weather::WeatherClient;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, GreeterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
