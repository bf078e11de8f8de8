//! Greeting orchestration
//!
//! Ties the geolocation and weather clients together for a single visitor:
//! locate the IP, look up the temperature there, and compose the greeting.

use std::net::SocketAddr;

use axum::http::HeaderMap;
use tracing::{info, instrument};

use crate::config::GreeterConfig;
use crate::geolocation::GeoLookupClient;
use crate::models::Greeting;
use crate::weather::WeatherClient;
use crate::{GreeterError, Result};

/// Visitor name used when the request does not supply one
pub const DEFAULT_VISITOR_NAME: &str = "Guest";

const FORWARDED_FOR: &str = "x-forwarded-for";

/// Service composing greetings from geolocation and weather lookups
#[derive(Debug, Clone)]
pub struct GreetingHandler {
    geolocation: GeoLookupClient,
    weather: WeatherClient,
}

impl GreetingHandler {
    #[must_use]
    pub fn new(geolocation: GeoLookupClient, weather: WeatherClient) -> Self {
        Self {
            geolocation,
            weather,
        }
    }

    /// Build both upstream clients from configuration
    pub fn from_config(config: &GreeterConfig) -> Result<Self> {
        Ok(Self::new(
            GeoLookupClient::new(&config.geolocation)?,
            WeatherClient::new(&config.weather)?,
        ))
    }

    /// Greet a visitor with the temperature in their city
    #[instrument(skip(self))]
    pub async fn handle(&self, client_ip: &str, visitor_name: &str) -> Result<Greeting> {
        let location = self.geolocation.resolve(client_ip).await;
        info!(
            city = %location.city,
            coordinates = %location.format_coordinates(),
            "Resolved client location"
        );

        if !location.has_coordinates() {
            return Err(GreeterError::WeatherUnavailable);
        }

        let snapshot = self
            .weather
            .resolve(location.latitude, location.longitude)
            .await
            .and_then(|weather| weather.snapshot())
            .ok_or(GreeterError::WeatherUnavailable)?;
        info!(temperature = %snapshot.format_temperature(), "Retrieved weather");

        Ok(Greeting::compose(
            client_ip,
            visitor_name,
            &location,
            &snapshot,
        ))
    }
}

/// The visitor's address: first `X-Forwarded-For` entry, else the peer address
#[must_use]
pub fn client_ip(headers: &HeaderMap, peer: SocketAddr) -> String {
    headers
        .get(FORWARDED_FOR)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|first| first.trim().to_string())
        .unwrap_or_else(|| peer.ip().to_string())
}
