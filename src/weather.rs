//! Weather API client for OpenWeatherMap
//!
//! Fetches the current conditions for a coordinate pair in metric units.
//! Any failure is logged and reported as `None`.

use reqwest::{Client, StatusCode};
use tracing::{debug, instrument, warn};

use crate::config::WeatherConfig;
use crate::models::CurrentWeatherResponse;
use crate::{GreeterError, Result};

const SERVICE: &str = "openweathermap";

/// Client for the current-weather API
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl WeatherClient {
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("geogreet/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// Current weather at the given coordinates, or `None` if it could not be retrieved
    #[instrument(skip(self))]
    pub async fn resolve(&self, latitude: f64, longitude: f64) -> Option<CurrentWeatherResponse> {
        match self.fetch_current(latitude, longitude).await {
            Ok(weather) => Some(weather),
            Err(e) => {
                warn!("Error getting weather information: {}", e);
                None
            }
        }
    }

    async fn fetch_current(&self, latitude: f64, longitude: f64) -> Result<CurrentWeatherResponse> {
        let url = format!("{}/data/2.5/weather", self.base_url);
        let params = [
            ("lat", latitude.to_string()),
            ("lon", longitude.to_string()),
            ("appid", self.api_key.clone().unwrap_or_default()),
            ("units", "metric".to_string()),
        ];

        let response = self.client.get(&url).query(&params).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            debug!(?status, %body, "Weather API response");
            return Err(GreeterError::upstream(
                SERVICE,
                format!("unexpected status {status}"),
            ));
        }

        let weather: CurrentWeatherResponse = response.json().await?;
        debug!(?weather, "Weather API response");
        Ok(weather)
    }
}
