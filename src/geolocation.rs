//! IP geolocation client for ipinfo.io
//!
//! Resolves a visitor's IP address to a city and coordinates. Every failure
//! (transport, status, payload) degrades to the fixed fallback location, so
//! callers always get a usable [`ClientLocation`].

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::config::GeolocationConfig;
use crate::models::ClientLocation;
use crate::models::location::FALLBACK_CITY;
use crate::{GreeterError, Result};

const SERVICE: &str = "ipinfo";

/// The subset of an ipinfo.io `/{ip}/json` response the service reads
#[derive(Debug, Deserialize)]
struct IpInfoResponse {
    city: Option<String>,
    /// "lat,lon"
    loc: Option<String>,
}

/// Client for the IP geolocation API
#[derive(Debug, Clone)]
pub struct GeoLookupClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl GeoLookupClient {
    pub fn new(config: &GeolocationConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("geogreet/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    /// Resolve an IP address to a location, falling back to New York on any failure
    #[instrument(skip(self))]
    pub async fn resolve(&self, ip_address: &str) -> ClientLocation {
        match self.lookup(ip_address).await {
            Ok(location) => location,
            Err(e) => {
                warn!("Error getting city information: {}", e);
                ClientLocation::fallback()
            }
        }
    }

    async fn lookup(&self, ip_address: &str) -> Result<ClientLocation> {
        let url = format!("{}/{}/json", self.base_url, ip_address);

        let mut request = self.client.get(&url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(GreeterError::upstream(
                SERVICE,
                format!("unexpected status {status}"),
            ));
        }

        let body: IpInfoResponse = response.json().await?;
        debug!(?body, "IPInfo response");

        let loc = body.loc.unwrap_or_default();
        let (latitude, longitude) = parse_loc(&loc).ok_or_else(|| {
            GreeterError::upstream(SERVICE, format!("unusable loc field '{loc}'"))
        })?;

        let city = body.city.unwrap_or_else(|| FALLBACK_CITY.to_string());
        Ok(ClientLocation::new(city, latitude, longitude))
    }
}

/// Split a "lat,lon" string into two finite numbers
fn parse_loc(loc: &str) -> Option<(f64, f64)> {
    let parts: Vec<&str> = loc.split(',').collect();
    let [lat, lon] = parts.as_slice() else {
        return None;
    };
    let lat: f64 = lat.trim().parse().ok()?;
    let lon: f64 = lon.trim().parse().ok()?;
    (lat.is_finite() && lon.is_finite()).then_some((lat, lon))
}
