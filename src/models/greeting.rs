//! Response payloads for the greeting endpoint

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};

use super::{ClientLocation, WeatherSnapshot};

/// Successful greeting payload
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Greeting {
    pub client_ip: String,
    pub location: String,
    pub greeting: String,
}

impl Greeting {
    /// Compose the greeting for a visitor at a location with a known temperature
    #[must_use]
    pub fn compose(
        client_ip: &str,
        visitor_name: &str,
        location: &ClientLocation,
        weather: &WeatherSnapshot,
    ) -> Self {
        Self {
            client_ip: client_ip.to_string(),
            location: location.city.clone(),
            greeting: format!(
                "Hello, {visitor_name}! The temperature is {} degrees Celsius in {}.",
                weather.whole_degrees(),
                location.city
            ),
        }
    }
}

/// Error payload, `{"error": "..."}`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ErrorBody {
    pub error: String,
}

/// What `/api/hello` answers with
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum GreetingResponse {
    Success(Greeting),
    Failure(ErrorBody),
}

impl GreetingResponse {
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure(ErrorBody {
            error: message.into(),
        })
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Success(_) => StatusCode::OK,
            Self::Failure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GreetingResponse {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}
