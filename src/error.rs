//! Error types and handling for the `geogreet` service

use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::models::GreetingResponse;

/// Main error type for the `geogreet` service
#[derive(Error, Debug)]
pub enum GreeterError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// An upstream service answered, but not with something usable
    #[error("{service} request failed: {message}")]
    Upstream {
        service: &'static str,
        message: String,
    },

    /// No temperature could be obtained for the visitor's location
    #[error("Failed to retrieve weather information.")]
    WeatherUnavailable,

    /// Transport or decoding errors from the HTTP client
    #[error("HTTP client error: {source}")]
    Http {
        #[from]
        source: reqwest::Error,
    },

    /// Anything else raised while handling a request
    #[error("{message}")]
    General { message: String },
}

impl GreeterError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new upstream error for the named service
    pub fn upstream<S: Into<String>>(service: &'static str, message: S) -> Self {
        Self::Upstream {
            service,
            message: message.into(),
        }
    }

    /// Create a new general error
    pub fn general<S: Into<String>>(message: S) -> Self {
        Self::General {
            message: message.into(),
        }
    }
}

impl IntoResponse for GreeterError {
    fn into_response(self) -> Response {
        GreetingResponse::failure(self.to_string()).into_response()
    }
}
