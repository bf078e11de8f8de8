//! Configuration management for the `geogreet` service
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::GreeterError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Legacy variable holding the ipinfo.io token
pub const IPINFO_TOKEN_VAR: &str = "IPINFO_TOKEN";
/// Legacy variable holding the OpenWeatherMap API key
pub const OPENWEATHERMAP_API_KEY_VAR: &str = "OPENWEATHERMAP_API_KEY";
/// Points at an explicit configuration file
pub const CONFIG_PATH_VAR: &str = "GEOGREET_CONFIG";

/// Root configuration structure for the `geogreet` service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GreeterConfig {
    /// HTTP listener configuration
    pub server: ServerConfig,
    /// IP geolocation API configuration
    pub geolocation: GeolocationConfig,
    /// Weather API configuration
    pub weather: WeatherConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// IP geolocation API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeolocationConfig {
    /// Bearer token for ipinfo.io (unauthenticated calls when absent)
    pub token: Option<String>,
    /// Base URL for the geolocation API
    pub base_url: String,
}

/// Weather API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// OpenWeatherMap API key
    pub api_key: Option<String>,
    /// Base URL for the weather API
    pub base_url: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty or json)
    pub format: String,
}

// Default value functions
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_geolocation_base_url() -> String {
    "https://ipinfo.io".to_string()
}

fn default_weather_base_url() -> String {
    "http://api.openweathermap.org".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        Self {
            token: None,
            base_url: default_geolocation_base_url(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_weather_base_url(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl ServerConfig {
    /// `host:port` suitable for binding a listener
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl GreeterConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        let vars: HashMap<String, String> = std::env::vars().collect();
        let config_path = vars.get(CONFIG_PATH_VAR).map(PathBuf::from);
        Self::load_with_env(config_path, &vars)
    }

    /// Load configuration from an optional file path and an explicit set of
    /// environment variables.
    ///
    /// Precedence, lowest first: defaults, TOML file, `GEOGREET_*` variables,
    /// then `IPINFO_TOKEN` / `OPENWEATHERMAP_API_KEY`.
    pub fn load_with_env(
        config_path: Option<PathBuf>,
        vars: &HashMap<String, String>,
    ) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path()
                .filter(|path| path.exists())
                .unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment variable overrides with GEOGREET_ prefix, e.g. GEOGREET_SERVER__PORT
        let env_source: config::Map<String, String> = vars
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        builder = builder.add_source(
            Environment::with_prefix("GEOGREET")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(Some(env_source)),
        );

        builder = builder
            .set_override_option("geolocation.token", vars.get(IPINFO_TOKEN_VAR).cloned())
            .with_context(|| format!("Failed to apply {IPINFO_TOKEN_VAR}"))?
            .set_override_option(
                "weather.api_key",
                vars.get(OPENWEATHERMAP_API_KEY_VAR).cloned(),
            )
            .with_context(|| format!("Failed to apply {OPENWEATHERMAP_API_KEY_VAR}"))?;

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: GreeterConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        // Apply defaults for missing values
        config.apply_defaults();

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("geogreet").join("config.toml"))
    }

    /// Apply default values to empty configuration fields
    pub fn apply_defaults(&mut self) {
        if self.server.host.is_empty() {
            self.server.host = default_host();
        }
        if self.geolocation.base_url.is_empty() {
            self.geolocation.base_url = default_geolocation_base_url();
        }
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings. Credentials are not checked.
    pub fn validate(&self) -> Result<()> {
        self.validate_string_values()?;
        self.validate_urls()?;
        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(GreeterError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(GreeterError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        Ok(())
    }

    fn validate_urls(&self) -> Result<()> {
        for (name, url) in [
            ("Geolocation", &self.geolocation.base_url),
            ("Weather", &self.weather.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(GreeterError::config(format!(
                    "{name} API base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn missing_file() -> Option<PathBuf> {
        Some(PathBuf::from("/nonexistent/geogreet/config.toml"))
    }

    #[test]
    fn test_default_config() {
        let config = GreeterConfig::default();
        assert_eq!(config.server.address(), "127.0.0.1:5000");
        assert_eq!(config.geolocation.base_url, "https://ipinfo.io");
        assert_eq!(config.weather.base_url, "http://api.openweathermap.org");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "pretty");
        assert!(config.geolocation.token.is_none());
        assert!(config.weather.api_key.is_none());
    }

    #[test]
    fn test_missing_credentials_are_accepted() {
        let config = GreeterConfig::load_with_env(missing_file(), &HashMap::new()).unwrap();
        assert!(config.geolocation.token.is_none());
        assert!(config.weather.api_key.is_none());
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_legacy_credential_variables() {
        let env = vars(&[
            ("IPINFO_TOKEN", "ipinfo-token"),
            ("OPENWEATHERMAP_API_KEY", "owm-key"),
        ]);
        let config = GreeterConfig::load_with_env(missing_file(), &env).unwrap();
        assert_eq!(config.geolocation.token.as_deref(), Some("ipinfo-token"));
        assert_eq!(config.weather.api_key.as_deref(), Some("owm-key"));
    }

    #[test]
    fn test_prefixed_environment_overrides() {
        let env = vars(&[
            ("GEOGREET_SERVER__PORT", "8080"),
            ("GEOGREET_SERVER__HOST", "0.0.0.0"),
            ("GEOGREET_LOGGING__FORMAT", "json"),
            ("GEOGREET_WEATHER__BASE_URL", "http://localhost:9999"),
        ]);
        let config = GreeterConfig::load_with_env(missing_file(), &env).unwrap();
        assert_eq!(config.server.address(), "0.0.0.0:8080");
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.weather.base_url, "http://localhost:9999");
    }

    #[test]
    fn test_legacy_variable_wins_over_prefixed() {
        let env = vars(&[
            ("GEOGREET_GEOLOCATION__TOKEN", "from-prefix"),
            ("IPINFO_TOKEN", "from-legacy"),
        ]);
        let config = GreeterConfig::load_with_env(missing_file(), &env).unwrap();
        assert_eq!(config.geolocation.token.as_deref(), Some("from-legacy"));
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = GreeterConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_invalid_log_format() {
        let mut config = GreeterConfig::default();
        config.logging.format = "xml".to_string();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("Invalid log format"));
    }

    #[test]
    fn test_config_validation_bad_url() {
        let mut config = GreeterConfig::default();
        config.weather.base_url = "ftp://example.com".to_string();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("Weather API base URL"));
    }

    #[test]
    fn test_apply_defaults_fills_empty_values() {
        let mut config = GreeterConfig::default();
        config.server.host.clear();
        config.logging.level.clear();
        config.geolocation.base_url.clear();
        config.apply_defaults();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.geolocation.base_url, "https://ipinfo.io");
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = GreeterConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("geogreet"));
            assert!(path.to_string_lossy().contains("config.toml"));
        }
    }
}
