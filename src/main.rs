use anyhow::{Context, Result};
use geogreet::config::LoggingConfig;
use geogreet::{GreeterConfig, VERSION, web};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; real environment variables still apply.
    let dotenv = dotenvy::dotenv();

    let config = GreeterConfig::load().context("Failed to load configuration")?;
    init_logging(&config.logging);

    if let Ok(path) = dotenv {
        tracing::debug!("Loaded environment from {}", path.display());
    }
    tracing::info!(
        version = VERSION,
        ipinfo_token = config.geolocation.token.is_some(),
        weather_api_key = config.weather.api_key.is_some(),
        "Starting geogreet"
    );

    web::run(config).await
}

fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    if logging.format == "json" {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
