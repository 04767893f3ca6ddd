pub mod config;
pub mod error;

pub use config::{ServerConfig, ValidationResult};
pub use error::{AuthError, ConfigError, StorageError};

use anyhow::Result;

/// Initialize logging and load a `.env` file if one is present
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    match dotenvy::dotenv() {
        Ok(path) => tracing::info!("Loaded .env from: {:?}", path),
        Err(e) if e.not_found() => tracing::debug!("No .env file found"),
        Err(e) => tracing::warn!("Could not load .env file: {}", e),
    }

    tracing::info!("Meetlink core initialized");
    Ok(())
}
