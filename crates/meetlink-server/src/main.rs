use anyhow::{Context, Result};

use meetlink_auth::ClientCredentials;
use meetlink_core::ServerConfig;
use meetlink_server::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    meetlink_core::init()?;

    let config = ServerConfig::from_env()?;
    let credentials = ClientCredentials::load(&config.credentials_path).with_context(|| {
        format!(
            "Failed to load client credentials from {}",
            config.credentials_path.display()
        )
    })?;

    let state = AppState::new(config, credentials)?;
    meetlink_server::run(state).await
}
