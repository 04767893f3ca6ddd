use std::sync::Arc;

use meetlink_auth::{AuthorizationOptions, ClientCredentials, FileTokenStore, OAuthSession, TokenStore};
use meetlink_calendar::{CalendarGateway, EventDefaults};
use meetlink_core::{ConfigError, ServerConfig};

/// Everything a handler needs, built once at startup and cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub session: OAuthSession,
    pub tokens: Arc<dyn TokenStore>,
    pub gateway: CalendarGateway,
    pub defaults: EventDefaults,
}

impl AppState {
    /// Wire the components with a file-backed token store at `config.token_path`.
    ///
    /// # Errors
    /// `ConfigError::Invalid` if the credentials carry unparseable URLs.
    pub fn new(config: ServerConfig, credentials: ClientCredentials) -> Result<Self, ConfigError> {
        let tokens = Arc::new(FileTokenStore::new(config.token_path.clone()));
        Self::with_token_store(config, credentials, tokens)
    }

    pub fn with_token_store(
        config: ServerConfig,
        credentials: ClientCredentials,
        tokens: Arc<dyn TokenStore>,
    ) -> Result<Self, ConfigError> {
        let session = OAuthSession::new(credentials)?;
        let gateway = CalendarGateway::new(&config.calendar_api_base);
        let defaults = EventDefaults::new(config.time_zone);

        Ok(Self {
            config: Arc::new(config),
            session,
            tokens,
            gateway,
            defaults,
        })
    }

    /// Sign-in URL for the configured scopes.
    pub fn authorization_url(&self) -> String {
        let opts = AuthorizationOptions {
            force_consent: self.config.force_consent,
            ..Default::default()
        };
        self.session.build_authorization_url(&self.config.scopes, &opts)
    }
}
