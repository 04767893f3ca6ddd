//! OAuth client credentials, loaded from the JSON file the provider's console
//! hands out.

use meetlink_core::ConfigError;
use serde::Deserialize;
use std::fmt;
use std::path::Path;

pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Client application identity registered with the OAuth provider.
#[derive(Clone)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub auth_uri: String,
    pub token_uri: String,
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri)
            .field("auth_uri", &self.auth_uri)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

#[derive(Deserialize)]
struct CredentialsFile {
    web: Option<RawClient>,
    installed: Option<RawClient>,
}

#[derive(Deserialize)]
struct RawClient {
    client_id: String,
    client_secret: String,
    #[serde(default)]
    redirect_uris: Vec<String>,
    auth_uri: Option<String>,
    token_uri: Option<String>,
}

impl ClientCredentials {
    /// Load credentials from a file.
    ///
    /// # Errors
    /// `ConfigError::NotFound` if the file does not exist, `ParseError` if it
    /// is not the expected JSON shape, `Invalid` if required values are empty.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.display().to_string())
            } else {
                ConfigError::ParseError(format!("{}: {}", path.display(), e))
            }
        })?;

        let credentials = Self::from_json(&contents)?;
        tracing::info!(
            "Loaded client credentials from {:?} (redirect: {})",
            path,
            credentials.redirect_uri
        );
        Ok(credentials)
    }

    /// Parse the provider JSON. Both `web` and `installed` shapes are accepted;
    /// the first redirect URI is used.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let file: CredentialsFile =
            serde_json::from_str(json).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        let raw = file.web.or(file.installed).ok_or_else(|| {
            ConfigError::ParseError("expected a \"web\" or \"installed\" object".to_string())
        })?;

        if raw.client_id.trim().is_empty() {
            return Err(ConfigError::Invalid("client_id is empty".to_string()));
        }

        let redirect_uri = raw
            .redirect_uris
            .into_iter()
            .find(|uri| !uri.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingSetting("redirect_uris".to_string()))?;

        Ok(Self {
            client_id: raw.client_id,
            client_secret: raw.client_secret,
            redirect_uri,
            auth_uri: raw.auth_uri.unwrap_or_else(|| GOOGLE_AUTH_URL.to_string()),
            token_uri: raw.token_uri.unwrap_or_else(|| GOOGLE_TOKEN_URL.to_string()),
        })
    }
}
