use oauth2::basic::{BasicClient, BasicTokenType};
use oauth2::reqwest::async_http_client;
use oauth2::{
    AuthType, AuthUrl, AuthorizationCode, ClientId, ClientSecret, RedirectUrl, RequestTokenError,
    TokenResponse, TokenUrl,
};
use std::fmt;
use url::Url;

use meetlink_core::{AuthError, ConfigError};

use crate::credentials::ClientCredentials;
use crate::storage::TokenRecord;

/// Extra knobs for the authorization URL.
#[derive(Debug, Clone, Default)]
pub struct AuthorizationOptions {
    /// Show the consent screen even if the user already granted access.
    /// Providers only hand out a refresh token on consent.
    pub force_consent: bool,

    /// Pre-fill the account chooser
    pub login_hint: Option<String>,

    /// Opaque value echoed back on the callback
    pub state: Option<String>,
}

/// OAuth2 authorization-code flow for one client application.
///
/// Holds no tokens itself; persisting the result of an exchange is the
/// caller's job.
#[derive(Clone)]
pub struct OAuthSession {
    credentials: ClientCredentials,
    client: BasicClient,
    http: reqwest::Client,
}

impl OAuthSession {
    /// # Errors
    /// `ConfigError::Invalid` if any of the endpoint or redirect URLs do not parse.
    pub fn new(credentials: ClientCredentials) -> Result<Self, ConfigError> {
        let invalid =
            |what: &str, e: url::ParseError| ConfigError::Invalid(format!("{}: {}", what, e));

        let client = BasicClient::new(
            ClientId::new(credentials.client_id.clone()),
            Some(ClientSecret::new(credentials.client_secret.clone())),
            AuthUrl::new(credentials.auth_uri.clone()).map_err(|e| invalid("auth_uri", e))?,
            Some(TokenUrl::new(credentials.token_uri.clone()).map_err(|e| invalid("token_uri", e))?),
        )
        .set_auth_type(AuthType::RequestBody)
        .set_redirect_uri(
            RedirectUrl::new(credentials.redirect_uri.clone())
                .map_err(|e| invalid("redirect_uri", e))?,
        );

        Ok(Self {
            credentials,
            client,
            http: reqwest::Client::new(),
        })
    }

    pub fn credentials(&self) -> &ClientCredentials {
        &self.credentials
    }

    /// Build the provider's authorization URL.
    ///
    /// The result depends only on the credentials, `scopes` and `opts`.
    pub fn build_authorization_url(&self, scopes: &[String], opts: &AuthorizationOptions) -> String {
        let mut url = format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&access_type=offline",
            self.credentials.auth_uri,
            urlencoding::encode(&self.credentials.client_id),
            urlencoding::encode(&self.credentials.redirect_uri),
            urlencoding::encode(&scopes.join(" ")),
        );

        if opts.force_consent {
            url.push_str("&prompt=consent");
        }
        if let Some(hint) = &opts.login_hint {
            url.push_str(&format!("&login_hint={}", urlencoding::encode(hint)));
        }
        if let Some(state) = &opts.state {
            url.push_str(&format!("&state={}", urlencoding::encode(state)));
        }

        url
    }

    /// Exchange an authorization code for tokens.
    ///
    /// # Errors
    /// `AuthError::Rejected` when the provider refuses the code (invalid,
    /// expired, already used), `AuthError::Unreachable` when the token
    /// endpoint cannot be reached or answers with something unparseable.
    #[tracing::instrument(skip(self, code), level = "info")]
    pub async fn exchange_code_for_tokens(&self, code: &str) -> Result<TokenRecord, AuthError> {
        let response = self
            .client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .request_async(async_http_client)
            .await
            .map_err(|e| match e {
                RequestTokenError::ServerResponse(resp) => {
                    let reason = match resp.error_description() {
                        Some(desc) => format!("{}: {}", resp.error(), desc),
                        None => resp.error().to_string(),
                    };
                    AuthError::Rejected(reason)
                }
                RequestTokenError::Request(e) => AuthError::Unreachable(e.to_string()),
                RequestTokenError::Parse(e, _) => {
                    AuthError::Unreachable(format!("Unparseable token response: {}", e))
                }
                RequestTokenError::Other(msg) => AuthError::Unreachable(msg),
            })?;

        let expiry = response
            .expires_in()
            .map(|d| chrono::Utc::now().timestamp_millis() + d.as_millis() as i64);

        let scope = response
            .scopes()
            .map(|s| s.iter().map(|scope| scope.to_string()).collect::<Vec<_>>().join(" "))
            .unwrap_or_default();

        let token_type = match response.token_type() {
            BasicTokenType::Bearer => "Bearer".to_string(),
            BasicTokenType::Mac => "MAC".to_string(),
            BasicTokenType::Extension(other) => other.clone(),
        };

        if response.refresh_token().is_none() {
            tracing::warn!("Provider issued no refresh token; re-consent to obtain one");
        }

        tracing::info!("Authorization code exchanged");
        Ok(TokenRecord {
            access_token: response.access_token().secret().clone(),
            refresh_token: response.refresh_token().map(|t| t.secret().clone()),
            expiry,
            scope,
            token_type,
        })
    }

    /// Wrap a stored token into a client that signs outgoing requests.
    ///
    /// The token is used as-is; an expired one surfaces as a 401 from the
    /// downstream API.
    pub fn authorized_client(&self, token: &TokenRecord) -> AuthorizedClient {
        if token.is_expired() {
            tracing::debug!("Using a token past its expiry date");
        }
        AuthorizedClient {
            http: self.http.clone(),
            access_token: token.access_token.clone(),
        }
    }
}

/// HTTP client that attaches bearer credentials to each request.
#[derive(Clone)]
pub struct AuthorizedClient {
    http: reqwest::Client,
    access_token: String,
}

impl fmt::Debug for AuthorizedClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizedClient")
            .field("access_token", &"<redacted>")
            .finish()
    }
}

impl AuthorizedClient {
    pub fn new(http: reqwest::Client, access_token: impl Into<String>) -> Self {
        Self {
            http,
            access_token: access_token.into(),
        }
    }

    pub fn get(&self, url: Url) -> reqwest::RequestBuilder {
        self.sign(self.http.get(url))
    }

    pub fn post(&self, url: Url) -> reqwest::RequestBuilder {
        self.sign(self.http.post(url))
    }

    pub fn sign(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.bearer_auth(&self.access_token)
    }
}
