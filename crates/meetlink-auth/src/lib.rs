//! Client credentials, token persistence and the OAuth2 code flow.

pub mod credentials;
pub mod oauth;
pub mod storage;

pub use credentials::ClientCredentials;
pub use oauth::{AuthorizationOptions, AuthorizedClient, OAuthSession};
pub use storage::{FileTokenStore, TokenRecord, TokenStore};
