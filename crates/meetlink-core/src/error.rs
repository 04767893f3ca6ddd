//! Error kinds shared across the meetlink crates.
//!
//! Each enum keeps the technical detail in its `Display` output (for logs)
//! and exposes a fixed `user_message()` that is safe to show in a browser.

use thiserror::Error;

/// Configuration errors. Fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),

    #[error("Missing required setting: {0}")]
    MissingSetting(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::NotFound(_) => "Configuration not found. Check the credentials file.",
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::ParseError(_) => "Configuration file is malformed. Check your settings.",
            ConfigError::MissingSetting(_) => "A required setting is missing. Check your settings.",
        }
    }
}

/// Token persistence errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to read token file: {0}")]
    ReadFailed(String),

    #[error("Failed to write token file: {0}")]
    WriteFailed(String),

    #[error("Failed to delete token file: {0}")]
    DeleteFailed(String),

    #[error("Token file is corrupt: {0}")]
    Corrupt(String),
}

impl StorageError {
    pub fn user_message(&self) -> &'static str {
        match self {
            StorageError::ReadFailed(_) => "Failed to load saved credentials. Please try again.",
            StorageError::WriteFailed(_) => "Failed to save credentials. Please try again.",
            StorageError::DeleteFailed(_) => "Failed to remove saved credentials. Please try again.",
            StorageError::Corrupt(_) => {
                "Saved credentials are unreadable. Sign out and sign in again."
            }
        }
    }
}

/// Authentication errors (OAuth code exchange).
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("No authorization code in callback")]
    MissingCode,

    #[error("Authorization denied by provider: {0}")]
    Denied(String),

    #[error("Authorization code rejected: {0}")]
    Rejected(String),

    #[error("OAuth provider unreachable: {0}")]
    Unreachable(String),
}

impl AuthError {
    pub fn user_message(&self) -> &'static str {
        match self {
            AuthError::MissingCode => "No code found in query params.",
            AuthError::Denied(_) => "Sign-in was cancelled.",
            AuthError::Rejected(_) => "Sign-in failed. Please try again.",
            AuthError::Unreachable(_) => "Unable to reach the sign-in service. Please try again.",
        }
    }

    /// Whether the failure is on the provider's side rather than the request's.
    pub fn is_upstream(&self) -> bool {
        matches!(self, AuthError::Unreachable(_))
    }
}
