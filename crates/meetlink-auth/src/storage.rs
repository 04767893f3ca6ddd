use chrono::{DateTime, Utc};
use meetlink_core::StorageError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Persisted OAuth token.
///
/// Field names follow the `token.json` layout written by Google's client
/// libraries, so an existing token file can be reused as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    /// Access token for API requests
    pub access_token: String,

    /// Refresh token, only issued on (re-)consent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Expiry as milliseconds since the Unix epoch
    #[serde(rename = "expiry_date", default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<i64>,

    /// Space-separated granted scopes
    #[serde(default)]
    pub scope: String,

    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl TokenRecord {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expiry.and_then(DateTime::<Utc>::from_timestamp_millis)
    }

    /// Informational only; nothing refuses an expired token.
    pub fn is_expired(&self) -> bool {
        self.expires_at().is_some_and(|at| at <= Utc::now())
    }

    pub fn scopes(&self) -> impl Iterator<Item = &str> {
        self.scope.split_whitespace()
    }
}

/// Single-record key-value store for the OAuth token.
///
/// The presence of a record is what makes the server "authenticated".
pub trait TokenStore: Send + Sync {
    /// Returns `Ok(None)` when no token has been stored.
    fn read_token(&self) -> Result<Option<TokenRecord>, StorageError>;

    /// Overwrite the stored token.
    fn write_token(&self, record: &TokenRecord) -> Result<(), StorageError>;

    /// Remove the stored token. Succeeds when nothing is stored.
    fn clear_token(&self) -> Result<(), StorageError>;

    fn has_token(&self) -> bool {
        matches!(self.read_token(), Ok(Some(_)))
    }
}

/// Token store backed by one JSON file.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn read_token(&self) -> Result<Option<TokenRecord>, StorageError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StorageError::ReadFailed(format!(
                    "{}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        let record: TokenRecord = serde_json::from_str(&json)
            .map_err(|e| StorageError::Corrupt(format!("{}: {}", self.path.display(), e)))?;

        tracing::debug!("Read token from {:?}", self.path);
        Ok(Some(record))
    }

    fn write_token(&self, record: &TokenRecord) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| StorageError::WriteFailed(format!("{}: {}", parent.display(), e)))?;
        }

        let json = serde_json::to_string_pretty(record)
            .map_err(|e| StorageError::WriteFailed(e.to_string()))?;

        fs::write(&self.path, json)
            .map_err(|e| StorageError::WriteFailed(format!("{}: {}", self.path.display(), e)))?;

        tracing::info!("Token stored to {:?}", self.path);
        Ok(())
    }

    fn clear_token(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::info!("Deleted token at {:?}", self.path);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::DeleteFailed(format!(
                "{}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}
