//! Request-level error type for the front controller.

use thiserror::Error;
use warp::http::StatusCode;

use meetlink_calendar::GatewayError;
use meetlink_core::{AuthError, StorageError};

/// Anything a handler can fail with after startup.
///
/// `Display` carries the detail for the log; `user_message()` is what the
/// browser sees.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Calendar error: {0}")]
    Gateway(#[from] GatewayError),
}

impl AppError {
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Storage(e) => e.user_message(),
            AppError::Auth(e) => e.user_message(),
            AppError::Gateway(e) => e.user_message(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Auth(e) if e.is_upstream() => StatusCode::BAD_GATEWAY,
            AppError::Auth(_) => StatusCode::BAD_REQUEST,
            AppError::Gateway(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Whether the error page should offer to sign in again.
    pub fn suggests_sign_in(&self) -> bool {
        match self {
            AppError::Storage(StorageError::Corrupt(_)) => true,
            AppError::Storage(_) => false,
            AppError::Auth(_) => true,
            AppError::Gateway(e) => e.is_auth_failure(),
        }
    }
}
