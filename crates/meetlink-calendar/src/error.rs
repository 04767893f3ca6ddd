//! Calendar-specific error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Access token rejected")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid event data: {0}")]
    InvalidRequest(String),

    #[error("Calendar not found: {0}")]
    CalendarNotFound(String),

    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    #[error("Invalid calendar URL: {0}")]
    InvalidUrl(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl GatewayError {
    /// User-friendly error message for the result page.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Unauthorized => "Your session has expired. Sign out and sign in again.",
            Self::Forbidden(_) => {
                "The calendar refused the request. Check permissions or quota."
            }
            Self::InvalidRequest(_) => "The calendar rejected the event details.",
            Self::CalendarNotFound(_) => "Calendar not found.",
            Self::RateLimited(_) => "Too many requests. Please wait and try again.",
            Self::InvalidUrl(_) => "The calendar endpoint is misconfigured.",
            Self::Api(_) => "Error creating event. Check the server log for details.",
            Self::Network(_) => "Unable to reach the calendar service. Check your connection.",
        }
    }

    /// Whether signing in again is the likely fix.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}
