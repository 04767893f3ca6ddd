//! Google Calendar API client for event creation.

use std::time::Duration;
use tracing::instrument;
use url::Url;

use meetlink_auth::AuthorizedClient;

use crate::error::GatewayError;
use crate::types::*;

pub const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct CalendarGateway {
    base_url: String,
}

impl Default for CalendarGateway {
    fn default() -> Self {
        Self::new(CALENDAR_API_BASE)
    }
}

impl CalendarGateway {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create an event with a generated conference link.
    ///
    /// `conferenceDataVersion=1` makes the service create the conference
    /// along with the event. Attendees, when present, are emailed an
    /// invitation.
    ///
    /// # Errors
    /// A `GatewayError` for any non-success answer or transport failure.
    /// Nothing is retried.
    #[instrument(skip(self, client, request), fields(attendees = request.attendee_emails.len()), level = "info")]
    pub async fn create_event(
        &self,
        client: &AuthorizedClient,
        calendar_id: &str,
        request: &EventRequest,
    ) -> Result<CreatedEvent, GatewayError> {
        let mut url = Url::parse(&format!(
            "{}/calendars/{}/events",
            self.base_url,
            urlencoding::encode(calendar_id),
        ))
        .map_err(|e| GatewayError::InvalidUrl(e.to_string()))?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("conferenceDataVersion", "1");
            if !request.attendee_emails.is_empty() {
                query.append_pair("sendUpdates", "all");
            }
        }

        let response = client
            .post(url)
            .timeout(REQUEST_TIMEOUT)
            .json(&request.to_api_body())
            .send()
            .await?;

        let api_event: ApiEvent = self.handle_response(response).await?;
        let event = CreatedEvent::from_api(api_event);

        tracing::info!(
            summary = %event.summary,
            start = %event.start_time,
            meeting_link = event.meeting_link_or_sentinel(),
            "Event created"
        );
        if event.meeting_link.is_none() {
            tracing::warn!(
                status = ?event.conference_status,
                "Conference not ready in the create response"
            );
        }

        Ok(event)
    }

    /// Helper to handle API responses and errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, GatewayError> {
        let status = response.status();

        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| GatewayError::Api(format!("JSON parse error: {}", e)));
        }

        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok())
            .unwrap_or(60);
        let text = response.text().await.unwrap_or_default();
        let detail = error_detail(&text);

        match status.as_u16() {
            400 => Err(GatewayError::InvalidRequest(detail)),
            401 => Err(GatewayError::Unauthorized),
            403 => Err(GatewayError::Forbidden(detail)),
            404 => Err(GatewayError::CalendarNotFound(detail)),
            429 => Err(GatewayError::RateLimited(retry_after)),
            _ => Err(GatewayError::Api(format!("{}: {}", status, detail))),
        }
    }
}

/// Find the video entry point of a created event.
///
/// `None` when the conference has not been generated yet (creation can
/// complete asynchronously) or the event carries no conference at all.
pub fn extract_meeting_link(event: &ApiEvent) -> Option<String> {
    event
        .conference_data
        .as_ref()?
        .entry_points
        .iter()
        .find(|entry| entry.entry_point_type == "video")
        .map(|entry| entry.uri.clone())
}

/// Pull "reason: message" out of a Google error envelope, falling back to the raw body.
fn error_detail(body: &str) -> String {
    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(envelope) => match envelope.error.errors.first() {
            Some(detail) if !detail.reason.is_empty() => {
                format!("{}: {}", detail.reason, envelope.error.message)
            }
            _ => envelope.error.message,
        },
        Err(_) => body.to_string(),
    }
}
