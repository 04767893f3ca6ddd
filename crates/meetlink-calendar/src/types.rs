//! Calendar API types and data structures.

use chrono::{DateTime, SecondsFormat, Utc};
use chrono_tz::Tz;
use serde::Deserialize;

/// Text shown in place of a meeting link when the response carried none.
pub const NO_MEETING_LINK: &str = "No Meet link found";

/// Conference solution requested for new events.
pub const CONFERENCE_SOLUTION: &str = "hangoutsMeet";

/// Event to be created, as composed from user input.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRequest {
    pub summary: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub time_zone: Tz,
    pub attendee_emails: Vec<String>,
    pub conferencing_requested: bool,
    /// Idempotency key for the conference create request
    pub request_id: String,
}

impl EventRequest {
    /// JSON body for `events.insert`.
    pub fn to_api_body(&self) -> serde_json::Value {
        let mut body = serde_json::json!({
            "summary": self.summary,
            "description": self.description,
            "start": {
                "dateTime": self.start_time.to_rfc3339_opts(SecondsFormat::Millis, true),
                "timeZone": self.time_zone.name(),
            },
            "end": {
                "dateTime": self.end_time.to_rfc3339_opts(SecondsFormat::Millis, true),
                "timeZone": self.time_zone.name(),
            },
        });

        if !self.attendee_emails.is_empty() {
            body["attendees"] = self
                .attendee_emails
                .iter()
                .map(|email| serde_json::json!({ "email": email }))
                .collect();
        }

        if self.conferencing_requested {
            body["conferenceData"] = serde_json::json!({
                "createRequest": {
                    "requestId": self.request_id,
                    "conferenceSolutionKey": { "type": CONFERENCE_SOLUTION },
                }
            });
        }

        body
    }
}

/// What the result page needs from a created event.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedEvent {
    pub id: String,
    pub summary: String,
    pub start_time: String,
    pub meeting_link: Option<String>,
    pub html_link: Option<String>,
    /// `pending`, `success` or `failure` as reported by the conference create request
    pub conference_status: Option<String>,
}

impl CreatedEvent {
    pub fn from_api(api: ApiEvent) -> Self {
        let meeting_link = crate::client::extract_meeting_link(&api);
        let conference_status = api
            .conference_data
            .as_ref()
            .and_then(|c| c.create_request.as_ref())
            .and_then(|r| r.status.as_ref())
            .map(|s| s.status_code.clone());
        let start_time = api
            .start
            .and_then(|t| t.date_time.or(t.date))
            .unwrap_or_default();

        Self {
            id: api.id,
            summary: api.summary.unwrap_or_default(),
            start_time,
            meeting_link,
            html_link: api.html_link,
            conference_status,
        }
    }

    pub fn meeting_link_or_sentinel(&self) -> &str {
        self.meeting_link.as_deref().unwrap_or(NO_MEETING_LINK)
    }
}

// API Response Types

/// Google Calendar API event response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEvent {
    pub id: String,
    pub summary: Option<String>,
    pub start: Option<ApiEventTime>,
    pub end: Option<ApiEventTime>,
    pub html_link: Option<String>,
    pub conference_data: Option<ApiConferenceData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEventTime {
    pub date_time: Option<String>,
    pub date: Option<String>,
    pub time_zone: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiConferenceData {
    #[serde(default)]
    pub entry_points: Vec<ApiEntryPoint>,
    pub create_request: Option<ApiCreateRequest>,
}

/// One way to join a meeting (video, phone, more...).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEntryPoint {
    pub entry_point_type: String,
    pub uri: String,
    pub label: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApiCreateRequest {
    pub status: Option<ApiCreateStatus>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCreateStatus {
    pub status_code: String,
}

/// Error envelope returned by Google APIs.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub errors: Vec<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub reason: String,
}
