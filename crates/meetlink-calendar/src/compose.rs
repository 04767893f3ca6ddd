//! Builds an `EventRequest` from form input.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use serde::Deserialize;

use crate::types::EventRequest;

pub const DEFAULT_SUMMARY: &str = "Team Sync via Google Meet";
pub const DEFAULT_DESCRIPTION: &str = "Created automatically using the Google Calendar API!";

/// Minutes between "now" and the start of a composed event
pub const START_OFFSET_MINUTES: i64 = 5;

/// Length of a composed event in minutes
pub const DURATION_MINUTES: i64 = 30;

/// Raw input for one creation request (the `/create-event` form).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventInput {
    /// Comma-separated attendee addresses
    #[serde(default)]
    pub emails: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EventDefaults {
    pub summary: String,
    pub description: String,
    pub time_zone: Tz,
    pub start_offset: Duration,
    pub duration: Duration,
}

impl EventDefaults {
    pub fn new(time_zone: Tz) -> Self {
        Self {
            summary: DEFAULT_SUMMARY.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            time_zone,
            start_offset: Duration::minutes(START_OFFSET_MINUTES),
            duration: Duration::minutes(DURATION_MINUTES),
        }
    }
}

/// Compose an event starting shortly after the current time.
pub fn compose(input: &EventInput, defaults: &EventDefaults) -> EventRequest {
    compose_at(input, defaults, Utc::now())
}

/// Compose an event relative to `now`.
///
/// Never fails: malformed attendee entries are dropped and blank overrides
/// fall back to the defaults.
pub fn compose_at(input: &EventInput, defaults: &EventDefaults, now: DateTime<Utc>) -> EventRequest {
    let start_time = now + defaults.start_offset;
    let end_time = start_time + defaults.duration;

    EventRequest {
        summary: non_blank(input.summary.as_deref())
            .unwrap_or(defaults.summary.as_str())
            .to_string(),
        description: non_blank(input.description.as_deref())
            .unwrap_or(defaults.description.as_str())
            .to_string(),
        start_time,
        end_time,
        time_zone: defaults.time_zone,
        attendee_emails: parse_attendees(&input.emails),
        conferencing_requested: true,
        request_id: format!("meet-{}", uuid::Uuid::new_v4()),
    }
}

/// Split on commas, trim, and keep only entries containing `@`, in order.
pub fn parse_attendees(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| entry.contains('@'))
        .map(str::to_string)
        .collect()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
