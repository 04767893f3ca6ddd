//! Google Calendar event creation with generated Meet links.
//!
//! `compose` turns form input into an `EventRequest`; `CalendarGateway`
//! sends it and projects the response into a `CreatedEvent`.

pub mod client;
pub mod compose;
pub mod error;
pub mod types;

pub use client::{extract_meeting_link, CalendarGateway};
pub use compose::{compose, compose_at, parse_attendees, EventDefaults, EventInput};
pub use error::GatewayError;
pub use types::{CreatedEvent, EventRequest, NO_MEETING_LINK};
