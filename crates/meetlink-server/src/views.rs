//! Minimal HTML pages.

use meetlink_calendar::CreatedEvent;

/// Escapes text for use in HTML content and attribute values.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>{}</title></head><body>\n{}\n</body></html>",
        html_escape(title),
        body
    )
}

pub fn sign_in_page(auth_url: &str) -> String {
    page(
        "Google Meet Demo",
        &format!(
            "<h1>Google Meet Demo</h1>\n<p><a href=\"{}\">Sign in with Google</a></p>",
            html_escape(auth_url)
        ),
    )
}

pub fn event_form_page() -> String {
    page(
        "Create a meeting",
        "<h1>Create a meeting</h1>\n\
         <form method=\"post\" action=\"/create-event\">\n\
         <p><label>Attendees (comma-separated): <input type=\"text\" name=\"emails\" size=\"60\"></label></p>\n\
         <p><label>Title: <input type=\"text\" name=\"summary\"></label></p>\n\
         <p><label>Description: <input type=\"text\" name=\"description\"></label></p>\n\
         <p><button type=\"submit\">Create event with Meet link</button></p>\n\
         </form>\n\
         <p><a href=\"/logout\">Sign out</a></p>",
    )
}

pub fn event_created_page(event: &CreatedEvent) -> String {
    let link = html_escape(event.meeting_link_or_sentinel());
    let meet = if event.meeting_link.is_some() {
        format!("<a href=\"{}\" target=\"_blank\">{}</a>", link, link)
    } else {
        link
    };
    let calendar = event
        .html_link
        .as_deref()
        .map(|url| {
            format!(
                "\n<p><a href=\"{}\" target=\"_blank\">Open in Calendar</a></p>",
                html_escape(url)
            )
        })
        .unwrap_or_default();

    page(
        "Event Created",
        &format!(
            "<h2>Event Created Successfully</h2>\n\
             <p><strong>Title:</strong> {}</p>\n\
             <p><strong>Start:</strong> {}</p>\n\
             <p><strong>Meet Link:</strong> {}</p>{}\n\
             <p><a href=\"/\">Create another</a> | <a href=\"/logout\">Sign out</a></p>",
            html_escape(&event.summary),
            html_escape(&event.start_time),
            meet,
            calendar
        ),
    )
}

pub fn auth_success_page() -> String {
    page(
        "Signed in",
        "<h3>Authentication successful! Return to the <a href=\"/\">home page</a>.</h3>",
    )
}

pub fn logged_out_page() -> String {
    page(
        "Signed out",
        "<h3>You have been signed out.</h3>\n<p><a href=\"/\">Back to the home page</a></p>",
    )
}

pub fn error_page(message: &str, offer_sign_in: bool) -> String {
    let action = if offer_sign_in {
        "<a href=\"/logout\">Sign out and try again</a>"
    } else {
        "<a href=\"/\">Back to the home page</a>"
    };
    page(
        "Error",
        &format!("<h3>{}</h3>\n<p>{}</p>", html_escape(message), action),
    )
}
