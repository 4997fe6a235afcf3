//! iCalendar (RFC 5545) serialization.
//!
//! Produces a single-event VCALENDAR with `METHOD:REQUEST` so receiving
//! mail clients treat the attachment as an invitation to accept or decline.

use chrono::{DateTime, Duration, Utc};

/// Product identifier stamped on every generated calendar.
pub const PRODID: &str = "-//Convoke//Invite//EN";

/// Default event duration when only a start time is known.
pub const DEFAULT_DURATION_HOURS: i64 = 1;

/// Format a datetime as an iCalendar UTC timestamp (`20261005T140000Z`).
pub fn format_ics_datetime(dt: DateTime<Utc>) -> String {
    dt.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Escape an iCalendar TEXT value: backslash, semicolon, comma, newline.
pub fn escape_text(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            ';' => escaped.push_str("\\;"),
            ',' => escaped.push_str("\\,"),
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            other => escaped.push(other),
        }
    }
    escaped
}

/// Generate a request-style invitation for a single event.
///
/// The event runs for [`DEFAULT_DURATION_HOURS`] from `start`. `stamp` is
/// the DTSTAMP creation instant, passed in so output stays reproducible.
pub fn generate_invite(
    uid: &str,
    stamp: DateTime<Utc>,
    title: &str,
    description: &str,
    organizer: &str,
    attendee: &str,
    start: DateTime<Utc>,
) -> String {
    let end = start + Duration::hours(DEFAULT_DURATION_HOURS);

    let mut ical = String::with_capacity(512);
    ical.push_str("BEGIN:VCALENDAR\r\n");
    ical.push_str("VERSION:2.0\r\n");
    ical.push_str(&format!("PRODID:{PRODID}\r\n"));
    ical.push_str("METHOD:REQUEST\r\n");
    ical.push_str("BEGIN:VEVENT\r\n");
    ical.push_str(&format!("UID:{uid}\r\n"));
    ical.push_str(&format!("DTSTAMP:{}\r\n", format_ics_datetime(stamp)));
    ical.push_str(&format!("DTSTART:{}\r\n", format_ics_datetime(start)));
    ical.push_str(&format!("DTEND:{}\r\n", format_ics_datetime(end)));
    ical.push_str(&format!("SUMMARY:{}\r\n", escape_text(title)));
    ical.push_str(&format!("DESCRIPTION:{}\r\n", escape_text(description)));
    ical.push_str(&format!("ORGANIZER:mailto:{organizer}\r\n"));
    ical.push_str(&format!(
        "ATTENDEE;ROLE=REQ-PARTICIPANT;PARTSTAT=NEEDS-ACTION;RSVP=TRUE:mailto:{attendee}\r\n"
    ));
    ical.push_str("STATUS:CONFIRMED\r\n");
    ical.push_str("END:VEVENT\r\n");
    ical.push_str("END:VCALENDAR\r\n");
    ical
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
