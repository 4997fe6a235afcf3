//! The invite slot record and its merge / completeness algebra.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Slots
// ---------------------------------------------------------------------------

/// One of the four required invite fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    /// The recipient email address.
    Email,
    /// The event title.
    Title,
    /// The event description.
    Description,
    /// The timezone-aware event start time.
    StartTime,
}

/// The fixed priority order in which missing slots are solicited.
///
/// The completeness pass always asks for the first absent slot in this
/// order; keeping it as an explicit constant (rather than an if/else chain)
/// keeps the contract testable.
pub const SOLICITATION_ORDER: [Slot; 4] =
    [Slot::Email, Slot::Title, Slot::Description, Slot::StartTime];

// ---------------------------------------------------------------------------
// Partial extraction results
// ---------------------------------------------------------------------------

/// Best-effort extraction results for a single piece of input text.
///
/// Any subset of fields may be present; all-absent is a valid result, not
/// an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractedDetails {
    pub title: Option<String>,
    pub description: Option<String>,
    pub to_email: Option<String>,
    pub start_time: Option<DateTime<Local>>,
}

impl ExtractedDetails {
    /// True iff no field was found.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.to_email.is_none()
            && self.start_time.is_none()
    }
}

// ---------------------------------------------------------------------------
// The slot record
// ---------------------------------------------------------------------------

/// The in-progress invite record.
///
/// Created empty at session start, mutated field-by-field by the dialogue
/// manager, and reset to empty immediately after a successful send.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InviteDetails {
    pub title: Option<String>,
    pub description: Option<String>,
    pub to_email: Option<String>,
    pub start_time: Option<DateTime<Local>>,
}

impl InviteDetails {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a partial update: every non-null field in `partial` overwrites
    /// the stored value (last-write-wins, no further validation).
    pub fn merge(&mut self, partial: ExtractedDetails) {
        if let Some(title) = partial.title {
            self.title = Some(title);
        }
        if let Some(description) = partial.description {
            self.description = Some(description);
        }
        if let Some(email) = partial.to_email {
            self.to_email = Some(email);
        }
        if let Some(start) = partial.start_time {
            self.start_time = Some(start);
        }
    }

    /// True iff all four fields are present.
    pub fn is_complete(&self) -> bool {
        self.first_missing().is_none()
    }

    /// Clear all four fields.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether the given slot currently holds a value.
    pub fn has(&self, slot: Slot) -> bool {
        match slot {
            Slot::Email => self.to_email.is_some(),
            Slot::Title => self.title.is_some(),
            Slot::Description => self.description.is_some(),
            Slot::StartTime => self.start_time.is_some(),
        }
    }

    /// The first absent slot in [`SOLICITATION_ORDER`], if any.
    pub fn first_missing(&self) -> Option<Slot> {
        SOLICITATION_ORDER.into_iter().find(|&slot| !self.has(slot))
    }

    /// Build the complete outbound invite, or `None` while any slot is
    /// still absent.
    pub fn to_invite(&self, organizer: &str) -> Option<Invite> {
        Some(Invite {
            title: self.title.clone()?,
            description: self.description.clone()?,
            to_email: self.to_email.clone()?,
            organizer: organizer.to_string(),
            start_time: self.start_time?,
        })
    }
}

// ---------------------------------------------------------------------------
// The complete outbound record
// ---------------------------------------------------------------------------

/// A complete invite ready for serialization and delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invite {
    pub title: String,
    pub description: String,
    pub to_email: String,
    pub organizer: String,
    pub start_time: DateTime<Local>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn some_instant() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 10, 5, 14, 0, 0).unwrap()
    }

    #[test]
    fn new_record_is_empty_and_incomplete() {
        let details = InviteDetails::new();
        assert!(!details.is_complete());
        assert_eq!(details.first_missing(), Some(Slot::Email));
    }

    #[test]
    fn merge_only_overwrites_present_fields() {
        let mut details = InviteDetails::new();
        details.title = Some("Sync".into());

        details.merge(ExtractedDetails {
            description: Some("Weekly sync".into()),
            ..Default::default()
        });

        assert_eq!(details.title.as_deref(), Some("Sync"));
        assert_eq!(details.description.as_deref(), Some("Weekly sync"));
        assert!(details.to_email.is_none());
    }

    #[test]
    fn merge_is_last_write_wins() {
        let mut details = InviteDetails::new();
        details.merge(ExtractedDetails {
            title: Some("first".into()),
            ..Default::default()
        });
        details.merge(ExtractedDetails {
            title: Some("second".into()),
            ..Default::default()
        });
        assert_eq!(details.title.as_deref(), Some("second"));
    }

    #[test]
    fn complete_iff_every_field_set_since_reset() {
        let mut details = InviteDetails::new();
        details.merge(ExtractedDetails {
            title: Some("Sync".into()),
            description: Some("Weekly sync".into()),
            to_email: Some("a@b.com".into()),
            start_time: None,
        });
        assert!(!details.is_complete());

        details.merge(ExtractedDetails {
            start_time: Some(some_instant()),
            ..Default::default()
        });
        assert!(details.is_complete());

        details.reset();
        assert!(!details.is_complete());
        assert!(details.title.is_none());
        assert!(details.description.is_none());
        assert!(details.to_email.is_none());
        assert!(details.start_time.is_none());
    }

    #[test]
    fn first_missing_follows_solicitation_order() {
        let mut details = InviteDetails::new();
        // Title and start time present, email and description absent: email
        // comes first in the fixed order.
        details.title = Some("Sync".into());
        details.start_time = Some(some_instant());
        assert_eq!(details.first_missing(), Some(Slot::Email));

        details.to_email = Some("a@b.com".into());
        assert_eq!(details.first_missing(), Some(Slot::Description));
    }

    #[test]
    fn to_invite_requires_every_slot() {
        let mut details = InviteDetails::new();
        details.title = Some("Sync".into());
        details.description = Some("Weekly sync".into());
        details.to_email = Some("a@b.com".into());
        assert!(details.to_invite("me@example.com").is_none());

        details.start_time = Some(some_instant());
        let invite = details.to_invite("me@example.com").unwrap();
        assert_eq!(invite.title, "Sync");
        assert_eq!(invite.description, "Weekly sync");
        assert_eq!(invite.to_email, "a@b.com");
        assert_eq!(invite.organizer, "me@example.com");
        assert_eq!(invite.start_time, some_instant());
    }

    #[test]
    fn extracted_details_is_empty() {
        assert!(ExtractedDetails::default().is_empty());
        let found = ExtractedDetails {
            to_email: Some("a@b.com".into()),
            ..Default::default()
        };
        assert!(!found.is_empty());
    }
}
