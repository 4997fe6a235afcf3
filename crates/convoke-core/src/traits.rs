//! Collaborator traits consumed by the dialogue manager.
//!
//! Extraction and delivery are delegated behind object-safe traits so the
//! state machine can be exercised with deterministic stubs, independent of
//! any inference backend or mail transport.

use async_trait::async_trait;
use chrono::{DateTime, Local};

use crate::details::{ExtractedDetails, Invite};
use crate::error::Result;

/// Best-effort detail extraction from free text, plus the targeted parsers
/// the dialogue uses when a single slot is being solicited.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Extract any subset of invite details from the input.
    ///
    /// An absent field is a normal outcome; `Err` is reserved for transport
    /// or model failures.
    async fn extract(&self, text: &str) -> Result<ExtractedDetails>;

    /// Locate the first email-pattern substring in the input, if any.
    fn find_email(&self, text: &str) -> Option<String>;

    /// Parse the input as a date/time expression, preferring future
    /// interpretations when ambiguous.
    fn parse_datetime(&self, text: &str) -> Option<DateTime<Local>>;
}

/// Serializes a complete invite and dispatches it to the recipient.
#[async_trait]
pub trait InviteProducer: Send + Sync {
    /// Create the calendar invite and send it by email.
    ///
    /// Implementations must report failure through the returned error
    /// rather than panicking, so the manager can keep the collected slots.
    async fn create_and_send(&self, invite: &Invite) -> Result<()>;
}
