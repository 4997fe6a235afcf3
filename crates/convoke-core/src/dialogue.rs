//! The dialogue manager -- one full state-machine evaluation per user turn.
//!
//! Each turn appends the user entry to the transcript, handles the input
//! according to the current state (full extraction in the open state,
//! targeted parsing while a slot is being solicited), then re-evaluates
//! completeness: either the invite is produced and the session resets, or
//! the first missing slot in the fixed priority order is solicited.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::details::Slot;
use crate::session::SessionContext;
use crate::state::DialogueState;
use crate::traits::{Extractor, InviteProducer};

// ---------------------------------------------------------------------------
// Fixed replies
// ---------------------------------------------------------------------------

/// Inputs treated as greetings while no slot is being solicited.
const GREETING_TOKENS: [&str; 4] = ["hi", "hello", "hey", "yo"];

const GREETING_REPLY: &str = "Hello! How can I help you create a calendar invite today?";

const ASK_EMAIL: &str = "I see you want to create an event. Who should I send the invite to? \
                         Please provide an email address.";
const ASK_TITLE: &str = "I have the email. What should be the title of the event?";
const ASK_DESCRIPTION: &str = "Great, I have the title. What should be the description for the event?";
const ASK_DATETIME: &str = "Got it. When should the event be scheduled? (e.g., tomorrow at 5pm, \
                            Oct 5th 14:00)";

const REPROMPT_EMAIL: &str = "That doesn't look like a valid email. Could you please provide a \
                              correct email address?";
const REPROMPT_DATETIME: &str = "I'm sorry, I didn't understand that date and time. Could you try \
                                 again? (e.g., 'tomorrow at 3pm' or 'Oct 5th at 10:00')";

const SENT_OK: &str = "Calendar invite sent successfully!";
const SENT_FAILED: &str = "There was an issue sending the calendar invite.";
const EXTRACTION_FAILED: &str = "I had trouble understanding that. Could you try rephrasing your \
                                 request?";

/// The solicitation message for a missing slot.
fn solicitation_for(slot: Slot) -> &'static str {
    match slot {
        Slot::Email => ASK_EMAIL,
        Slot::Title => ASK_TITLE,
        Slot::Description => ASK_DESCRIPTION,
        Slot::StartTime => ASK_DATETIME,
    }
}

fn is_greeting(input: &str) -> bool {
    let lower = input.to_lowercase();
    GREETING_TOKENS.contains(&lower.as_str())
}

// ---------------------------------------------------------------------------
// Manager
// ---------------------------------------------------------------------------

/// Drives the slot-filling conversation.
///
/// Holds the collaborators and the organizer address; all per-session state
/// lives in the [`SessionContext`] passed into each turn.
pub struct DialogueManager {
    extractor: Arc<dyn Extractor>,
    producer: Arc<dyn InviteProducer>,
    organizer: String,
}

impl DialogueManager {
    /// Create a manager over the given collaborators. `organizer` is the
    /// sender address stamped on every produced invite.
    pub fn new(
        extractor: Arc<dyn Extractor>,
        producer: Arc<dyn InviteProducer>,
        organizer: impl Into<String>,
    ) -> Self {
        Self {
            extractor,
            producer,
            organizer: organizer.into(),
        }
    }

    /// Process one user input: exactly one user entry and at most one
    /// assistant entry are appended to the transcript.
    ///
    /// Collaborator failures are contained here -- a failed extraction
    /// abandons the turn with a visible message, and a failed delivery
    /// keeps the collected slots so the user can retry by resending.
    pub async fn handle_turn(&self, session: &mut SessionContext, input: &str) {
        let input = input.trim();
        session.transcript.push_user(input);

        // Greetings short-circuit the whole turn: no mutation, no
        // completeness check.
        if session.state == DialogueState::AwaitingPrompt && is_greeting(input) {
            session.transcript.push_assistant(GREETING_REPLY);
            return;
        }

        // Per-state handling. A validation miss produces a re-prompt that
        // takes precedence over the generic solicitation below.
        let mut reprompt: Option<&'static str> = None;
        match session.state {
            DialogueState::AwaitingPrompt => match self.extractor.extract(input).await {
                Ok(found) => {
                    debug!(
                        title = found.title.is_some(),
                        description = found.description.is_some(),
                        email = found.to_email.is_some(),
                        start_time = found.start_time.is_some(),
                        "extraction finished"
                    );
                    session.details.merge(found);
                }
                Err(e) => {
                    warn!(error = %e, "extraction failed, abandoning turn");
                    session.transcript.push_assistant(EXTRACTION_FAILED);
                    return;
                }
            },
            DialogueState::AwaitingEmail => match self.extractor.find_email(input) {
                Some(address) => {
                    session.details.to_email = Some(address);
                    session.state = DialogueState::AwaitingPrompt;
                }
                None => reprompt = Some(REPROMPT_EMAIL),
            },
            DialogueState::AwaitingTitle => {
                session.details.title = Some(input.to_string());
                session.state = DialogueState::AwaitingPrompt;
            }
            DialogueState::AwaitingDescription => {
                session.details.description = Some(input.to_string());
                session.state = DialogueState::AwaitingPrompt;
            }
            DialogueState::AwaitingDatetime => match self.extractor.parse_datetime(input) {
                Some(start) => {
                    session.details.start_time = Some(start);
                    session.state = DialogueState::AwaitingPrompt;
                }
                None => reprompt = Some(REPROMPT_DATETIME),
            },
        }

        self.finish_turn(session, reprompt).await;
    }

    /// The completeness pass: send the invite if every slot is filled,
    /// otherwise solicit the first missing slot in priority order.
    async fn finish_turn(&self, session: &mut SessionContext, reprompt: Option<&'static str>) {
        if let Some(invite) = session.details.to_invite(&self.organizer) {
            info!(title = %invite.title, to = %invite.to_email, "all details collected, sending invite");
            match self.producer.create_and_send(&invite).await {
                Ok(()) => {
                    session.transcript.push_assistant(SENT_OK);
                    session.details.reset();
                    session.state = DialogueState::AwaitingPrompt;
                }
                Err(e) => {
                    // Slots and state stay exactly as they were; retry is
                    // the user's next message.
                    warn!(error = %e, "invite delivery failed");
                    session.transcript.push_assistant(SENT_FAILED);
                }
            }
            return;
        }

        let Some(slot) = session.details.first_missing() else {
            return;
        };
        session
            .transcript
            .push_assistant(reprompt.unwrap_or_else(|| solicitation_for(slot)));
        session.state = DialogueState::soliciting(slot);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
