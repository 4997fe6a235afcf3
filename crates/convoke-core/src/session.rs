//! Per-session conversation context.

use serde::{Deserialize, Serialize};

use crate::details::InviteDetails;
use crate::history::Transcript;
use crate::state::DialogueState;

/// Everything the dialogue manager needs for one session: the transcript,
/// the in-progress slot record, and the current state.
///
/// The context is an explicit value passed into every turn rather than
/// process-wide state, so concurrent sessions stay isolated by construction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionContext {
    pub transcript: Transcript,
    pub details: InviteDetails,
    pub state: DialogueState,
}

impl SessionContext {
    /// Create a fresh session: empty transcript, empty slot record,
    /// [`DialogueState::AwaitingPrompt`].
    pub fn new() -> Self {
        Self::default()
    }
}
