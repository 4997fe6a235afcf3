//! Dialogue state tracking.

use serde::{Deserialize, Serialize};

use crate::details::Slot;

/// Which input the dialogue expects next.
///
/// Invariant: the state is `Awaiting<X>` only while slot X is absent and
/// every slot before X in [`crate::SOLICITATION_ORDER`] is present. There is
/// no terminal state; a successful send returns to [`AwaitingPrompt`].
///
/// [`AwaitingPrompt`]: DialogueState::AwaitingPrompt
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogueState {
    /// Open input: greetings and free-text extraction are handled here.
    #[default]
    AwaitingPrompt,
    /// The recipient email was solicited.
    AwaitingEmail,
    /// The event title was solicited.
    AwaitingTitle,
    /// The event description was solicited.
    AwaitingDescription,
    /// The event start time was solicited.
    AwaitingDatetime,
}

impl DialogueState {
    /// The state that solicits the given slot.
    pub fn soliciting(slot: Slot) -> Self {
        match slot {
            Slot::Email => Self::AwaitingEmail,
            Slot::Title => Self::AwaitingTitle,
            Slot::Description => Self::AwaitingDescription,
            Slot::StartTime => Self::AwaitingDatetime,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_is_awaiting_prompt() {
        assert_eq!(DialogueState::default(), DialogueState::AwaitingPrompt);
    }

    #[test]
    fn soliciting_maps_each_slot() {
        assert_eq!(
            DialogueState::soliciting(Slot::Email),
            DialogueState::AwaitingEmail
        );
        assert_eq!(
            DialogueState::soliciting(Slot::Title),
            DialogueState::AwaitingTitle
        );
        assert_eq!(
            DialogueState::soliciting(Slot::Description),
            DialogueState::AwaitingDescription
        );
        assert_eq!(
            DialogueState::soliciting(Slot::StartTime),
            DialogueState::AwaitingDatetime
        );
    }
}
