//! Convoke dialogue core.
//!
//! This crate holds the session-scoped conversation model and the dialogue
//! state machine that drives invite collection:
//!
//! - **[`details`]** -- the four-slot invite record and its merge /
//!   completeness / reset algebra, plus the fixed solicitation order.
//! - **[`state`]** -- the dialogue state enum (one `Awaiting*` state per
//!   solicitable slot, plus the open prompt state).
//! - **[`history`]** -- the append-only conversation transcript, used only
//!   for display.
//! - **[`session`]** -- the per-session context object bundling transcript,
//!   slot record, and state.
//! - **[`traits`]** -- the [`Extractor`] and [`InviteProducer`] collaborator
//!   traits consumed by the state machine.
//! - **[`dialogue`]** -- the [`DialogueManager`] itself: one full evaluation
//!   per user turn.
//!
//! The state machine is deterministic and collaborator-agnostic; anything
//! model- or transport-backed sits behind the traits so the core is testable
//! with stubs.

pub mod details;
pub mod dialogue;
pub mod error;
pub mod history;
pub mod session;
pub mod state;
pub mod traits;

pub use details::{ExtractedDetails, Invite, InviteDetails, SOLICITATION_ORDER, Slot};
pub use dialogue::DialogueManager;
pub use error::{DialogueError, Result};
pub use history::{ChatMessage, Speaker, Transcript};
pub use session::SessionContext;
pub use state::DialogueState;
pub use traits::{Extractor, InviteProducer};
