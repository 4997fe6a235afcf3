//! Dialogue core error types.
//!
//! Collaborator failures surface through [`DialogueError`] so the state
//! machine can distinguish a failed extraction (turn is abandoned) from a
//! failed delivery (collected slots are preserved for a manual retry).

/// Unified error type for the dialogue core and its collaborators.
#[derive(Debug, thiserror::Error)]
pub enum DialogueError {
    /// The extractor could not process the input at all.
    ///
    /// A field that is merely absent from the results is not an error --
    /// this variant covers transport and model failures.
    #[error("extraction failed: {reason}")]
    Extraction { reason: String },

    /// Invite creation or mail submission failed.
    ///
    /// Producers report this instead of panicking so the manager can keep
    /// the collected slots and let the user retry.
    #[error("invite delivery failed: {reason}")]
    Delivery { reason: String },
}

/// Convenience alias used throughout the core crate.
pub type Result<T> = std::result::Result<T, DialogueError>;
