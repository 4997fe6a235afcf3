//! Invite production error types.

/// Unified error type for invite serialization and delivery.
#[derive(Debug, thiserror::Error)]
pub enum InviteError {
    /// TCP connection to the mail server failed.
    #[error("connection to {addr} failed: {reason}")]
    Connect { addr: String, reason: String },

    /// A network operation exceeded its deadline.
    #[error("{operation} timed out after {seconds}s")]
    Timeout {
        operation: &'static str,
        seconds: u64,
    },

    /// TLS setup or handshake failed.
    #[error("tls setup failed: {reason}")]
    Tls { reason: String },

    /// The server replied with an unexpected status code.
    #[error("smtp {command} failed: expected {expected}, got {code} ({detail})")]
    UnexpectedReply {
        command: &'static str,
        expected: u16,
        code: u16,
        detail: String,
    },

    /// A reply line did not follow the `NNN[- ]text` format.
    #[error("malformed smtp reply: {line}")]
    MalformedReply { line: String },

    /// The server closed the connection mid-dialogue.
    #[error("connection closed by server")]
    ConnectionClosed,

    /// Writing the `.ics` artifact to disk failed.
    #[error("failed to write invite artifact {path}: {reason}")]
    Artifact { path: String, reason: String },

    /// Socket I/O failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the invite crate.
pub type Result<T> = std::result::Result<T, InviteError>;
