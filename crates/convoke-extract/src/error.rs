//! Extraction error types.

/// Unified error type for the extraction crate.
///
/// An absent field never surfaces here -- these variants cover transport
/// and endpoint failures only.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The HTTP request to the QA endpoint failed.
    #[error("qa request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The QA endpoint answered with a non-success status.
    #[error("qa endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The QA endpoint returned a body we could not interpret.
    #[error("unexpected qa response: {reason}")]
    MalformedResponse { reason: String },
}

/// Convenience alias used throughout the extraction crate.
pub type Result<T> = std::result::Result<T, ExtractError>;
