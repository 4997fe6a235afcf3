//! Detail extraction for Convoke.
//!
//! Implements the [`convoke_core::Extractor`] collaborator:
//!
//! - **[`qa`]** -- HTTP client for an extractive question-answering model
//!   (Hugging Face inference endpoint), used to pull the event title and
//!   description out of free text.
//! - **[`email`]** -- email address pattern matching.
//! - **[`timeparse`]** -- rule-based natural-language date/time parsing,
//!   preferring future interpretations.
//! - **[`extractor`]** -- [`DetailExtractor`], the composite extractor that
//!   the dialogue manager consumes. Works without a QA endpoint in a
//!   degraded pattern-only mode.

pub mod email;
pub mod error;
pub mod extractor;
pub mod qa;
pub mod timeparse;

pub use error::{ExtractError, Result};
pub use extractor::DetailExtractor;
pub use qa::{QaAnswer, QaClient, QaClientConfig};
