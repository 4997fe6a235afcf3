//! The composite detail extractor.
//!
//! Two tiers: the QA model pulls the title and description out of a prompt,
//! while local pattern matching handles the email address and the start
//! time. The QA tier is optional -- without an API token the extractor
//! still resolves the pattern-matched slots and the dialogue solicits the
//! rest.

use async_trait::async_trait;
use chrono::{DateTime, Local};
use tracing::debug;

use convoke_core::{DialogueError, ExtractedDetails, Extractor};

use crate::email;
use crate::qa::QaClient;
use crate::timeparse;

/// Question posed to the QA model for the event title.
pub const TITLE_QUESTION: &str = "What is the title of the event?";

/// Question posed to the QA model for the event description.
pub const DESCRIPTION_QUESTION: &str = "What is the description of the event?";

/// Best-effort extractor over a QA model plus local pattern matching.
pub struct DetailExtractor {
    /// QA tier for title/description. `None` runs pattern-only extraction.
    qa: Option<QaClient>,
}

impl DetailExtractor {
    /// Create a pattern-only extractor (no QA tier).
    pub fn new() -> Self {
        Self { qa: None }
    }

    /// Create an extractor with a QA tier for title/description.
    pub fn with_qa(qa: QaClient) -> Self {
        Self { qa: Some(qa) }
    }

    /// Whether the QA tier is available.
    pub fn has_qa(&self) -> bool {
        self.qa.is_some()
    }
}

impl Default for DetailExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Short prompts often answer the description question but not the title
/// question; reuse the description as the title in that case.
fn apply_title_fallback(found: &mut ExtractedDetails) {
    if found.title.is_none() && found.description.is_some() {
        found.title = found.description.clone();
    }
}

#[async_trait]
impl Extractor for DetailExtractor {
    async fn extract(&self, text: &str) -> convoke_core::Result<ExtractedDetails> {
        let mut found = ExtractedDetails::default();

        if let Some(qa) = &self.qa {
            let title = qa
                .answer(TITLE_QUESTION, text)
                .await
                .map_err(|e| DialogueError::Extraction {
                    reason: e.to_string(),
                })?;
            let description = qa
                .answer(DESCRIPTION_QUESTION, text)
                .await
                .map_err(|e| DialogueError::Extraction {
                    reason: e.to_string(),
                })?;
            found.title = title.map(|a| a.answer);
            found.description = description.map(|a| a.answer);
            apply_title_fallback(&mut found);
        }

        found.to_email = email::find_email(text);
        found.start_time = timeparse::parse_datetime(text, Local::now());

        debug!(
            qa = self.has_qa(),
            empty = found.is_empty(),
            "detail extraction finished"
        );
        Ok(found)
    }

    fn find_email(&self, text: &str) -> Option<String> {
        email::find_email(text)
    }

    fn parse_datetime(&self, text: &str) -> Option<DateTime<Local>> {
        timeparse::parse_datetime(text, Local::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Timelike};

    #[tokio::test]
    async fn pattern_only_extraction_resolves_email_and_time() {
        let extractor = DetailExtractor::new();
        let found = extractor
            .extract("team meeting tomorrow at 3pm for user@example.com")
            .await
            .unwrap();

        assert_eq!(found.to_email.as_deref(), Some("user@example.com"));
        let start = found.start_time.expect("start time should parse");
        assert_eq!(
            start.date_naive(),
            (Local::now() + Duration::days(1)).date_naive()
        );
        assert_eq!(start.hour(), 15);
        // No QA tier: title and description stay unresolved.
        assert!(found.title.is_none());
        assert!(found.description.is_none());
    }

    #[tokio::test]
    async fn extraction_without_signal_is_empty_not_an_error() {
        let extractor = DetailExtractor::new();
        let found = extractor.extract("please set something up").await.unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn title_fallback_copies_description() {
        let mut found = ExtractedDetails {
            description: Some("Q3 roadmap review".into()),
            ..Default::default()
        };
        apply_title_fallback(&mut found);
        assert_eq!(found.title.as_deref(), Some("Q3 roadmap review"));
    }

    #[test]
    fn title_fallback_never_overwrites_a_found_title() {
        let mut found = ExtractedDetails {
            title: Some("Planning".into()),
            description: Some("Q3 roadmap review".into()),
            ..Default::default()
        };
        apply_title_fallback(&mut found);
        assert_eq!(found.title.as_deref(), Some("Planning"));
    }

    #[test]
    fn targeted_parsers_delegate_to_pattern_modules() {
        let extractor = DetailExtractor::new();
        assert_eq!(
            extractor.find_email("reach me at a@b.com").as_deref(),
            Some("a@b.com")
        );
        assert!(extractor.parse_datetime("tomorrow at 10am").is_some());
        assert!(extractor.parse_datetime("no date here").is_none());
    }
}
