//! Extractive question-answering client.
//!
//! Talks to a Hugging Face inference endpoint hosting an extractive QA
//! model. Given a question and a context passage, the model returns the
//! answer span it found in the context together with a confidence score;
//! low-scoring answers are discarded rather than surfaced.

use serde_json::{Value, json};
use tracing::debug;

use crate::error::{ExtractError, Result};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default inference endpoint base URL.
pub const DEFAULT_QA_BASE_URL: &str = "https://api-inference.huggingface.co";

/// Default extractive QA model.
pub const DEFAULT_QA_MODEL: &str = "deepset/roberta-base-squad2";

/// Answers scoring below this are treated as "not found".
pub const DEFAULT_SCORE_THRESHOLD: f64 = 0.1;

/// Request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 60;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for connecting to a QA inference endpoint.
#[derive(Debug, Clone)]
pub struct QaClientConfig {
    /// Inference endpoint base URL.
    pub base_url: String,
    /// Bearer token for authentication.
    pub api_token: String,
    /// Model identifier (e.g. `deepset/roberta-base-squad2`).
    pub model: String,
    /// Minimum confidence score for an answer to count.
    pub score_threshold: f64,
}

impl QaClientConfig {
    /// Create a configuration for the Hugging Face inference API with the
    /// default extractive QA model.
    pub fn hugging_face(api_token: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_QA_BASE_URL.to_owned(),
            api_token: api_token.into(),
            model: DEFAULT_QA_MODEL.to_owned(),
            score_threshold: DEFAULT_SCORE_THRESHOLD,
        }
    }

    /// Override the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the endpoint base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// An answer span returned by the QA model.
#[derive(Debug, Clone, PartialEq)]
pub struct QaAnswer {
    pub answer: String,
    pub score: f64,
}

/// HTTP client for an extractive QA endpoint.
#[derive(Debug, Clone)]
pub struct QaClient {
    config: QaClientConfig,
    http: reqwest::Client,
}

impl QaClient {
    /// Create a new client with the given configuration.
    pub fn new(config: QaClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { config, http })
    }

    /// Ask the model a question about the given context.
    ///
    /// Returns `Ok(None)` when the model found nothing confident enough;
    /// `Err` is reserved for transport and endpoint failures.
    pub async fn answer(&self, question: &str, context: &str) -> Result<Option<QaAnswer>> {
        let url = format!(
            "{}/models/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_token)
            .json(&json!({
                "inputs": { "question": question, "context": context }
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExtractError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response.json().await?;
        let answer = parse_qa_response(&body, self.config.score_threshold)?;
        debug!(
            question = question,
            found = answer.is_some(),
            "qa answer received"
        );
        Ok(answer)
    }
}

/// Parse a QA endpoint response body.
///
/// The endpoint returns either a single `{"score": f, "answer": s}` object
/// or a one-element array of the same shape. Answers below `threshold`, and
/// empty answer spans, yield `None`.
pub fn parse_qa_response(body: &Value, threshold: f64) -> Result<Option<QaAnswer>> {
    let item = match body {
        Value::Array(items) => match items.first() {
            Some(first) => first,
            None => return Ok(None),
        },
        other => other,
    };

    if let Some(error) = item.get("error").and_then(|v| v.as_str()) {
        return Err(ExtractError::MalformedResponse {
            reason: error.to_string(),
        });
    }

    let answer = item
        .get("answer")
        .and_then(|v| v.as_str())
        .ok_or_else(|| ExtractError::MalformedResponse {
            reason: format!("missing `answer` field in {item}"),
        })?;
    let score = item.get("score").and_then(|v| v.as_f64()).unwrap_or(0.0);

    let answer = answer.trim();
    if answer.is_empty() || score < threshold {
        return Ok(None);
    }

    Ok(Some(QaAnswer {
        answer: answer.to_string(),
        score,
    }))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hugging_face_config_defaults() {
        let config = QaClientConfig::hugging_face("token");
        assert_eq!(config.base_url, DEFAULT_QA_BASE_URL);
        assert_eq!(config.model, DEFAULT_QA_MODEL);
        assert!((config.score_threshold - DEFAULT_SCORE_THRESHOLD).abs() < f64::EPSILON);
    }

    #[test]
    fn config_overrides() {
        let config = QaClientConfig::hugging_face("token")
            .with_model("custom/model")
            .with_base_url("http://localhost:8080");
        assert_eq!(config.model, "custom/model");
        assert_eq!(config.base_url, "http://localhost:8080");
    }

    #[test]
    fn parse_object_shape() {
        let body = serde_json::json!({"score": 0.92, "answer": "team meeting"});
        let answer = parse_qa_response(&body, 0.1).unwrap().unwrap();
        assert_eq!(answer.answer, "team meeting");
        assert!((answer.score - 0.92).abs() < f64::EPSILON);
    }

    #[test]
    fn parse_array_shape() {
        let body = serde_json::json!([{"score": 0.5, "answer": "Q3 roadmap"}]);
        let answer = parse_qa_response(&body, 0.1).unwrap().unwrap();
        assert_eq!(answer.answer, "Q3 roadmap");
    }

    #[test]
    fn low_score_is_discarded() {
        let body = serde_json::json!({"score": 0.05, "answer": "maybe"});
        assert!(parse_qa_response(&body, 0.1).unwrap().is_none());
    }

    #[test]
    fn empty_answer_is_discarded() {
        let body = serde_json::json!({"score": 0.9, "answer": "  "});
        assert!(parse_qa_response(&body, 0.1).unwrap().is_none());
    }

    #[test]
    fn empty_array_means_no_answer() {
        let body = serde_json::json!([]);
        assert!(parse_qa_response(&body, 0.1).unwrap().is_none());
    }

    #[test]
    fn error_field_is_surfaced() {
        let body = serde_json::json!({"error": "model is loading"});
        let err = parse_qa_response(&body, 0.1).unwrap_err();
        assert!(err.to_string().contains("model is loading"));
    }

    #[test]
    fn missing_answer_field_is_malformed() {
        let body = serde_json::json!({"score": 0.9});
        assert!(parse_qa_response(&body, 0.1).is_err());
    }
}
