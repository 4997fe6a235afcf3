//! Shared helper functions used across CLI subcommands.
//!
//! Includes tracing initialization and environment-based configuration
//! resolution for the mail submission and QA extraction collaborators.

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use convoke_extract::{DetailExtractor, QaClient, QaClientConfig};
use convoke_invite::SmtpConfig;

/// Default mail submission host.
const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";

/// Default mail submission port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

// ---------------------------------------------------------------------------
// Tracing
// ---------------------------------------------------------------------------

/// Initialize the tracing subscriber with the given default log level.
pub fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

// ---------------------------------------------------------------------------
// Environment
// ---------------------------------------------------------------------------

/// Read a non-empty environment variable, returning `None` if unset or empty.
pub fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Resolve mail submission settings.
///
/// `SMTP_USERNAME` is required; the password comes from `SMTP_PASSWORD`
/// with `GMAIL_APP_PASSWORD` as a fallback. Host and port default to the
/// Gmail submission endpoint.
pub fn resolve_smtp_config() -> Result<SmtpConfig> {
    let username = env_non_empty("SMTP_USERNAME")
        .context("SMTP_USERNAME is not set; it is required to send invites")?;
    let password = env_non_empty("SMTP_PASSWORD")
        .or_else(|| env_non_empty("GMAIL_APP_PASSWORD"))
        .context("neither SMTP_PASSWORD nor GMAIL_APP_PASSWORD is set")?;

    let host = env_non_empty("SMTP_HOST").unwrap_or_else(|| DEFAULT_SMTP_HOST.to_owned());
    let port = match env_non_empty("SMTP_PORT") {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("SMTP_PORT is not a valid port number: {raw}"))?,
        None => DEFAULT_SMTP_PORT,
    };

    let from_email = resolve_organizer(&username);

    Ok(SmtpConfig {
        host,
        port,
        username,
        password,
        from_email,
    })
}

/// The organizer/sender address: `CONVOKE_FROM_EMAIL`, falling back to the
/// SMTP username.
pub fn resolve_organizer(smtp_username: &str) -> String {
    env_non_empty("CONVOKE_FROM_EMAIL").unwrap_or_else(|| smtp_username.to_owned())
}

/// Where the generated `.ics` artifact is written.
pub fn resolve_artifact_path() -> String {
    env_non_empty("CONVOKE_INVITE_PATH")
        .unwrap_or_else(|| convoke_invite::mailer::DEFAULT_ARTIFACT_PATH.to_owned())
}

/// Build the detail extractor from the environment.
///
/// With `HF_API_TOKEN` set, the QA tier extracts titles and descriptions;
/// without it the extractor degrades to pattern-only matching and the
/// dialogue solicits those slots explicitly.
pub fn resolve_extractor() -> Result<DetailExtractor> {
    let Some(token) = env_non_empty("HF_API_TOKEN") else {
        warn!("HF_API_TOKEN not set; titles and descriptions will be asked for explicitly");
        return Ok(DetailExtractor::new());
    };

    let mut config = QaClientConfig::hugging_face(token);
    if let Some(model) = env_non_empty("CONVOKE_QA_MODEL") {
        config = config.with_model(model);
    }
    if let Some(base_url) = env_non_empty("CONVOKE_QA_BASE_URL") {
        config = config.with_base_url(base_url);
    }

    info!(model = %config.model, "qa extraction enabled");
    let client = QaClient::new(config).context("failed to build QA client")?;
    Ok(DetailExtractor::with_qa(client))
}
