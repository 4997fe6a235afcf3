//! The invite mailer -- serialize, persist the artifact, and send.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use convoke_core::{DialogueError, Invite, InviteProducer};

use crate::error::{InviteError, Result};
use crate::ics;
use crate::smtp::{self, SmtpConfig};

/// Default path for the generated `.ics` artifact.
pub const DEFAULT_ARTIFACT_PATH: &str = "invite.ics";

/// Produces the calendar file and dispatches it by email.
pub struct InviteMailer {
    smtp: SmtpConfig,
    artifact_path: PathBuf,
}

impl InviteMailer {
    /// Create a mailer writing the artifact to [`DEFAULT_ARTIFACT_PATH`].
    pub fn new(smtp: SmtpConfig) -> Self {
        Self {
            smtp,
            artifact_path: PathBuf::from(DEFAULT_ARTIFACT_PATH),
        }
    }

    /// Override where the `.ics` artifact is written.
    pub fn with_artifact_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.artifact_path = path.into();
        self
    }

    /// Where the `.ics` artifact is written.
    pub fn artifact_path(&self) -> &Path {
        &self.artifact_path
    }

    /// Serialize the event, write the artifact, and submit the email.
    async fn send(&self, invite: &Invite) -> Result<()> {
        let uid = Uuid::new_v4().to_string();
        let start = invite.start_time.with_timezone(&Utc);
        let ical = ics::generate_invite(
            &uid,
            Utc::now(),
            &invite.title,
            &invite.description,
            &invite.organizer,
            &invite.to_email,
            start,
        );

        tokio::fs::write(&self.artifact_path, &ical)
            .await
            .map_err(|e| InviteError::Artifact {
                path: self.artifact_path.display().to_string(),
                reason: e.to_string(),
            })?;
        debug!(path = %self.artifact_path.display(), uid = %uid, "invite artifact written");

        let filename = self
            .artifact_path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(DEFAULT_ARTIFACT_PATH);
        let boundary = format!("convoke-{uid}");
        let message = smtp::mime_invite_message(
            &self.smtp.from_email,
            &invite.to_email,
            &invite.title,
            &invite.description,
            &ical,
            &boundary,
            filename,
            Utc::now(),
        );

        smtp::submit(&self.smtp, &invite.to_email, &message).await?;
        info!(to = %invite.to_email, title = %invite.title, "invite delivered");
        Ok(())
    }
}

#[async_trait]
impl InviteProducer for InviteMailer {
    async fn create_and_send(&self, invite: &Invite) -> convoke_core::Result<()> {
        self.send(invite).await.map_err(|e| DialogueError::Delivery {
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SmtpConfig {
        SmtpConfig {
            host: "smtp.example.com".into(),
            port: 587,
            username: "me@example.com".into(),
            password: "app-password".into(),
            from_email: "me@example.com".into(),
        }
    }

    #[test]
    fn mailer_defaults_to_invite_ics() {
        let mailer = InviteMailer::new(config());
        assert_eq!(mailer.artifact_path(), Path::new(DEFAULT_ARTIFACT_PATH));
    }

    #[test]
    fn artifact_path_is_overridable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.ics");
        let mailer = InviteMailer::new(config()).with_artifact_path(&path);
        assert_eq!(mailer.artifact_path(), path.as_path());
    }
}
