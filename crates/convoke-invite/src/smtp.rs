//! MIME assembly and SMTP submission.
//!
//! Authenticated mail submission over STARTTLS: plain TCP to the
//! submission port, EHLO, STARTTLS upgrade (rustls with Mozilla's bundled
//! roots), AUTH LOGIN, then the MAIL/RCPT/DATA dialogue. Command and
//! message builders are pure functions so the protocol pieces are testable
//! without a server.

use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use rustls::ClientConfig;
use rustls::pki_types::ServerName;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_rustls::TlsConnector;
use tracing::{debug, info};

use crate::error::{InviteError, Result};

/// Default mail submission port (STARTTLS).
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// Domain announced in EHLO.
const EHLO_DOMAIN: &str = "localhost";

/// Connection and handshake timeout in seconds.
const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Per-command timeout in seconds.
const COMMAND_TIMEOUT_SECS: u64 = 30;

/// Base64 line width for encoded attachment bodies.
const BASE64_LINE_WIDTH: usize = 76;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Mail submission settings. Credentials come from process configuration.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    /// Submission server hostname.
    pub host: String,
    /// Submission port (default 587).
    pub port: u16,
    /// AUTH LOGIN username.
    pub username: String,
    /// AUTH LOGIN password.
    pub password: String,
    /// Envelope and header sender address.
    pub from_email: String,
}

// ---------------------------------------------------------------------------
// SMTP command builders (pure functions, testable)
// ---------------------------------------------------------------------------

/// Build an SMTP EHLO command.
pub fn ehlo_command(domain: &str) -> String {
    format!("EHLO {domain}\r\n")
}

/// Build an SMTP STARTTLS command.
pub fn starttls_command() -> String {
    "STARTTLS\r\n".to_string()
}

/// Build an SMTP AUTH LOGIN command.
pub fn auth_login_command() -> String {
    "AUTH LOGIN\r\n".to_string()
}

/// Build an SMTP MAIL FROM command.
pub fn mail_from_command(from: &str) -> String {
    format!("MAIL FROM:<{from}>\r\n")
}

/// Build an SMTP RCPT TO command.
pub fn rcpt_to_command(to: &str) -> String {
    format!("RCPT TO:<{to}>\r\n")
}

/// Build an SMTP DATA command.
pub fn data_command() -> String {
    "DATA\r\n".to_string()
}

/// Build an SMTP QUIT command.
pub fn quit_command() -> String {
    "QUIT\r\n".to_string()
}

/// Encode a string to base64 (AUTH LOGIN operands).
pub fn base64_encode(input: &str) -> String {
    base64::engine::general_purpose::STANDARD.encode(input)
}

/// Double any leading dot so message lines survive the DATA terminator.
pub fn dot_stuff(message: &str) -> String {
    message
        .split("\r\n")
        .map(|line| {
            if line.starts_with('.') {
                format!(".{line}")
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\r\n")
}

// ---------------------------------------------------------------------------
// MIME assembly (pure functions, testable)
// ---------------------------------------------------------------------------

/// Wrap a base64 string at the given column width.
pub fn wrap_base64(encoded: &str, width: usize) -> String {
    encoded
        .as_bytes()
        .chunks(width)
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or_default())
        .collect::<Vec<_>>()
        .join("\r\n")
}

/// Base64-encode an attachment payload, wrapped at 76 columns.
pub fn encode_attachment(payload: &[u8]) -> String {
    wrap_base64(
        &base64::engine::general_purpose::STANDARD.encode(payload),
        BASE64_LINE_WIDTH,
    )
}

/// Build the full multipart/mixed message: a plain-text body plus the
/// calendar payload as a base64 attachment.
#[allow(clippy::too_many_arguments)]
pub fn mime_invite_message(
    from: &str,
    to: &str,
    subject: &str,
    body: &str,
    ics_payload: &str,
    boundary: &str,
    filename: &str,
    date: chrono::DateTime<chrono::Utc>,
) -> String {
    format!(
        "From: {from}\r\n\
         To: {to}\r\n\
         Subject: {subject}\r\n\
         Date: {date}\r\n\
         MIME-Version: 1.0\r\n\
         Content-Type: multipart/mixed; boundary=\"{boundary}\"\r\n\
         \r\n\
         --{boundary}\r\n\
         Content-Type: text/plain; charset=UTF-8\r\n\
         \r\n\
         {body}\r\n\
         --{boundary}\r\n\
         Content-Type: application/octet-stream; name=\"{filename}\"\r\n\
         Content-Transfer-Encoding: base64\r\n\
         Content-Disposition: attachment; filename=\"{filename}\"\r\n\
         \r\n\
         {attachment}\r\n\
         --{boundary}--\r\n",
        date = date.to_rfc2822(),
        attachment = encode_attachment(ics_payload.as_bytes()),
    )
}

// ---------------------------------------------------------------------------
// Reply parsing
// ---------------------------------------------------------------------------

/// A complete (possibly multiline) SMTP server reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpReply {
    pub code: u16,
    pub lines: Vec<String>,
}

/// Parse one reply line into its code and whether it terminates the reply.
///
/// `250-line` continues a multiline reply; `250 line` (or a bare `250`)
/// ends it.
pub fn parse_reply_line(line: &str) -> Option<(u16, bool)> {
    let code: u16 = line.get(0..3)?.parse().ok()?;
    let last = match line.as_bytes().get(3) {
        Some(b'-') => false,
        Some(b' ') | None => true,
        Some(_) => return None,
    };
    Some((code, last))
}

/// Read a full server reply, following continuation lines.
async fn read_reply<S>(stream: &mut BufReader<S>) -> Result<SmtpReply>
where
    S: AsyncRead + Unpin,
{
    let mut lines = Vec::new();
    loop {
        let mut line = String::new();
        let read = timeout(
            Duration::from_secs(COMMAND_TIMEOUT_SECS),
            stream.read_line(&mut line),
        )
        .await
        .map_err(|_| InviteError::Timeout {
            operation: "reply read",
            seconds: COMMAND_TIMEOUT_SECS,
        })??;

        if read == 0 {
            return Err(InviteError::ConnectionClosed);
        }

        let trimmed = line.trim_end();
        let (code, last) =
            parse_reply_line(trimmed).ok_or_else(|| InviteError::MalformedReply {
                line: trimmed.to_string(),
            })?;
        lines.push(trimmed.to_string());
        if last {
            debug!(code = code, "smtp reply");
            return Ok(SmtpReply { code, lines });
        }
    }
}

/// Read a reply without sending anything (the connection greeting).
async fn expect_reply<S>(
    stream: &mut BufReader<S>,
    command: &'static str,
    expected: u16,
) -> Result<SmtpReply>
where
    S: AsyncRead + Unpin,
{
    let reply = read_reply(stream).await?;
    if reply.code != expected {
        return Err(InviteError::UnexpectedReply {
            command,
            expected,
            code: reply.code,
            detail: reply.lines.join(" / "),
        });
    }
    Ok(reply)
}

/// Send a command and verify the reply code.
async fn exchange<S>(
    stream: &mut BufReader<S>,
    payload: &str,
    command: &'static str,
    expected: u16,
) -> Result<SmtpReply>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let writer = stream.get_mut();
    timeout(
        Duration::from_secs(COMMAND_TIMEOUT_SECS),
        writer.write_all(payload.as_bytes()),
    )
    .await
    .map_err(|_| InviteError::Timeout {
        operation: "command write",
        seconds: COMMAND_TIMEOUT_SECS,
    })??;
    timeout(Duration::from_secs(COMMAND_TIMEOUT_SECS), writer.flush())
        .await
        .map_err(|_| InviteError::Timeout {
            operation: "command flush",
            seconds: COMMAND_TIMEOUT_SECS,
        })??;

    expect_reply(stream, command, expected).await
}

// ---------------------------------------------------------------------------
// TLS
// ---------------------------------------------------------------------------

/// Build a rustls `ClientConfig` using Mozilla's bundled root certificates.
fn tls_client_config() -> Arc<ClientConfig> {
    let root_store = rustls::RootCertStore {
        roots: webpki_roots::TLS_SERVER_ROOTS.to_vec(),
    };
    Arc::new(
        ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth(),
    )
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

/// Submit a fully assembled message to the recipient.
///
/// Runs the complete STARTTLS submission dialogue and verifies every reply
/// code. Errors carry the failing command so delivery problems read clearly
/// in the failure path.
pub async fn submit(config: &SmtpConfig, to: &str, message: &str) -> Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    info!(addr = %addr, to = to, "submitting invite email");

    let tcp = timeout(
        Duration::from_secs(CONNECT_TIMEOUT_SECS),
        TcpStream::connect(&addr),
    )
    .await
    .map_err(|_| InviteError::Timeout {
        operation: "connect",
        seconds: CONNECT_TIMEOUT_SECS,
    })?
    .map_err(|e| InviteError::Connect {
        addr: addr.clone(),
        reason: e.to_string(),
    })?;

    // Plain phase: greeting, EHLO, STARTTLS.
    let mut plain = BufReader::new(tcp);
    expect_reply(&mut plain, "greeting", 220).await?;
    exchange(&mut plain, &ehlo_command(EHLO_DOMAIN), "EHLO", 250).await?;
    exchange(&mut plain, &starttls_command(), "STARTTLS", 220).await?;

    // TLS upgrade on the same socket.
    let connector = TlsConnector::from(tls_client_config());
    let server_name =
        ServerName::try_from(config.host.clone()).map_err(|e| InviteError::Tls {
            reason: format!("invalid server name '{}': {e}", config.host),
        })?;
    let tls = timeout(
        Duration::from_secs(CONNECT_TIMEOUT_SECS),
        connector.connect(server_name, plain.into_inner()),
    )
    .await
    .map_err(|_| InviteError::Timeout {
        operation: "tls handshake",
        seconds: CONNECT_TIMEOUT_SECS,
    })?
    .map_err(|e| InviteError::Tls {
        reason: e.to_string(),
    })?;

    // Authenticated phase.
    let mut stream = BufReader::new(tls);
    exchange(&mut stream, &ehlo_command(EHLO_DOMAIN), "EHLO", 250).await?;
    exchange(&mut stream, &auth_login_command(), "AUTH LOGIN", 334).await?;
    exchange(
        &mut stream,
        &format!("{}\r\n", base64_encode(&config.username)),
        "AUTH username",
        334,
    )
    .await?;
    exchange(
        &mut stream,
        &format!("{}\r\n", base64_encode(&config.password)),
        "AUTH password",
        235,
    )
    .await?;

    exchange(
        &mut stream,
        &mail_from_command(&config.from_email),
        "MAIL FROM",
        250,
    )
    .await?;
    exchange(&mut stream, &rcpt_to_command(to), "RCPT TO", 250).await?;
    exchange(&mut stream, &data_command(), "DATA", 354).await?;

    let mut payload = dot_stuff(message);
    if !payload.ends_with("\r\n") {
        payload.push_str("\r\n");
    }
    payload.push_str(".\r\n");
    exchange(&mut stream, &payload, "message body", 250).await?;

    // The message is accepted at this point; a failed QUIT is not a
    // delivery failure.
    let _ = exchange(&mut stream, &quit_command(), "QUIT", 221).await;

    info!(to = to, "invite email accepted by server");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    // -- Command builders --

    #[test]
    fn command_builders_produce_crlf_terminated_lines() {
        assert_eq!(ehlo_command("localhost"), "EHLO localhost\r\n");
        assert_eq!(starttls_command(), "STARTTLS\r\n");
        assert_eq!(auth_login_command(), "AUTH LOGIN\r\n");
        assert_eq!(mail_from_command("a@b.com"), "MAIL FROM:<a@b.com>\r\n");
        assert_eq!(rcpt_to_command("c@d.com"), "RCPT TO:<c@d.com>\r\n");
        assert_eq!(data_command(), "DATA\r\n");
        assert_eq!(quit_command(), "QUIT\r\n");
    }

    #[test]
    fn base64_encode_matches_auth_login_expectations() {
        assert_eq!(base64_encode("user@example.com"), "dXNlckBleGFtcGxlLmNvbQ==");
    }

    #[test]
    fn dot_stuffing_doubles_leading_dots() {
        let stuffed = dot_stuff("line one\r\n.hidden terminator\r\nline three");
        assert_eq!(stuffed, "line one\r\n..hidden terminator\r\nline three");
    }

    // -- Reply parsing --

    #[test]
    fn parse_reply_line_single_and_continuation() {
        assert_eq!(parse_reply_line("250 OK"), Some((250, true)));
        assert_eq!(parse_reply_line("250-SIZE 35882577"), Some((250, false)));
        assert_eq!(parse_reply_line("221"), Some((221, true)));
        assert_eq!(parse_reply_line("abc nope"), None);
        assert_eq!(parse_reply_line("25"), None);
    }

    #[tokio::test]
    async fn read_reply_single_line() {
        let mut stream = BufReader::new(&b"220 smtp.example.com ready\r\n"[..]);
        let reply = read_reply(&mut stream).await.unwrap();
        assert_eq!(reply.code, 220);
        assert_eq!(reply.lines, ["220 smtp.example.com ready"]);
    }

    #[tokio::test]
    async fn read_reply_follows_continuation_lines() {
        let mut stream =
            BufReader::new(&b"250-smtp.example.com\r\n250-PIPELINING\r\n250 STARTTLS\r\n"[..]);
        let reply = read_reply(&mut stream).await.unwrap();
        assert_eq!(reply.code, 250);
        assert_eq!(reply.lines.len(), 3);
    }

    #[tokio::test]
    async fn read_reply_rejects_malformed_lines() {
        let mut stream = BufReader::new(&b"garbage\r\n"[..]);
        let result = read_reply(&mut stream).await;
        assert!(matches!(result, Err(InviteError::MalformedReply { .. })));
    }

    #[tokio::test]
    async fn read_reply_reports_closed_connection() {
        let mut stream = BufReader::new(&b""[..]);
        let result = read_reply(&mut stream).await;
        assert!(matches!(result, Err(InviteError::ConnectionClosed)));
    }

    #[tokio::test]
    async fn expect_reply_rejects_wrong_code() {
        let mut stream = BufReader::new(&b"535 authentication failed\r\n"[..]);
        let result = expect_reply(&mut stream, "AUTH password", 235).await;
        match result {
            Err(InviteError::UnexpectedReply { command, code, .. }) => {
                assert_eq!(command, "AUTH password");
                assert_eq!(code, 535);
            }
            other => panic!("expected UnexpectedReply, got {other:?}"),
        }
    }

    // -- MIME assembly --

    #[test]
    fn wrap_base64_splits_at_width() {
        let wrapped = wrap_base64("abcdefghij", 4);
        assert_eq!(wrapped, "abcd\r\nefgh\r\nij");
    }

    #[test]
    fn mime_message_contains_headers_body_and_attachment() {
        let date = chrono::Utc.with_ymd_and_hms(2026, 8, 5, 9, 0, 0).unwrap();
        let message = mime_invite_message(
            "me@example.com",
            "you@example.com",
            "Sync",
            "Weekly sync",
            "BEGIN:VCALENDAR\r\nEND:VCALENDAR\r\n",
            "test-boundary",
            "invite.ics",
            date,
        );

        assert!(message.contains("From: me@example.com\r\n"));
        assert!(message.contains("To: you@example.com\r\n"));
        assert!(message.contains("Subject: Sync\r\n"));
        assert!(message.contains("MIME-Version: 1.0\r\n"));
        assert!(message.contains("Content-Type: multipart/mixed; boundary=\"test-boundary\"\r\n"));
        assert!(message.contains("Content-Type: text/plain; charset=UTF-8\r\n"));
        assert!(message.contains("Weekly sync\r\n"));
        assert!(message.contains("Content-Transfer-Encoding: base64\r\n"));
        assert!(message.contains("Content-Disposition: attachment; filename=\"invite.ics\"\r\n"));
        assert!(message.ends_with("--test-boundary--\r\n"));

        // The attachment round-trips back to the calendar payload.
        let attachment = encode_attachment(b"BEGIN:VCALENDAR\r\nEND:VCALENDAR\r\n");
        assert!(message.contains(&attachment));
    }

    #[test]
    fn mime_message_has_exactly_one_closing_boundary() {
        let date = chrono::Utc.with_ymd_and_hms(2026, 8, 5, 9, 0, 0).unwrap();
        let message = mime_invite_message(
            "a@b.com",
            "c@d.com",
            "s",
            "b",
            "ics",
            "bnd",
            "invite.ics",
            date,
        );
        assert_eq!(message.matches("--bnd\r\n").count(), 2);
        assert_eq!(message.matches("--bnd--\r\n").count(), 1);
    }
}
