//! Invite production for Convoke.
//!
//! Implements the [`convoke_core::InviteProducer`] collaborator:
//!
//! - **[`ics`]** -- iCalendar (RFC 5545) serialization of a single
//!   request-style event invitation.
//! - **[`smtp`]** -- MIME assembly and authenticated SMTP submission over
//!   STARTTLS, with pure, testable command builders.
//! - **[`mailer`]** -- [`InviteMailer`], which writes the `.ics` artifact
//!   and emails it to the recipient.
//!
//! Every failure path reports upward as an error; nothing in this crate
//! panics on a delivery problem, so the dialogue keeps its collected slots.

pub mod error;
pub mod ics;
pub mod mailer;
pub mod smtp;

pub use error::{InviteError, Result};
pub use mailer::InviteMailer;
pub use smtp::SmtpConfig;
