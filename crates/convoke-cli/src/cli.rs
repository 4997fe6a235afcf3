//! CLI argument definitions for Convoke.
//!
//! All `clap` structures live here so that `main.rs` stays focused on
//! dispatching subcommands.

use clap::{Parser, Subcommand};

/// Convoke -- a conversational calendar invite assistant.
#[derive(Parser)]
#[command(
    name = "convoke",
    version,
    about = "Convoke -- conversational calendar invite assistant",
    long_about = "Chats with you to collect an event title, description, recipient, and start \
                  time, then emails a calendar invite."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the interactive chat (the default).
    Chat,

    /// Run detail extraction on a single line of text and print the result.
    Extract {
        /// The text to extract invite details from.
        text: String,
    },
}
