//! Subcommand: `convoke chat` -- interactive chat REPL.
//!
//! One line of input is one dialogue turn: the manager runs to completion
//! before the next prompt is shown, and whatever assistant entries the turn
//! appended are printed in order.

use std::io::{self, Write as _};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use convoke_core::{DialogueManager, SessionContext};
use convoke_invite::InviteMailer;

use crate::helpers::{init_tracing, resolve_artifact_path, resolve_extractor, resolve_smtp_config};

/// Run the interactive chat.
pub async fn cmd_chat() -> Result<()> {
    init_tracing("warn");

    // 1. Resolve collaborators from the environment.
    let extractor = Arc::new(resolve_extractor()?);
    let qa_enabled = extractor.has_qa();

    let smtp = resolve_smtp_config()?;
    let organizer = smtp.from_email.clone();
    let mailer =
        Arc::new(InviteMailer::new(smtp).with_artifact_path(resolve_artifact_path()));

    let manager = DialogueManager::new(extractor, mailer, organizer.clone());
    let mut session = SessionContext::new();

    info!(organizer = %organizer, "chat session ready");

    // 2. Print the startup banner.
    println!();
    println!("  Convoke v{}", env!("CARGO_PKG_VERSION"));
    println!("  Organizer: {organizer}");
    println!(
        "  Extraction: {}",
        if qa_enabled {
            "qa model + patterns"
        } else {
            "patterns only (set HF_API_TOKEN for qa extraction)"
        }
    );
    println!(
        "  e.g., 'Create a calendar invite for a team meeting about the Q3 roadmap for \
         user@example.com'"
    );
    println!("  Type your request, or 'quit' to exit.");
    println!();

    // 3. Set up Ctrl+C handler.
    tokio::spawn(async {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("\n  Goodbye!");
            std::process::exit(0);
        }
    });

    // 4. Chat loop: one line, one turn.
    let stdin = io::stdin();
    let mut line_buf = String::new();

    loop {
        print!("You: ");
        io::stdout().flush().ok();

        line_buf.clear();
        match stdin.read_line(&mut line_buf) {
            Ok(0) => {
                println!();
                break;
            }
            Ok(_) => {}
            Err(e) => return Err(e).context("failed to read input"),
        }

        let trimmed = line_buf.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed == "quit" || trimmed == "exit" {
            break;
        }

        let before = session.transcript.len();
        manager.handle_turn(&mut session, trimmed).await;

        // Print what the turn appended, skipping the echoed user entry.
        for message in &session.transcript.messages()[before..] {
            if message.speaker == convoke_core::Speaker::Assistant {
                println!("{message}");
            }
        }
    }

    Ok(())
}
