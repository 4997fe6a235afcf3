//! CLI entry point for Convoke.
//!
//! This binary provides the `convoke` command: the interactive chat (the
//! default) and a one-shot extraction debug helper.

use anyhow::Result;
use clap::Parser;

mod chat;
mod cli;
mod extract;
mod helpers;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before anything reads configuration.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Chat) | None => chat::cmd_chat().await,
        Some(Commands::Extract { text }) => extract::cmd_extract(&text).await,
    }
}
