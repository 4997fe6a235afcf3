//! Subcommand: `convoke extract` -- one-shot extraction debug output.

use anyhow::{Context, Result};

use convoke_core::Extractor;

use crate::helpers::{init_tracing, resolve_extractor};

/// Run the configured extractor over one line of text and print the
/// resulting partial details as pretty JSON.
pub async fn cmd_extract(text: &str) -> Result<()> {
    init_tracing("info");

    let extractor = resolve_extractor()?;
    let found = extractor.extract(text).await.context("extraction failed")?;

    let rendered =
        serde_json::to_string_pretty(&found).context("failed to render extraction result")?;
    println!("{rendered}");
    Ok(())
}
