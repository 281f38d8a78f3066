//! Parse command

use crate::app::{OutputFormat, ParseArgs};
use crate::output;
use anyhow::{Context, Result};
use leadscout_core::decode_results;
use leadscout_core::pipeline::collect_candidates;

pub fn run(args: ParseArgs, format: OutputFormat) -> Result<()> {
    let body = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let raw = decode_results(&body)?;

    let leads = collect_candidates(&raw, args.limit.unwrap_or(raw.len()));
    tracing::info!(raw = raw.len(), parsed = leads.len(), "parsed search results");

    print!("{}", output::format_leads(&leads, format));
    Ok(())
}
