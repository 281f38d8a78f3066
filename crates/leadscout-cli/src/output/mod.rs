//! Output formatters

pub mod csv;
pub mod json;
pub mod markdown;
pub mod terminal;

use crate::app::OutputFormat;
use leadscout_core::{Discovery, RankedCandidate};

/// Format a ranked lead list
pub fn format_leads(leads: &[RankedCandidate], format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => json::format_leads(leads),
        OutputFormat::Csv => csv::format_leads(leads),
        OutputFormat::Md => markdown::format_leads(leads, None),
        OutputFormat::Cli => terminal::format_leads(leads),
    }
}

/// Format a full discovery run
///
/// JSON keeps the expanded query and degradations; CSV is leads only.
pub fn format_discovery(discovery: &Discovery, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => json::format_discovery(discovery),
        OutputFormat::Csv => csv::format_leads(&discovery.leads),
        OutputFormat::Md => markdown::format_leads(&discovery.leads, Some(&discovery.expanded_query)),
        OutputFormat::Cli => {
            format!(
                "Query: {}\n\n{}",
                discovery.expanded_query,
                terminal::format_leads(&discovery.leads)
            )
        }
    }
}
