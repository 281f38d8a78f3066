//! JSON output formatter

use leadscout_core::{Discovery, RankedCandidate};

pub fn format_leads(leads: &[RankedCandidate]) -> String {
    serde_json::to_string_pretty(leads).unwrap_or_else(|_| "[]".to_string()) + "\n"
}

pub fn format_discovery(discovery: &Discovery) -> String {
    serde_json::to_string_pretty(discovery).unwrap_or_else(|_| "{}".to_string()) + "\n"
}
