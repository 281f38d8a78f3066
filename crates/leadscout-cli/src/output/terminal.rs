//! Terminal output formatter

use leadscout_core::RankedCandidate;

pub fn format_leads(leads: &[RankedCandidate]) -> String {
    if leads.is_empty() {
        return "No candidates found\n".to_string();
    }

    let mut output = String::new();

    for lead in leads {
        let c = &lead.candidate;
        let score = lead
            .match_score()
            .map(|s| format!("{:>3}", s))
            .unwrap_or_else(|| "  -".to_string());
        output.push_str(&format!("{} {}", score, c.name));

        let role: Vec<&str> = [c.title.as_deref(), c.company.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        if !role.is_empty() {
            output.push_str(&format!(" | {}", role.join(" @ ")));
        }
        if let Some(ref location) = c.location {
            output.push_str(&format!(" | {}", location));
        }
        output.push('\n');

        let creds: Vec<&str> = [
            lead.credentials.licenses.as_deref(),
            lead.credentials.certifications.as_deref(),
            lead.credentials.specialty.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect();
        if !creds.is_empty() {
            output.push_str(&format!("    {}\n", creds.join(" / ")));
        }
        output.push_str(&format!("    {}\n", c.profile_url));
    }

    output
}
