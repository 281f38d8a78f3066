//! Markdown output formatter

use leadscout_core::RankedCandidate;

pub fn format_leads(leads: &[RankedCandidate], query: Option<&str>) -> String {
    let mut output = String::from("# Candidate Leads\n\n");
    if let Some(query) = query {
        output.push_str(&format!("*Search:* `{}`\n\n", query));
    }

    for (i, lead) in leads.iter().enumerate() {
        let c = &lead.candidate;
        match lead.match_score() {
            Some(score) => output.push_str(&format!("## {}. {} (Match: {})\n\n", i + 1, c.name, score)),
            None => output.push_str(&format!("## {}. {}\n\n", i + 1, c.name)),
        }
        if let Some(ref title) = c.title {
            output.push_str(&format!("- **Title**: {}\n", title));
        }
        if let Some(ref company) = c.company {
            output.push_str(&format!("- **Company**: {}\n", company));
        }
        if let Some(ref location) = c.location {
            output.push_str(&format!("- **Location**: {}\n", location));
        }
        if let Some(years) = c.years_experience {
            output.push_str(&format!("- **Experience**: {} years\n", years));
        }
        if let Some(ref licenses) = lead.credentials.licenses {
            output.push_str(&format!("- **Licenses**: {}\n", licenses));
        }
        if let Some(ref certs) = lead.credentials.certifications {
            output.push_str(&format!("- **Certifications**: {}\n", certs));
        }
        if let Some(ref specialty) = lead.credentials.specialty {
            output.push_str(&format!("- **Specialty**: {}\n", specialty));
        }
        if let Some(ref score) = lead.score {
            if !score.notes.is_empty() {
                output.push_str(&format!("- **Notes**: {}\n", score.notes));
            }
        }
        output.push_str(&format!("- **Profile**: <{}>\n", c.profile_url));
        output.push_str("\n---\n\n");
    }

    if leads.is_empty() {
        output.push_str("*No candidates found*\n");
    }

    output
}
