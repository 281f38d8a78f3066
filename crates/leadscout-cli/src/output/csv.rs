//! CSV output formatter

use leadscout_core::RankedCandidate;

pub fn format_leads(leads: &[RankedCandidate]) -> String {
    let mut output = String::from(
        "name,match_score,title,company,location,years_experience,licenses,certifications,specialty,profile_url\n",
    );

    for lead in leads {
        let c = &lead.candidate;
        let fields = [
            escape_csv(&c.name),
            lead.match_score().map(|s| s.to_string()).unwrap_or_default(),
            escape_opt(c.title.as_deref()),
            escape_opt(c.company.as_deref()),
            escape_opt(c.location.as_deref()),
            c.years_experience.map(|y| y.to_string()).unwrap_or_default(),
            escape_opt(lead.credentials.licenses.as_deref()),
            escape_opt(lead.credentials.certifications.as_deref()),
            escape_opt(lead.credentials.specialty.as_deref()),
            escape_csv(&c.profile_url),
        ];
        output.push_str(&fields.join(","));
        output.push('\n');
    }

    output
}

fn escape_opt(s: Option<&str>) -> String {
    s.map(escape_csv).unwrap_or_default()
}

fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("BLS, ACLS"), "\"BLS, ACLS\"");
        assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_csv("RN"), "RN");
    }
}
