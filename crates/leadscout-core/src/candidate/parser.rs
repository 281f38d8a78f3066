//! Raw search result parsing
//!
//! A result becomes a candidate only if its URL is a profile page and some
//! extraction strategy yields a usable name. Strategies run in order:
//!
//! 1. JSON payload in `summary`
//! 2. structured `person` record
//! 3. the page title (`Name - Title at Company | LinkedIn`)
//! 4. the profile URL slug (`/in/jane-doe-8a7b6c5`)
//!
//! The first strategy with a valid name supplies the name; title, company
//! and location come from the first strategy that provides each. Every
//! strategy is a pure function of the raw result.

use super::location::{extract_location, extract_years_experience};
use super::ParsedCandidate;
use crate::search::RawResult;
use crate::text::{collapse_whitespace, extract_json_object, truncate_chars};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};

/// URL substrings that identify a people-profile page
pub const PROFILE_PATH_MARKERS: &[&str] = &["linkedin.com/in/"];

/// Names containing any of these (lowercased) are page chrome, not people
pub const JUNK_NAME_TOKENS: &[&str] = &["job", "search", "result", "linkedin"];

pub const MIN_NAME_CHARS: usize = 2;
pub const MAX_NAME_CHARS: usize = 60;
pub const SUMMARY_MAX_CHARS: usize = 500;

lazy_static! {
    static ref DASH_SPLIT_RE: Regex = Regex::new(r"\s+[-–—]\s+").unwrap();
    static ref HEADLINE_AT_RE: Regex = Regex::new(r"(?i)^(.+?)(?:\s+at\s+|\s*@\s*)(.+)$").unwrap();
}

/// Fields a single strategy managed to recover
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct ProfileFields {
    name: Option<String>,
    title: Option<String>,
    company: Option<String>,
    location: Option<String>,
}

impl ProfileFields {
    fn is_empty(&self) -> bool {
        self.name.is_none() && self.title.is_none() && self.company.is_none() && self.location.is_none()
    }
}

type Strategy = fn(&RawResult) -> Option<ProfileFields>;

const STRATEGIES: &[(&str, Strategy)] = &[
    ("summary_payload", from_summary_payload),
    ("person_record", from_person_record),
    ("page_title", from_page_title),
    ("url_slug", from_url_slug),
];

/// Whether the URL points at a people-profile page
pub fn is_profile_url(url: &str) -> bool {
    let lower = url.to_lowercase();
    PROFILE_PATH_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// Convert a raw search result into a candidate, or drop it
pub fn parse_result(raw: &RawResult) -> Option<ParsedCandidate> {
    if !is_profile_url(&raw.url) {
        tracing::debug!(url = %raw.url, "dropping non-profile result");
        return None;
    }

    let mut name: Option<String> = None;
    let mut merged = ProfileFields::default();

    for (label, strategy) in STRATEGIES {
        let Some(fields) = strategy(raw) else {
            continue;
        };
        if name.is_none() {
            name = fields.name.as_deref().and_then(clean_name);
            if name.is_some() {
                tracing::trace!(strategy = *label, "name resolved");
            }
        }
        merged.title = merged.title.or(fields.title);
        merged.company = merged.company.or(fields.company);
        merged.location = merged.location.or(fields.location);
    }

    let Some(name) = name else {
        tracing::debug!(url = %raw.url, title = %raw.title, "dropping result without usable name");
        return None;
    };

    let free_text = free_text(raw);
    let location = merged.location.or_else(|| extract_location(&free_text));
    let years_experience = extract_years_experience(&free_text);

    Some(ParsedCandidate {
        name,
        profile_url: raw.url.trim().to_string(),
        title: merged.title.and_then(|t| non_empty(&t)),
        company: merged.company.and_then(|c| non_empty(&c)),
        location: location.and_then(|l| non_empty(&l)),
        years_experience,
        summary: summary_text(raw),
    })
}

fn free_text(raw: &RawResult) -> String {
    let mut text = format!("{}\n{}", raw.title, raw.text);
    if let Some(ref summary) = raw.summary {
        text.push('\n');
        text.push_str(summary);
    }
    text
}

fn summary_text(raw: &RawResult) -> String {
    let source = if !raw.text.trim().is_empty() {
        raw.text.as_str()
    } else {
        match raw.summary.as_deref() {
            Some(summary) if extract_json_object(summary).is_none() => summary,
            _ => raw.title.as_str(),
        }
    };
    let collapsed = collapse_whitespace(source);
    truncate_chars(&collapsed, SUMMARY_MAX_CHARS).trim_end().to_string()
}

fn non_empty(value: &str) -> Option<String> {
    let collapsed = collapse_whitespace(value);
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

/// Normalize a candidate name and reject junk; `None` means unusable
pub fn clean_name(raw: &str) -> Option<String> {
    // Post-nominals ("Jane Doe, RN, BSN") belong to the credential scan, not the name
    let head = raw.split(',').next().unwrap_or("");
    let collapsed = collapse_whitespace(head);
    let trimmed = collapsed.trim_matches(|c: char| !c.is_alphanumeric() && c != '.' && c != '\'');
    let capped = truncate_chars(trimmed, MAX_NAME_CHARS).trim_end();

    if capped.chars().count() < MIN_NAME_CHARS {
        return None;
    }

    let lower = capped.to_lowercase();
    if JUNK_NAME_TOKENS.iter().any(|token| lower.contains(token)) {
        return None;
    }

    Some(capped.to_string())
}

fn string_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .filter_map(|value| value.as_str())
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

fn from_summary_payload(raw: &RawResult) -> Option<ProfileFields> {
    let summary = raw.summary.as_deref()?;
    let json = extract_json_object(summary)?;
    let value: Value = serde_json::from_str(json).ok()?;
    let obj = value.as_object()?;

    let fields = ProfileFields {
        name: string_field(obj, &["name", "full_name", "fullName"]),
        title: string_field(obj, &["title", "headline", "job_title", "jobTitle", "current_title"]),
        company: string_field(
            obj,
            &["company", "current_company", "currentCompany", "employer", "organization"],
        ),
        location: string_field(obj, &["location", "city"]),
    };
    (!fields.is_empty()).then_some(fields)
}

fn from_person_record(raw: &RawResult) -> Option<ProfileFields> {
    let person = raw.person.as_ref()?;
    let fields = ProfileFields {
        name: person.name.clone(),
        title: person.title.clone(),
        company: person.company.clone(),
        location: person.location.clone(),
    };
    (!fields.is_empty()).then_some(fields)
}

fn from_page_title(raw: &RawResult) -> Option<ProfileFields> {
    let parts: Vec<&str> = raw
        .title
        .split('|')
        .flat_map(|segment| DASH_SPLIT_RE.split(segment))
        .map(str::trim)
        .filter(|part| !part.is_empty() && !part.eq_ignore_ascii_case("linkedin"))
        .collect();

    let name = parts.first()?;
    let mut fields = ProfileFields {
        name: Some(name.to_string()),
        ..Default::default()
    };

    if let Some(headline) = parts.get(1) {
        match HEADLINE_AT_RE.captures(headline) {
            Some(caps) => {
                fields.title = Some(caps[1].trim().to_string());
                fields.company = Some(caps[2].trim().to_string());
            }
            None => fields.title = Some(headline.to_string()),
        }
    }

    if fields.company.is_none() {
        fields.company = parts.get(2).map(|c| c.to_string());
    }

    Some(fields)
}

fn from_url_slug(raw: &RawResult) -> Option<ProfileFields> {
    // ASCII lowering keeps byte offsets valid for slicing the original
    let idx = raw.url.to_ascii_lowercase().find("/in/")?;
    let rest = &raw.url[idx + "/in/".len()..];
    let slug = rest.split(['/', '?', '#']).next()?;

    let mut words: Vec<&str> = slug.split(['-', '_']).filter(|w| !w.is_empty()).collect();
    while words.len() > 1 && words.last().is_some_and(|w| is_hash_suffix(w)) {
        words.pop();
    }
    if words.iter().all(|w| is_hash_suffix(w)) {
        return None;
    }

    let name = words.iter().map(|w| title_case(w)).collect::<Vec<_>>().join(" ");
    Some(ProfileFields {
        name: Some(name),
        ..Default::default()
    })
}

/// LinkedIn appends `-8a7b6c5`-style disambiguators to vanity slugs
fn is_hash_suffix(word: &str) -> bool {
    let all_alnum = word.chars().all(|c| c.is_ascii_alphanumeric());
    let has_digit = word.chars().any(|c| c.is_ascii_digit());
    all_alnum && has_digit
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::PersonRecord;
    use proptest::prelude::*;

    fn raw(url: &str, title: &str, text: &str) -> RawResult {
        RawResult::new(url, title, text)
    }

    #[test]
    fn test_non_profile_urls_are_dropped() {
        let cases = [
            "https://www.indeed.com/viewjob?jk=123",
            "https://www.linkedin.com/jobs/view/123",
            "https://www.linkedin.com/company/mercy-hospital",
            "https://example.com/in-network/nurses",
        ];
        for url in cases {
            assert_eq!(parse_result(&raw(url, "Jane Doe - RN", "ICU nurse")), None, "{}", url);
        }
    }

    #[test]
    fn test_title_strategy() {
        let result = raw(
            "https://www.linkedin.com/in/jane-doe-8a7b6c5",
            "Jane Doe - ICU Registered Nurse at Mercy Hospital | LinkedIn",
            "Based in Miami, FL. 7+ years of experience in critical care.",
        );
        let candidate = parse_result(&result).unwrap();
        assert_eq!(candidate.name, "Jane Doe");
        assert_eq!(candidate.title.as_deref(), Some("ICU Registered Nurse"));
        assert_eq!(candidate.company.as_deref(), Some("Mercy Hospital"));
        assert_eq!(candidate.location.as_deref(), Some("Miami, FL"));
        assert_eq!(candidate.years_experience, Some(7));
    }

    #[test]
    fn test_title_strategy_pipe_and_third_segment() {
        let result = raw(
            "https://linkedin.com/in/marcus-lee",
            "Marcus Lee | Travel ER Nurse - Aya Healthcare",
            "",
        );
        let candidate = parse_result(&result).unwrap();
        assert_eq!(candidate.name, "Marcus Lee");
        assert_eq!(candidate.title.as_deref(), Some("Travel ER Nurse"));
        assert_eq!(candidate.company.as_deref(), Some("Aya Healthcare"));
        assert_eq!(candidate.summary, "Marcus Lee | Travel ER Nurse - Aya Healthcare");
    }

    #[test]
    fn test_headline_with_at_sign() {
        let result = raw(
            "https://www.linkedin.com/in/ana-ruiz",
            "Ana Ruiz - RN @ Jackson Health",
            "",
        );
        let candidate = parse_result(&result).unwrap();
        assert_eq!(candidate.title.as_deref(), Some("RN"));
        assert_eq!(candidate.company.as_deref(), Some("Jackson Health"));
    }

    #[test]
    fn test_summary_payload_takes_precedence() {
        let mut result = raw(
            "https://www.linkedin.com/in/someone",
            "Wrong Name - Wrong Title",
            "Pediatric nurse",
        );
        result.summary = Some(
            "```json\n{\"name\": \"Priya Patel\", \"title\": \"PICU Nurse\", \"company\": \"Nicklaus Children's\", \"location\": \"Miami, FL\"}\n```"
                .to_string(),
        );
        let candidate = parse_result(&result).unwrap();
        assert_eq!(candidate.name, "Priya Patel");
        assert_eq!(candidate.title.as_deref(), Some("PICU Nurse"));
        assert_eq!(candidate.company.as_deref(), Some("Nicklaus Children's"));
        assert_eq!(candidate.location.as_deref(), Some("Miami, FL"));
    }

    #[test]
    fn test_person_record_strategy() {
        let mut result = raw("https://www.linkedin.com/in/x1y2z3", "", "");
        result.person = Some(PersonRecord {
            name: Some("Tom Nguyen".into()),
            title: None,
            company: Some("Baptist Health".into()),
            location: None,
        });
        let candidate = parse_result(&result).unwrap();
        assert_eq!(candidate.name, "Tom Nguyen");
        assert_eq!(candidate.company.as_deref(), Some("Baptist Health"));
        assert_eq!(candidate.title, None);
    }

    #[test]
    fn test_url_slug_fallback() {
        let result = raw(
            "https://www.linkedin.com/in/maria-gonzalez-rn-4b2a91/?originalSubdomain=us",
            "LinkedIn",
            "",
        );
        let candidate = parse_result(&result).unwrap();
        assert_eq!(candidate.name, "Maria Gonzalez Rn");
    }

    #[test]
    fn test_url_slug_path_is_case_insensitive() {
        let result = raw("https://WWW.LinkedIn.com/IN/jane-doe", "LinkedIn", "");
        let candidate = parse_result(&result).unwrap();
        assert_eq!(candidate.name, "Jane Doe");
    }

    #[test]
    fn test_junk_title_falls_through_to_slug() {
        let result = raw(
            "https://www.linkedin.com/in/kevin-obrien",
            "Nursing Jobs in Miami | LinkedIn",
            "",
        );
        let candidate = parse_result(&result).unwrap();
        assert_eq!(candidate.name, "Kevin Obrien");
    }

    #[test]
    fn test_unusable_name_everywhere_is_dropped() {
        let result = raw("https://www.linkedin.com/in/12345678", "Search results", "");
        assert_eq!(parse_result(&result), None);
    }

    #[test]
    fn test_clean_name_rules() {
        assert_eq!(clean_name("  Jane   Doe, RN, BSN "), Some("Jane Doe".to_string()));
        assert_eq!(clean_name("J"), None);
        assert_eq!(clean_name(""), None);
        assert_eq!(clean_name("Job Search"), None);
        assert_eq!(clean_name("LinkedIn Member"), None);
        let long = "A".repeat(80);
        assert_eq!(clean_name(&long).unwrap().chars().count(), MAX_NAME_CHARS);
    }

    #[test]
    fn test_parse_is_deterministic() {
        let result = raw(
            "https://www.linkedin.com/in/jane-doe",
            "Jane Doe - Charge Nurse at Mount Sinai",
            "Located in New York, NY",
        );
        assert_eq!(parse_result(&result), parse_result(&result));
    }

    #[test]
    fn test_summary_is_capped() {
        let text = "word ".repeat(400);
        let result = raw("https://www.linkedin.com/in/jane-doe", "Jane Doe", &text);
        let candidate = parse_result(&result).unwrap();
        assert!(candidate.summary.chars().count() <= SUMMARY_MAX_CHARS);
    }

    proptest! {
        #[test]
        fn parsed_names_respect_bounds(title in ".{0,120}", slug in "[a-z0-9-]{0,40}") {
            let result = raw(&format!("https://www.linkedin.com/in/{}", slug), &title, "");
            if let Some(candidate) = parse_result(&result) {
                let len = candidate.name.chars().count();
                prop_assert!((MIN_NAME_CHARS..=MAX_NAME_CHARS).contains(&len));
                let lower = candidate.name.to_lowercase();
                prop_assert!(JUNK_NAME_TOKENS.iter().all(|token| !lower.contains(token)));
            }
        }

        #[test]
        fn results_without_profile_marker_never_parse(path in "[a-z0-9-]{1,30}", title in "[A-Za-z ]{0,40}") {
            let result = raw(&format!("https://www.linkedin.com/jobs/{}", path), &title, "RN");
            prop_assert!(parse_result(&result).is_none());
        }
    }
}
