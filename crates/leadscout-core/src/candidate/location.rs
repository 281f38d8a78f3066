//! Location and experience recovery from free text
//!
//! Location rules run in order and the first hit wins:
//! explicit phrasing ("based in ..."), then `City, ST`, then a list of
//! well-known place names.

use lazy_static::lazy_static;
use regex::Regex;

/// Two-letter US state and territory codes accepted after `City,`
const US_STATES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN",
    "IA", "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH",
    "NJ", "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT",
    "VT", "VA", "WA", "WV", "WI", "WY", "PR",
];

/// Last-resort place names, checked in this order
const KNOWN_PLACES: &[&str] = &[
    "Los Angeles",
    "San Francisco",
    "San Diego",
    "San Antonio",
    "San Jose",
    "New York City",
    "New York",
    "Fort Lauderdale",
    "Salt Lake City",
    "Kansas City",
    "Las Vegas",
    "St. Louis",
    "Miami",
    "Chicago",
    "Houston",
    "Dallas",
    "Austin",
    "Phoenix",
    "Philadelphia",
    "Seattle",
    "Boston",
    "Atlanta",
    "Denver",
    "Orlando",
    "Tampa",
    "Jacksonville",
    "Nashville",
    "Portland",
    "Detroit",
    "Minneapolis",
    "Charlotte",
    "Baltimore",
    "Sacramento",
    "Pittsburgh",
    "Cleveland",
    "Columbus",
    "Indianapolis",
    "Raleigh",
    "Richmond",
    "Honolulu",
    "Bay Area",
    "Florida",
    "California",
    "Texas",
];

/// Years above this are treated as noise (dates, phone fragments)
const MAX_YEARS_EXPERIENCE: u32 = 60;

const PLACE: &str = r"[A-Z][a-zA-Z.'-]*(?:\s+[A-Z][a-zA-Z.'-]*){0,3}";

lazy_static! {
    static ref EXPLICIT_RE: Regex = Regex::new(&format!(
        r"\b(?:[Bb]ased in|[Ll]ocated in|[Ll]iving in|[Ll]ives in|[Rr]esiding in)\s+({PLACE}(?:,\s*[A-Z]{{2}}\b)?)"
    ))
    .unwrap();
    static ref FROM_RE: Regex = Regex::new(&format!(
        r"\b[Ff]rom\s+({PLACE}),\s*([A-Z]{{2}})\b"
    ))
    .unwrap();
    static ref CITY_STATE_RE: Regex =
        Regex::new(r"\b([A-Z][a-zA-Z.'-]+(?:\s+[A-Z][a-zA-Z.'-]+){0,2}),\s*([A-Z]{2})\b").unwrap();
    static ref KNOWN_PLACE_RES: Vec<(&'static str, Regex)> = KNOWN_PLACES
        .iter()
        .map(|place| {
            let re = Regex::new(&format!(r"\b{}\b", regex::escape(place))).unwrap();
            (*place, re)
        })
        .collect();
    static ref YEARS_RE: Regex = Regex::new(
        r"(?i)\b(\d{1,2})\s*\+?\s*(?:years?|yrs?)\s+(?:of\s+)?(?:[a-z&/-]+\s+){0,2}experience"
    )
    .unwrap();
}

type LocationRule = fn(&str) -> Option<String>;

/// Ordered location rules; each is a pure function of the text
const LOCATION_RULES: &[(&str, LocationRule)] = &[
    ("explicit_phrase", from_explicit_phrase),
    ("city_state", from_city_state),
    ("known_place", from_known_place),
];

/// Recover a location from free text
pub fn extract_location(text: &str) -> Option<String> {
    LOCATION_RULES.iter().find_map(|(name, rule)| {
        let hit = rule(text);
        if let Some(ref place) = hit {
            tracing::trace!(rule = *name, place = %place, "location matched");
        }
        hit
    })
}

fn is_state(code: &str) -> bool {
    US_STATES.contains(&code)
}

fn from_explicit_phrase(text: &str) -> Option<String> {
    if let Some(caps) = EXPLICIT_RE.captures(text) {
        let place = caps[1].trim_end_matches(['.', ',']).trim();
        if !place.is_empty() {
            return Some(place.to_string());
        }
    }

    FROM_RE
        .captures_iter(text)
        .find(|caps| is_state(&caps[2]))
        .map(|caps| format!("{}, {}", caps[1].trim(), &caps[2]))
}

fn from_city_state(text: &str) -> Option<String> {
    CITY_STATE_RE
        .captures_iter(text)
        .find(|caps| is_state(&caps[2]))
        .map(|caps| format!("{}, {}", caps[1].trim(), &caps[2]))
}

fn from_known_place(text: &str) -> Option<String> {
    KNOWN_PLACE_RES
        .iter()
        .find(|(_, re)| re.is_match(text))
        .map(|(place, _)| place.to_string())
}

/// Recover "<N>+ years of experience"
pub fn extract_years_experience(text: &str) -> Option<u32> {
    YEARS_RE
        .captures_iter(text)
        .filter_map(|caps| caps[1].parse::<u32>().ok())
        .find(|years| *years > 0 && *years <= MAX_YEARS_EXPERIENCE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_phrase_wins() {
        let text = "ICU nurse at Mercy, Tampa, FL. Currently based in Miami Beach, FL.";
        assert_eq!(extract_location(text), Some("Miami Beach, FL".to_string()));
    }

    #[test]
    fn test_from_requires_state() {
        assert_eq!(
            extract_location("Graduated from University of Miami nursing school"),
            Some("Miami".to_string())
        );
        assert_eq!(
            extract_location("Originally from Boise, ID and relocating"),
            Some("Boise, ID".to_string())
        );
    }

    #[test]
    fn test_city_state_rejects_non_states() {
        assert_eq!(extract_location("Jane Doe, RN working nights"), None);
        assert_eq!(
            extract_location("Memorial Hospital, Hollywood, FL"),
            Some("Hollywood, FL".to_string())
        );
    }

    #[test]
    fn test_known_place_fallback_order() {
        assert_eq!(
            extract_location("Travel assignments across Texas and Los Angeles"),
            Some("Los Angeles".to_string())
        );
        assert_eq!(extract_location("Remote telehealth only"), None);
    }

    #[test]
    fn test_years_experience() {
        let cases = [
            ("10+ years of experience in critical care", Some(10)),
            ("5 years ICU experience", Some(5)),
            ("3 yrs of clinical experience", Some(3)),
            ("over 99 years of experience", None),
            ("experienced nurse", None),
        ];
        for (text, expected) in cases {
            assert_eq!(extract_years_experience(text), expected, "{}", text);
        }
    }
}
