//! Scoring prompt, tool schema and the decoder for model-provided scores
//!
//! Whatever the model sends back is untrusted. `decode_scores` accepts the
//! loose shapes models actually produce (numbers as strings, `"yes"` for
//! booleans) and rejects anything that cannot be tied to a candidate.

use crate::candidate::{clamp_match_score, RankedCandidate, ScoreResult};
use crate::error::{LeadScoutError, Result};
use crate::llm::ToolDefinition;
use crate::text::{extract_json_object, truncate_chars};
use serde_json::Value;
use std::collections::HashMap;

/// Name of the function the model is forced to call
pub const SCORE_TOOL_NAME: &str = "score_candidates";

/// Rubric weights, summing to 100
pub const LICENSE_WEIGHT: u8 = 30;
pub const CERTIFICATION_WEIGHT: u8 = 25;
pub const EXPERIENCE_WEIGHT: u8 = 25;
pub const LOCATION_WEIGHT: u8 = 20;

pub const MAX_NOTES_CHARS: usize = 500;

const PROMPT_SUMMARY_CHARS: usize = 300;

pub const SYSTEM_PROMPT: &str = "You are a healthcare recruiting analyst. Score each candidate against \
the recruiter's requirement by calling the score_candidates function exactly once with one entry per \
candidate. Use only the information provided.";

/// Tool definition for the `score_candidates` function
pub fn score_tool() -> ToolDefinition {
    ToolDefinition {
        name: SCORE_TOOL_NAME.to_string(),
        description: "Record a match score for every numbered candidate".to_string(),
        parameters: serde_json::json!({
            "type": "object",
            "properties": {
                "results": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "index": { "type": "integer", "description": "Candidate number from the list" },
                            "match_score": { "type": "integer", "minimum": 0, "maximum": 100 },
                            "license_match": { "type": "boolean" },
                            "cert_match": { "type": "boolean" },
                            "experience_match": { "type": "boolean" },
                            "location_match": { "type": "boolean" },
                            "notes": { "type": "string", "description": "One or two sentences" }
                        },
                        "required": ["index", "match_score", "license_match", "cert_match",
                                     "experience_match", "location_match", "notes"]
                    }
                }
            },
            "required": ["results"]
        }),
    }
}

/// Build the user prompt: rubric, requirement and numbered candidates
pub fn build_scoring_prompt(candidates: &[RankedCandidate], requirement: &str) -> String {
    let mut prompt = format!(
        "Requirement: \"{}\"\n\n\
         Rubric (total 100):\n\
         - License match: {} points\n\
         - Certifications match: {} points\n\
         - Experience match: {} points\n\
         - Location match: {} points\n\
         When a dimension's data is missing rather than contradicting the requirement, award half of its points.\n\n\
         Candidates:\n",
        requirement, LICENSE_WEIGHT, CERTIFICATION_WEIGHT, EXPERIENCE_WEIGHT, LOCATION_WEIGHT
    );

    for (idx, ranked) in candidates.iter().enumerate() {
        let c = &ranked.candidate;
        let creds = &ranked.credentials;
        prompt.push_str(&format!(
            "[{}] {} | title: {} | company: {} | location: {} | years: {} | licenses: {} | certifications: {} | specialty: {}\n    {}\n",
            idx,
            c.name,
            c.title.as_deref().unwrap_or("unknown"),
            c.company.as_deref().unwrap_or("unknown"),
            c.location.as_deref().unwrap_or("unknown"),
            c.years_experience
                .map(|y| y.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
            creds.licenses.as_deref().unwrap_or("none found"),
            creds.certifications.as_deref().unwrap_or("none found"),
            creds.specialty.as_deref().unwrap_or("none found"),
            truncate_chars(&c.summary, PROMPT_SUMMARY_CHARS),
        ));
    }

    prompt
}

/// Decode tool-call arguments into scores keyed by candidate index
///
/// Entries with a missing or out-of-range index are skipped; the first entry
/// for an index wins. A payload without a `results` array is an error.
pub fn decode_scores(arguments: &str, candidate_count: usize) -> Result<HashMap<usize, ScoreResult>> {
    let json = extract_json_object(arguments)
        .ok_or_else(|| LeadScoutError::Parse("no JSON object in scoring reply".to_string()))?;
    let payload: Value = serde_json::from_str(json)
        .map_err(|e| LeadScoutError::Parse(format!("invalid scoring JSON: {}", e)))?;

    let entries = payload
        .get("results")
        .and_then(Value::as_array)
        .ok_or_else(|| LeadScoutError::Parse("scoring reply has no results array".to_string()))?;

    let mut scores = HashMap::new();
    for entry in entries {
        let Some(index) = entry.get("index").and_then(as_index) else {
            tracing::debug!(?entry, "skipping score entry without usable index");
            continue;
        };
        if index >= candidate_count {
            tracing::debug!(index, candidate_count, "skipping out-of-range score entry");
            continue;
        }
        if scores.contains_key(&index) {
            continue;
        }
        scores.insert(index, decode_entry(entry));
    }

    Ok(scores)
}

fn decode_entry(entry: &Value) -> ScoreResult {
    let notes = entry
        .get("notes")
        .and_then(Value::as_str)
        .map(|n| truncate_chars(n.trim(), MAX_NOTES_CHARS).to_string())
        .unwrap_or_default();

    ScoreResult {
        match_score: field(entry, "match_score", "matchScore")
            .and_then(as_number)
            .map(clamp_match_score)
            .unwrap_or(0),
        license_match: flag(field(entry, "license_match", "licenseMatch")),
        cert_match: flag(field(entry, "cert_match", "certMatch")),
        experience_match: flag(field(entry, "experience_match", "experienceMatch")),
        location_match: flag(field(entry, "location_match", "locationMatch")),
        notes,
    }
}

/// Schema key, or the camelCase spelling some models substitute
fn field<'a>(entry: &'a Value, key: &str, camel: &str) -> Option<&'a Value> {
    entry.get(key).or_else(|| entry.get(camel))
}

fn as_index(value: &Value) -> Option<usize> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| usize::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => matches!(s.trim().to_lowercase().as_str(), "true" | "yes" | "1"),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        _ => false,
    }
}
