//! Candidate records produced by the discovery pipeline
//!
//! Provides:
//! - Layered parsing of raw search results into candidates
//! - Location and experience recovery from free text
//! - Healthcare credential extraction

pub mod credentials;
pub mod location;
pub mod parser;

pub use credentials::extract_credentials;
pub use parser::{is_profile_url, parse_result};

use serde::{Deserialize, Serialize};

/// A profile that survived parsing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedCandidate {
    pub name: String,
    pub profile_url: String,
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub years_experience: Option<u32>,
    pub summary: String,
}

impl ParsedCandidate {
    /// Text scanned for credentials: summary followed by title
    pub fn credential_text(&self) -> String {
        match self.title {
            Some(ref title) => format!("{} {}", self.summary, title),
            None => self.summary.clone(),
        }
    }
}

/// Licenses, certifications and specialty labels found for a candidate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialProfile {
    pub certifications: Option<String>,
    pub licenses: Option<String>,
    pub specialty: Option<String>,
}

impl CredentialProfile {
    pub fn is_empty(&self) -> bool {
        self.certifications.is_none() && self.licenses.is_none() && self.specialty.is_none()
    }
}

/// Per-candidate score returned by the scoring model, already clamped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub match_score: u8,
    pub license_match: bool,
    pub cert_match: bool,
    pub experience_match: bool,
    pub location_match: bool,
    pub notes: String,
}

/// Upper bound of the additive match score
pub const MAX_MATCH_SCORE: u8 = 100;

/// Clamp any model-provided number into `0..=100`, rounding to nearest
pub fn clamp_match_score(raw: f64) -> u8 {
    if raw.is_nan() {
        return 0;
    }
    raw.round().clamp(0.0, MAX_MATCH_SCORE as f64) as u8
}

/// Unit returned to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    #[serde(flatten)]
    pub candidate: ParsedCandidate,
    #[serde(flatten)]
    pub credentials: CredentialProfile,
    #[serde(flatten)]
    pub score: Option<ScoreResult>,
}

impl RankedCandidate {
    pub fn new(candidate: ParsedCandidate, credentials: CredentialProfile) -> Self {
        Self {
            candidate,
            credentials,
            score: None,
        }
    }

    pub fn match_score(&self) -> Option<u8> {
        self.score.as_ref().map(|s| s.match_score)
    }
}
