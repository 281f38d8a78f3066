//! Best-effort stage results
//!
//! Query expansion and scoring must never fail a request. They return an
//! `Outcome`, which always carries a usable value and records whether that
//! value came from the enhancement or from the fallback path.

use crate::error::LeadScoutError;
use serde::Serialize;
use std::fmt;

/// Pipeline stage that is allowed to degrade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Expansion,
    Scoring,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Expansion => write!(f, "expansion"),
            Stage::Scoring => write!(f, "scoring"),
        }
    }
}

/// Why a best-effort stage fell back
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Degradation {
    pub stage: Stage,
    pub code: String,
    pub message: String,
}

impl Degradation {
    pub fn new(stage: Stage, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            stage,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Build from an upstream error, keeping its error code
    pub fn from_error(stage: Stage, err: &LeadScoutError) -> Self {
        Self::new(stage, err.error_code(), err.to_string())
    }

    pub fn timeout(stage: Stage, secs: u64) -> Self {
        Self::new(stage, "timeout", format!("{} timed out after {}s", stage, secs))
    }
}

/// Result of a best-effort stage
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Enhanced(T),
    Fallback { value: T, reason: Degradation },
}

impl<T> Outcome<T> {
    pub fn fallback(value: T, reason: Degradation) -> Self {
        Outcome::Fallback { value, reason }
    }

    pub fn value(&self) -> &T {
        match self {
            Outcome::Enhanced(value) | Outcome::Fallback { value, .. } => value,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Outcome::Fallback { .. })
    }

    pub fn reason(&self) -> Option<&Degradation> {
        match self {
            Outcome::Enhanced(_) => None,
            Outcome::Fallback { reason, .. } => Some(reason),
        }
    }

    /// Split into the value and the optional degradation
    pub fn into_parts(self) -> (T, Option<Degradation>) {
        match self {
            Outcome::Enhanced(value) => (value, None),
            Outcome::Fallback { value, reason } => (value, Some(reason)),
        }
    }
}
