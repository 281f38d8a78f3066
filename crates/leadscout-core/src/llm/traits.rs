//! LLM trait definitions

use crate::candidate::{RankedCandidate, ScoreResult};
use crate::outcome::Outcome;
use async_trait::async_trait;
use std::collections::HashMap;

/// Query expansion trait
///
/// Expansion is best effort: implementations return the input query as a
/// fallback instead of an error.
#[async_trait]
pub trait QueryExpander: Send + Sync {
    /// Rewrite a raw recruiter query into one people-search string
    async fn expand(&self, query: &str) -> Outcome<String>;

    /// Get model name
    fn model_name(&self) -> &str;
}

/// Candidate scoring trait
#[async_trait]
pub trait CandidateScorer: Send + Sync {
    /// Score a batch of unscored candidates against a requirement
    ///
    /// Keys of the returned map are indices into `candidates`. A fallback
    /// carries an empty map.
    async fn score(
        &self,
        candidates: &[RankedCandidate],
        requirement: &str,
    ) -> Outcome<HashMap<usize, ScoreResult>>;

    /// Get model name
    fn model_name(&self) -> &str;
}
