//! HTTP-based candidate scorer using external LLM service

use super::{CandidateScorer, ChatMessage, HttpLLMClient, LLMClient};
use crate::candidate::{RankedCandidate, ScoreResult};
use crate::config::LLMServiceConfig;
use crate::error::{LeadScoutError, Result};
use crate::outcome::{Degradation, Outcome, Stage};
use crate::scoring::{build_scoring_prompt, decode_scores, score_tool, SCORE_TOOL_NAME, SYSTEM_PROMPT};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Scorer using a forced `score_candidates` tool call
pub struct HttpScorer {
    client: Arc<dyn LLMClient>,
}

impl HttpScorer {
    /// Create from LLM client
    pub fn new(client: Arc<dyn LLMClient>) -> Self {
        Self { client }
    }

    /// Create from configuration
    pub fn from_config(config: LLMServiceConfig) -> Result<Self> {
        let client = HttpLLMClient::new(config)?;
        Ok(Self::new(Arc::new(client)))
    }

    async fn request_scores(
        &self,
        candidates: &[RankedCandidate],
        requirement: &str,
    ) -> Result<HashMap<usize, ScoreResult>> {
        let messages = vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(build_scoring_prompt(candidates, requirement)),
        ];

        let reply = self
            .client
            .chat_with_tools(messages, vec![score_tool()], Some(SCORE_TOOL_NAME))
            .await?;

        if let Some(name) = reply.function.as_deref() {
            if name != SCORE_TOOL_NAME {
                return Err(LeadScoutError::Parse(format!(
                    "model called unexpected function '{}'",
                    name
                )));
            }
        }

        match (reply.arguments, reply.content) {
            (Some(arguments), _) => decode_scores(&arguments, candidates.len()),
            (None, Some(content)) => {
                tracing::debug!("scoring reply came back as content, decoding embedded JSON");
                decode_scores(&content, candidates.len())
            }
            (None, None) => Err(LeadScoutError::Parse(
                "model returned neither a tool call nor content".to_string(),
            )),
        }
    }
}

#[async_trait]
impl CandidateScorer for HttpScorer {
    async fn score(
        &self,
        candidates: &[RankedCandidate],
        requirement: &str,
    ) -> Outcome<HashMap<usize, ScoreResult>> {
        if candidates.is_empty() {
            return Outcome::Enhanced(HashMap::new());
        }

        match self.request_scores(candidates, requirement).await {
            Ok(scores) => {
                tracing::info!(
                    candidates = candidates.len(),
                    scored = scores.len(),
                    "candidates scored"
                );
                Outcome::Enhanced(scores)
            }
            Err(e) => {
                tracing::warn!(error = %e, "scoring failed, returning unscored candidates");
                Outcome::fallback(HashMap::new(), Degradation::from_error(Stage::Scoring, &e))
            }
        }
    }

    fn model_name(&self) -> &str {
        self.client.model_name()
    }
}
