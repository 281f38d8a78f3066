//! HTTP-based query expander using external LLM service

use super::{ChatMessage, HttpLLMClient, LLMClient, QueryExpander};
use crate::config::LLMServiceConfig;
use crate::error::Result;
use crate::outcome::{Degradation, Outcome, Stage};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Expanded queries must be strictly longer than this
pub const MIN_EXPANDED_CHARS: usize = 5;

/// Expanded queries must be strictly shorter than this
pub const MAX_EXPANDED_CHARS: usize = 300;

const DEFAULT_EXPANSION_TIMEOUT_SECS: u64 = 8;

const SYSTEM_PROMPT: &str = "You rewrite recruiter requests into a single optimized people-search query \
for finding healthcare professionals' public profiles. Include role synonyms, relevant license and \
certification abbreviations, and location variants. Output ONLY the query text on one line, with no \
quotes, labels or explanation.";

/// Query expander using external HTTP LLM service
pub struct HttpQueryExpander {
    client: Arc<dyn LLMClient>,
    timeout: Duration,
}

impl HttpQueryExpander {
    /// Create from LLM client
    pub fn new(client: Arc<dyn LLMClient>) -> Self {
        Self {
            client,
            timeout: Duration::from_secs(DEFAULT_EXPANSION_TIMEOUT_SECS),
        }
    }

    /// Bound the expansion call
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Create from configuration
    pub fn from_config(config: LLMServiceConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.expansion_timeout_secs);
        let client = HttpLLMClient::new(config)?;
        Ok(Self::new(Arc::new(client)).with_timeout(timeout))
    }
}

#[async_trait]
impl QueryExpander for HttpQueryExpander {
    async fn expand(&self, query: &str) -> Outcome<String> {
        let messages = vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(format!("Recruiter request: {}", query)),
        ];

        let response =
            match tokio::time::timeout(self.timeout, self.client.chat_completion(messages)).await {
                Ok(Ok(response)) => response,
                Ok(Err(e)) => {
                    tracing::warn!(error = %e, "query expansion failed, using raw query");
                    return Outcome::fallback(
                        query.to_string(),
                        Degradation::from_error(Stage::Expansion, &e),
                    );
                }
                Err(_) => {
                    tracing::warn!(
                        timeout_secs = self.timeout.as_secs(),
                        "query expansion timed out, using raw query"
                    );
                    return Outcome::fallback(
                        query.to_string(),
                        Degradation::timeout(Stage::Expansion, self.timeout.as_secs()),
                    );
                }
            };

        match clean_expansion(&response) {
            Some(expanded) => {
                tracing::info!(raw = %query, expanded = %expanded, "query expanded");
                Outcome::Enhanced(expanded)
            }
            None => {
                tracing::warn!("query expansion produced unusable output, using raw query");
                tracing::debug!("Raw LLM response: {}", response);
                Outcome::fallback(
                    query.to_string(),
                    Degradation::new(
                        Stage::Expansion,
                        "invalid_output",
                        "expanded query was empty or out of bounds",
                    ),
                )
            }
        }
    }

    fn model_name(&self) -> &str {
        self.client.model_name()
    }
}

/// Strip fences, labels and quotes, then length-check
fn clean_expansion(response: &str) -> Option<String> {
    let mut text = response.trim();

    if let Some(inner) = text.strip_prefix("```") {
        // Drop an optional language tag on the fence line
        let inner = match inner.find('\n') {
            Some(pos) => &inner[pos + 1..],
            None => inner,
        };
        text = inner.trim_end().trim_end_matches("```").trim();
    }

    let text = text
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())?
        .trim_matches(|c| c == '"' || c == '\'' || c == '`')
        .trim();

    let len = text.chars().count();
    if len > MIN_EXPANDED_CHARS && len < MAX_EXPANDED_CHARS {
        Some(text.to_string())
    } else {
        None
    }
}
