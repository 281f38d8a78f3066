//! Candidate discovery pipeline
//!
//! One run goes:
//! 1. Rate limit check (denial is terminal)
//! 2. Query expansion (best effort)
//! 3. People search (failure is fatal)
//! 4. Parsing until the profile's target count survives
//! 5. Credential extraction
//! 6. Batch scoring (best effort)
//! 7. Stable ranking

mod response;

pub use response::PipelineResponse;

use crate::candidate::{extract_credentials, parse_result, RankedCandidate};
use crate::config::{Config, PipelineProfile, ProfilesConfig, QuotaConfig};
use crate::error::{LeadScoutError, Result};
use crate::llm::{
    CandidateScorer, HttpLLMClient, HttpQueryExpander, HttpScorer, MetricsSnapshot, QueryExpander,
};
use crate::outcome::Degradation;
use crate::ratelimit::{CallerKey, RateDecision, RateLimiter, Tier};
use crate::search::{HttpPeopleSearch, PeopleSearch, RawResult};
use serde::Serialize;
use std::cmp::Reverse;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::Instrument;

/// Query length bounds, in characters after trimming
pub const MIN_QUERY_CHARS: usize = 3;
pub const MAX_QUERY_CHARS: usize = 300;

/// Validated discovery request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    query: String,
    caller: CallerKey,
}

impl SearchRequest {
    /// Trim and length-check the query
    pub fn new(query: impl AsRef<str>, caller: CallerKey) -> Result<Self> {
        let query = query.as_ref().trim();
        let len = query.chars().count();
        if len < MIN_QUERY_CHARS {
            return Err(LeadScoutError::InvalidInput(format!(
                "query must be at least {} characters",
                MIN_QUERY_CHARS
            )));
        }
        if len > MAX_QUERY_CHARS {
            return Err(LeadScoutError::InvalidInput(format!(
                "query must be at most {} characters",
                MAX_QUERY_CHARS
            )));
        }
        Ok(Self {
            query: query.to_string(),
            caller,
        })
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn caller(&self) -> &CallerKey {
        &self.caller
    }
}

/// Successful pipeline output
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Discovery {
    pub leads: Vec<RankedCandidate>,
    pub expanded_query: String,
    pub degraded: Vec<Degradation>,
}

impl ProfilesConfig {
    /// Profile used for a caller tier
    pub fn for_tier(&self, tier: Tier) -> PipelineProfile {
        match tier {
            Tier::Anonymous => self.lightweight,
            Tier::Authenticated => self.full,
        }
    }
}

/// Discovery pipeline over pluggable components
pub struct Pipeline {
    rate_limiter: Arc<dyn RateLimiter>,
    expander: Arc<dyn QueryExpander>,
    search: Arc<dyn PeopleSearch>,
    scorer: Arc<dyn CandidateScorer>,
    quotas: QuotaConfig,
    profiles: ProfilesConfig,
    llm: Option<Arc<HttpLLMClient>>,
}

impl Pipeline {
    /// Create with default quotas and profiles
    pub fn new(
        rate_limiter: Arc<dyn RateLimiter>,
        expander: Arc<dyn QueryExpander>,
        search: Arc<dyn PeopleSearch>,
        scorer: Arc<dyn CandidateScorer>,
    ) -> Self {
        Self {
            rate_limiter,
            expander,
            search,
            scorer,
            quotas: QuotaConfig::default(),
            profiles: ProfilesConfig::default(),
            llm: None,
        }
    }

    pub fn with_quotas(mut self, quotas: QuotaConfig) -> Self {
        self.quotas = quotas;
        self
    }

    pub fn with_profiles(mut self, profiles: ProfilesConfig) -> Self {
        self.profiles = profiles;
        self
    }

    /// Build the HTTP-backed pipeline; both API keys must be configured
    pub fn from_config(config: &Config, rate_limiter: Arc<dyn RateLimiter>) -> Result<Self> {
        config.require_credentials()?;

        let client = Arc::new(HttpLLMClient::new(config.llm_service.clone())?);
        let expander = HttpQueryExpander::new(client.clone()).with_timeout(Duration::from_secs(
            config.llm_service.expansion_timeout_secs,
        ));
        let scorer = HttpScorer::new(client.clone());
        let search = HttpPeopleSearch::new(&config.search_service)?;

        let mut pipeline = Self::new(
            rate_limiter,
            Arc::new(expander),
            Arc::new(search),
            Arc::new(scorer),
        )
        .with_quotas(config.quotas.clone())
        .with_profiles(config.profiles.clone());
        pipeline.llm = Some(client);
        Ok(pipeline)
    }

    pub fn quotas(&self) -> &QuotaConfig {
        &self.quotas
    }

    /// Call counters of the shared LLM client, when built from configuration
    pub fn llm_metrics(&self) -> Option<MetricsSnapshot> {
        self.llm.as_ref().map(|client| client.metrics())
    }

    /// Run the pipeline for a validated request
    pub async fn run(&self, request: &SearchRequest) -> Result<Discovery> {
        let span = tracing::info_span!("discover", caller = %request.caller());
        self.run_stages(request).instrument(span).await
    }

    async fn run_stages(&self, request: &SearchRequest) -> Result<Discovery> {
        let start = Instant::now();
        let caller = request.caller();
        let tier = caller.tier();
        let limit = self.quotas.limit_for(tier);

        match self
            .rate_limiter
            .check_and_increment(caller, limit, self.quotas.window_days)?
        {
            RateDecision::Allowed { count, remaining } => {
                tracing::info!(count, remaining, "rate limit check passed");
            }
            RateDecision::Denied { limit, count } => {
                tracing::info!(limit, count, "rate limit exceeded");
                return Err(LeadScoutError::RateLimitExceeded {
                    caller: caller.storage_key(),
                    limit,
                });
            }
        }

        let profile = self.profiles.for_tier(tier);
        let mut degraded = Vec::new();

        let (expanded_query, reason) = self.expander.expand(request.query()).await.into_parts();
        if let Some(reason) = reason {
            tracing::warn!(stage = %reason.stage, code = %reason.code, "{}", reason.message);
            degraded.push(reason);
        }

        let raw = self
            .search
            .search(&expanded_query, profile.max_results, profile.max_characters)
            .await?;
        tracing::info!(raw_results = raw.len(), "search completed");

        let mut leads = collect_candidates(&raw, profile.target_candidates);
        tracing::info!(
            candidates = leads.len(),
            dropped = raw.len().saturating_sub(leads.len()),
            "parsed candidates"
        );

        let (scores, reason) = self
            .scorer
            .score(&leads, request.query())
            .await
            .into_parts();
        if let Some(reason) = reason {
            tracing::warn!(stage = %reason.stage, code = %reason.code, "{}", reason.message);
            degraded.push(reason);
        }

        for (index, score) in scores {
            if let Some(lead) = leads.get_mut(index) {
                lead.score = Some(score);
            }
        }
        rank_candidates(&mut leads);

        tracing::info!(
            leads = leads.len(),
            degraded = degraded.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "discovery completed"
        );

        Ok(Discovery {
            leads,
            expanded_query,
            degraded,
        })
    }

    /// Run and shape the external response
    pub async fn respond(&self, request: &SearchRequest) -> PipelineResponse {
        PipelineResponse::from_result(self.run(request).await)
    }

    /// Validate raw input, then run and shape the response
    pub async fn respond_to_query(&self, query: &str, caller: CallerKey) -> PipelineResponse {
        match SearchRequest::new(query, caller) {
            Ok(request) => self.respond(&request).await,
            Err(e) => PipelineResponse::from_error(&e),
        }
    }
}

/// Parse raw results in order, stopping once `target` candidates survive
///
/// Credentials are extracted from each survivor's summary and title.
pub fn collect_candidates(raw: &[RawResult], target: usize) -> Vec<RankedCandidate> {
    raw.iter()
        .filter_map(parse_result)
        .take(target)
        .map(|candidate| {
            let credentials = extract_credentials(&candidate.credential_text());
            RankedCandidate::new(candidate, credentials)
        })
        .collect()
}

/// Scored candidates by descending score, then unscored in discovery order
pub fn rank_candidates(leads: &mut [RankedCandidate]) {
    // Stable; `None` sorts below every `Some`
    leads.sort_by_key(|lead| Reverse(lead.match_score()));
}
