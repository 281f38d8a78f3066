//! LeadScout Core Library
//!
//! Discovery and qualification of healthcare candidates from public
//! professional profiles.
//!
//! # Features
//! - Semantic people search with LLM query expansion
//! - Layered, deterministic parsing of search results into candidates
//! - Rule-based license, certification and specialty extraction
//! - LLM match scoring through a forced tool call with a strict decoder
//! - Atomic per-caller quotas backed by SQLite

pub mod candidate;
pub mod config;
pub mod db;
pub mod error;
pub mod llm;
pub mod outcome;
pub mod pipeline;
pub mod ratelimit;
pub mod scoring;
pub mod search;
pub mod text;

pub use candidate::{
    extract_credentials, parse_result, CredentialProfile, ParsedCandidate, RankedCandidate,
    ScoreResult,
};
pub use config::{Config, LLMServiceConfig, PipelineProfile, QuotaConfig, SearchServiceConfig};
pub use db::{Database, QuotaUsage};
pub use error::{Error, LeadScoutError, Result};
pub use llm::{
    CandidateScorer, ChatMessage, HttpLLMClient, HttpQueryExpander, HttpScorer, LLMClient,
    MetricsSnapshot, QueryExpander,
};
pub use outcome::{Degradation, Outcome, Stage};
pub use pipeline::{Discovery, Pipeline, PipelineResponse, SearchRequest};
pub use ratelimit::{CallerKey, RateDecision, RateLimiter, SqliteRateLimiter, Tier, UsageReport};
pub use search::{decode_results, HttpPeopleSearch, PeopleSearch, RawResult};

/// Default cache directory name
pub const CACHE_DIR_NAME: &str = "leadscout";

/// Default config directory name
pub const CONFIG_DIR_NAME: &str = "leadscout";
