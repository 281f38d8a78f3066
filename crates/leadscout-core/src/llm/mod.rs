//! LLM integration
//!
//! Provides traits and implementations for:
//! - Chat completions against OpenAI-compatible services
//! - Query expansion
//! - Candidate scoring through a forced tool call

mod cache;
mod client;
mod http_query_expander;
mod http_scorer;
mod traits;

pub use cache::{chat_cache_key, LLMCache};
pub use client::{
    APIMetrics, ChatMessage, HttpLLMClient, LLMClient, MetricsSnapshot, ToolCallReply,
    ToolDefinition,
};
pub use http_query_expander::{HttpQueryExpander, MAX_EXPANDED_CHARS, MIN_EXPANDED_CHARS};
pub use http_scorer::HttpScorer;
pub use traits::*;
