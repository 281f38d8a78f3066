//! Error types for leadscout

use thiserror::Error;

/// Result type alias using LeadScoutError
pub type Result<T> = std::result::Result<T, LeadScoutError>;

/// Error type alias for convenience
pub type Error = LeadScoutError;

/// Exit codes for CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const INVALID_INPUT: i32 = 3;
    pub const RATE_LIMITED: i32 = 4;
    pub const CONFIG_ERROR: i32 = 5;
    pub const UPSTREAM_ERROR: i32 = 6;
}

/// Main error type for leadscout
#[derive(Debug, Error)]
pub enum LeadScoutError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Rate limit exceeded for {caller}: {limit} searches per window")]
    RateLimitExceeded { caller: String, limit: u32 },

    #[error("Search service error: {message}")]
    UpstreamSearch { status: Option<u16>, message: String },

    #[error("LLM service rate limited: {0}")]
    LlmRateLimited(String),

    #[error("LLM service quota exhausted: {0}")]
    LlmQuotaExhausted(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl LeadScoutError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidInput(_) => exit_codes::INVALID_INPUT,
            Self::RateLimitExceeded { .. } => exit_codes::RATE_LIMITED,
            Self::Config(_) => exit_codes::CONFIG_ERROR,
            Self::UpstreamSearch { .. }
            | Self::LlmRateLimited(_)
            | Self::LlmQuotaExhausted(_)
            | Self::Llm(_)
            | Self::Http(_) => exit_codes::UPSTREAM_ERROR,
            _ => exit_codes::GENERAL_ERROR,
        }
    }

    /// HTTP-style status used by the response contract
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput(_) => 400,
            Self::LlmQuotaExhausted(_) => 402,
            Self::RateLimitExceeded { .. } | Self::LlmRateLimited(_) => 429,
            Self::UpstreamSearch { .. } | Self::Llm(_) | Self::Http(_) => 502,
            _ => 500,
        }
    }

    /// Stable machine-readable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Database(_) => "database_error",
            Self::Io(_) => "io_error",
            Self::Config(_) => "configuration_error",
            Self::InvalidInput(_) => "validation_error",
            Self::RateLimitExceeded { .. } => "rate_limited",
            Self::UpstreamSearch { .. } => "upstream_search_error",
            Self::LlmRateLimited(_) => "llm_rate_limited",
            Self::LlmQuotaExhausted(_) => "llm_quota_exhausted",
            Self::Llm(_) => "llm_error",
            Self::Parse(_) | Self::Serialization(_) | Self::Yaml(_) => "parse_error",
            Self::Http(_) => "http_error",
            Self::Regex(_) | Self::Other(_) => "internal_error",
        }
    }
}
