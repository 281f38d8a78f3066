//! Configuration management

use crate::error::{LeadScoutError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// LLM service configuration (query expansion and scoring)
    #[serde(default)]
    pub llm_service: LLMServiceConfig,

    /// People-search index configuration
    #[serde(default)]
    pub search_service: SearchServiceConfig,

    /// Daily quotas per caller tier
    #[serde(default)]
    pub quotas: QuotaConfig,

    /// Pipeline sizing per caller tier
    #[serde(default)]
    pub profiles: ProfilesConfig,
}

/// LLM service configuration for an OpenAI-compatible chat endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMServiceConfig {
    /// Base URL of the LLM service (without `/v1/chat/completions`)
    #[serde(default = "default_llm_url")]
    pub url: String,

    /// Model name for chat completions
    #[serde(default = "default_chat_model")]
    pub model: String,

    /// API key, sent as a bearer token
    #[serde(default = "default_llm_api_key")]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Upper bound for the query expansion call, which is best-effort
    #[serde(default = "default_expansion_timeout")]
    pub expansion_timeout_secs: u64,
}

impl Default for LLMServiceConfig {
    fn default() -> Self {
        Self {
            url: default_llm_url(),
            model: default_chat_model(),
            api_key: default_llm_api_key(),
            timeout_secs: default_timeout(),
            expansion_timeout_secs: default_expansion_timeout(),
        }
    }
}

fn default_llm_url() -> String {
    std::env::var("LEADSCOUT_LLM_URL").unwrap_or_else(|_| "https://api.openai.com".to_string())
}

fn default_chat_model() -> String {
    std::env::var("LEADSCOUT_LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string())
}

fn default_llm_api_key() -> Option<String> {
    std::env::var("LEADSCOUT_LLM_API_KEY").ok().filter(|k| !k.is_empty())
}

fn default_timeout() -> u64 {
    30
}

fn default_expansion_timeout() -> u64 {
    8
}

/// Semantic people-search index configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchServiceConfig {
    /// Full URL of the search endpoint
    #[serde(default = "default_search_url")]
    pub url: String,

    /// API key, sent as `x-api-key`
    #[serde(default = "default_search_api_key")]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for SearchServiceConfig {
    fn default() -> Self {
        Self {
            url: default_search_url(),
            api_key: default_search_api_key(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_search_url() -> String {
    std::env::var("LEADSCOUT_SEARCH_URL").unwrap_or_else(|_| "https://api.exa.ai/search".to_string())
}

fn default_search_api_key() -> Option<String> {
    std::env::var("LEADSCOUT_SEARCH_API_KEY").ok().filter(|k| !k.is_empty())
}

/// Searches allowed per caller per window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaConfig {
    #[serde(default = "default_anonymous_quota")]
    pub anonymous_per_day: u32,

    #[serde(default = "default_authenticated_quota")]
    pub authenticated_per_day: u32,

    /// Window length in days
    #[serde(default = "default_window_days")]
    pub window_days: u32,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            anonymous_per_day: default_anonymous_quota(),
            authenticated_per_day: default_authenticated_quota(),
            window_days: default_window_days(),
        }
    }
}

fn default_anonymous_quota() -> u32 {
    3
}

fn default_authenticated_quota() -> u32 {
    50
}

fn default_window_days() -> u32 {
    1
}

/// Sizing of one pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineProfile {
    /// Raw results requested from the search index
    pub max_results: usize,
    /// Parsing stops once this many candidates survive
    pub target_candidates: usize,
    /// Character cap on the text returned per result
    pub max_characters: usize,
}

impl PipelineProfile {
    /// Anonymous, landing-page sized search
    pub fn lightweight() -> Self {
        Self {
            max_results: 10,
            target_candidates: 5,
            max_characters: 1000,
        }
    }

    /// Authenticated dashboard search
    pub fn full() -> Self {
        Self {
            max_results: 25,
            target_candidates: 15,
            max_characters: 2000,
        }
    }
}

/// Profiles per caller tier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfilesConfig {
    #[serde(default = "PipelineProfile::lightweight")]
    pub lightweight: PipelineProfile,

    #[serde(default = "PipelineProfile::full")]
    pub full: PipelineProfile,
}

impl Default for ProfilesConfig {
    fn default() -> Self {
        Self {
            lightweight: PipelineProfile::lightweight(),
            full: PipelineProfile::full(),
        }
    }
}

impl Config {
    /// Load config from `LEADSCOUT_CONFIG` or the default path
    pub fn load() -> Result<Self> {
        let path = std::env::var("LEADSCOUT_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| Self::default_path());
        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            Self::from_yaml_str(&content)
        } else {
            Ok(Config::default())
        }
    }

    /// Parse config from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::CONFIG_DIR_NAME)
            .join("config.yml")
    }

    /// Reject sizes that would make every run empty
    pub fn validate(&self) -> Result<()> {
        for (name, profile) in [
            ("lightweight", &self.profiles.lightweight),
            ("full", &self.profiles.full),
        ] {
            if profile.max_results == 0 || profile.target_candidates == 0 {
                return Err(LeadScoutError::Config(format!(
                    "profile '{}' must request at least one result and one candidate",
                    name
                )));
            }
        }
        if self.quotas.window_days == 0 {
            return Err(LeadScoutError::Config(
                "quotas.window_days must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Both upstream credentials must be present before any pipeline runs
    pub fn require_credentials(&self) -> Result<()> {
        if self.search_service.api_key.is_none() {
            return Err(LeadScoutError::Config(
                "search API key is not configured (set LEADSCOUT_SEARCH_API_KEY)".to_string(),
            ));
        }
        if self.llm_service.api_key.is_none() {
            return Err(LeadScoutError::Config(
                "LLM API key is not configured (set LEADSCOUT_LLM_API_KEY)".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles_default_when_omitted() {
        let config = Config::from_yaml_str("quotas:\n  anonymous_per_day: 7\n").unwrap();
        assert_eq!(config.quotas.anonymous_per_day, 7);
        assert_eq!(config.quotas.authenticated_per_day, 50);
        assert_eq!(config.profiles.lightweight, PipelineProfile::lightweight());
        assert_eq!(config.profiles.full.max_results, 25);
    }

    #[test]
    fn test_zero_sized_profile_rejected() {
        let yaml = "profiles:\n  lightweight:\n    max_results: 0\n    target_candidates: 5\n    max_characters: 100\n";
        let err = Config::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, LeadScoutError::Config(_)));
    }

    #[test]
    fn test_require_credentials() {
        let mut config = Config::default();
        config.search_service.api_key = None;
        config.llm_service.api_key = Some("sk-test".into());
        assert!(matches!(
            config.require_credentials(),
            Err(LeadScoutError::Config(_))
        ));

        config.search_service.api_key = Some("exa-test".into());
        assert!(config.require_credentials().is_ok());
    }
}
