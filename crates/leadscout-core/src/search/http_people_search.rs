//! HTTP client for a neural people-search index

use super::{decode_results, PeopleSearch, RawResult, MAX_RESULTS, MIN_RESULTS};
use crate::config::SearchServiceConfig;
use crate::error::{LeadScoutError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::{Duration, Instant};

/// Search request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequestBody<'a> {
    query: &'a str,
    #[serde(rename = "type")]
    search_type: &'static str,
    category: &'static str,
    num_results: usize,
    contents: Contents,
}

#[derive(Debug, Serialize)]
struct Contents {
    text: TextContents,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TextContents {
    max_characters: usize,
}

/// People search over HTTP (`type: neural`, `category: people`)
pub struct HttpPeopleSearch {
    client: Client,
    url: String,
    api_key: String,
}

impl HttpPeopleSearch {
    /// Create from configuration; the API key is required
    pub fn new(config: &SearchServiceConfig) -> Result<Self> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            LeadScoutError::Config("search API key is not configured".to_string())
        })?;

        let client = Client::builder()
            .user_agent(concat!("leadscout/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            url: config.url.clone(),
            api_key,
        })
    }
}

#[async_trait]
impl PeopleSearch for HttpPeopleSearch {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
        max_characters: usize,
    ) -> Result<Vec<RawResult>> {
        let body = SearchRequestBody {
            query,
            search_type: "neural",
            category: "people",
            num_results: max_results.clamp(MIN_RESULTS, MAX_RESULTS),
            contents: Contents {
                text: TextContents { max_characters },
            },
        };

        let start = Instant::now();
        let response = self
            .client
            .post(&self.url)
            .header("x-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                let message = if e.is_timeout() {
                    "request timed out".to_string()
                } else if e.is_connect() {
                    format!("cannot reach search service: {}", e)
                } else {
                    e.to_string()
                };
                LeadScoutError::UpstreamSearch {
                    status: None,
                    message,
                }
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| LeadScoutError::UpstreamSearch {
            status: Some(status.as_u16()),
            message: format!("failed to read response body: {}", e),
        })?;

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), body = %text, "search service error body");
            return Err(LeadScoutError::UpstreamSearch {
                status: Some(status.as_u16()),
                message: format!("HTTP {}", status),
            });
        }

        let results = decode_results(&text).map_err(|e| LeadScoutError::UpstreamSearch {
            status: Some(status.as_u16()),
            message: format!("malformed response: {}", e),
        })?;

        tracing::info!(
            results = results.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "people search completed"
        );

        Ok(results)
    }
}
