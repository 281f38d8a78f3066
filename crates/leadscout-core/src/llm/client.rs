//! HTTP client for OpenAI-compatible chat completion services

use crate::config::LLMServiceConfig;
use crate::error::{LeadScoutError, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::sync::{atomic::AtomicU64, Arc};
use std::time::{Duration, Instant};

/// Trait for LLM service clients
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Generate a plain chat completion
    async fn chat_completion(&self, messages: Vec<ChatMessage>) -> Result<String>;

    /// Generate a completion that may answer through a tool call
    ///
    /// With `tool_choice` set, the service is asked to call that function.
    async fn chat_with_tools(
        &self,
        messages: Vec<ChatMessage>,
        tools: Vec<ToolDefinition>,
        tool_choice: Option<&str>,
    ) -> Result<ToolCallReply>;

    /// Get model name
    fn model_name(&self) -> &str;
}

/// Chat message for completion requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Function tool offered to the model
#[derive(Debug, Clone)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

impl ToolDefinition {
    fn to_request_value(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.parameters,
            }
        })
    }
}

/// What the model sent back for a tool-enabled request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolCallReply {
    /// Name of the called function, if any
    pub function: Option<String>,
    /// Raw JSON argument string of the first tool call
    pub arguments: Option<String>,
    /// Plain content when the model answered without calling a tool
    pub content: Option<String>,
}

/// API metrics for monitoring
#[derive(Debug, Default)]
pub struct APIMetrics {
    pub total_requests: AtomicU64,
    pub total_errors: AtomicU64,
    pub cache_hits: AtomicU64,
    pub total_latency_ms: AtomicU64,
}

/// Snapshot of API metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub total_requests: u64,
    pub total_errors: u64,
    pub cache_hits: u64,
    pub avg_latency_ms: f64,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<ResponseToolCall>,
}

#[derive(Deserialize)]
struct ResponseToolCall {
    function: ResponseFunction,
}

#[derive(Deserialize)]
struct ResponseFunction {
    name: String,
    #[serde(default)]
    arguments: String,
}

/// OpenAI-compatible chat client (`/v1/chat/completions`)
pub struct HttpLLMClient {
    http_client: reqwest::Client,
    config: LLMServiceConfig,
    cache: Arc<super::cache::LLMCache>,
    metrics: Arc<APIMetrics>,
}

impl HttpLLMClient {
    /// Create new client from configuration
    pub fn new(config: LLMServiceConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            config,
            cache: Arc::new(super::cache::LLMCache::new()),
            metrics: Arc::new(APIMetrics::default()),
        })
    }

    /// Get current API metrics
    pub fn metrics(&self) -> MetricsSnapshot {
        use std::sync::atomic::Ordering;

        let total = self.metrics.total_requests.load(Ordering::Relaxed);
        let hits = self.metrics.cache_hits.load(Ordering::Relaxed);
        let network = total.saturating_sub(hits);

        MetricsSnapshot {
            total_requests: total,
            total_errors: self.metrics.total_errors.load(Ordering::Relaxed),
            cache_hits: hits,
            avg_latency_ms: if network > 0 {
                self.metrics.total_latency_ms.load(Ordering::Relaxed) as f64 / network as f64
            } else {
                0.0
            },
        }
    }

    async fn send(&self, request: &ChatRequest<'_>) -> Result<ResponseMessage> {
        use std::sync::atomic::Ordering;

        let start = Instant::now();
        let url = format!("{}/v1/chat/completions", self.config.url.trim_end_matches('/'));

        let mut req = self.http_client.post(&url).json(request);
        if let Some(ref api_key) = self.config.api_key {
            req = req.header("Authorization", format!("Bearer {}", api_key));
        }

        let result = async {
            let response = req.send().await?;
            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(status_error(status, &body));
            }

            let chat_response: ChatResponse = response.json().await?;
            chat_response
                .choices
                .into_iter()
                .next()
                .map(|choice| choice.message)
                .ok_or_else(|| LeadScoutError::Llm("No response from LLM".to_string()))
        }
        .await;

        let elapsed = start.elapsed().as_millis() as u64;
        self.metrics
            .total_latency_ms
            .fetch_add(elapsed, Ordering::Relaxed);
        if result.is_err() {
            self.metrics.total_errors.fetch_add(1, Ordering::Relaxed);
        }
        tracing::debug!(model = %self.config.model, elapsed_ms = elapsed, ok = result.is_ok(), "chat completion");

        result
    }
}

/// Map a non-2xx status to an error, keeping 429 and 402 distinct
pub(crate) fn status_error(status: StatusCode, body: &str) -> LeadScoutError {
    let detail = format!("HTTP {}: {}", status.as_u16(), body.trim());
    match status {
        StatusCode::TOO_MANY_REQUESTS => LeadScoutError::LlmRateLimited(detail),
        StatusCode::PAYMENT_REQUIRED => LeadScoutError::LlmQuotaExhausted(detail),
        _ => LeadScoutError::Llm(format!("LLM service error ({})", detail)),
    }
}

#[async_trait]
impl LLMClient for HttpLLMClient {
    async fn chat_completion(&self, messages: Vec<ChatMessage>) -> Result<String> {
        use std::sync::atomic::Ordering;

        self.metrics.total_requests.fetch_add(1, Ordering::Relaxed);

        let messages_json = serde_json::to_string(&messages)?;
        let cache_key = super::cache::chat_cache_key(&self.config.model, &messages_json);

        if let Some(cached) = self.cache.get(&cache_key) {
            tracing::debug!("Cache hit for chat completion");
            self.metrics.cache_hits.fetch_add(1, Ordering::Relaxed);
            return Ok(cached);
        }

        let request = ChatRequest {
            model: &self.config.model,
            messages: &messages,
            temperature: 0.3,
            max_tokens: 512,
            tools: None,
            tool_choice: None,
        };

        let content = self
            .send(&request)
            .await?
            .content
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| LeadScoutError::Llm("Empty completion".to_string()))?;

        self.cache.set(cache_key, content.clone());
        Ok(content)
    }

    async fn chat_with_tools(
        &self,
        messages: Vec<ChatMessage>,
        tools: Vec<ToolDefinition>,
        tool_choice: Option<&str>,
    ) -> Result<ToolCallReply> {
        use std::sync::atomic::Ordering;

        self.metrics.total_requests.fetch_add(1, Ordering::Relaxed);

        let request = ChatRequest {
            model: &self.config.model,
            messages: &messages,
            temperature: 0.0,
            max_tokens: 4096,
            tools: Some(tools.iter().map(ToolDefinition::to_request_value).collect()),
            tool_choice: tool_choice.map(|name| {
                serde_json::json!({ "type": "function", "function": { "name": name } })
            }),
        };

        let message = self.send(&request).await?;
        let first_call = message.tool_calls.into_iter().next();

        Ok(ToolCallReply {
            function: first_call.as_ref().map(|c| c.function.name.clone()),
            arguments: first_call.map(|c| c.function.arguments),
            content: message.content.filter(|c| !c.trim().is_empty()),
        })
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
