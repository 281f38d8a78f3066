//! MCP tool definitions and handlers

use crate::protocol::*;
use anyhow::Result;
use leadscout_core::{
    extract_credentials, CallerKey, Config, LeadScoutError, Pipeline, PipelineResponse,
    QuotaConfig, RankedCandidate, SqliteRateLimiter,
};
use serde_json::Value;
use std::sync::Arc;

/// Shared state for tool handlers
pub struct ToolContext {
    pipeline: std::result::Result<Pipeline, LeadScoutError>,
    limiter: Arc<SqliteRateLimiter>,
    quotas: QuotaConfig,
}

impl ToolContext {
    /// `pipeline` may be an error (e.g. missing API keys); discovery then
    /// reports it while the offline tools keep working.
    pub fn new(
        pipeline: std::result::Result<Pipeline, LeadScoutError>,
        limiter: Arc<SqliteRateLimiter>,
        quotas: QuotaConfig,
    ) -> Self {
        Self {
            pipeline,
            limiter,
            quotas,
        }
    }

    /// Build the HTTP-backed pipeline from configuration
    pub fn from_config(config: &Config, limiter: Arc<SqliteRateLimiter>) -> Self {
        let pipeline = Pipeline::from_config(config, limiter.clone());
        if let Err(ref e) = pipeline {
            tracing::warn!("Discovery unavailable: {}", e);
        }
        Self::new(pipeline, limiter, config.quotas.clone())
    }
}

/// Every tool, in `tools/list` order
pub fn definitions() -> Vec<ToolDefinition> {
    vec![
        discover_tool_definition(),
        extract_tool_definition(),
        quota_tool_definition(),
    ]
}

pub fn discover_tool_definition() -> ToolDefinition {
    ToolDefinition {
        name: "discover_candidates",
        description: "Find and rank healthcare candidates from public professional profiles for a recruiter request",
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Recruiter request, e.g. \"ICU nurse with CCRN in Los Angeles\" (3-300 characters)"
                },
                "ip": {
                    "type": "string",
                    "description": "Client address for anonymous quota accounting"
                },
                "userId": {
                    "type": "string",
                    "description": "Authenticated user id (uses the full profile and higher quota)"
                }
            },
            "required": ["query"]
        }),
    }
}

pub fn extract_tool_definition() -> ToolDefinition {
    ToolDefinition {
        name: "extract_credentials",
        description: "Extract licenses, certifications and specialties from free text",
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "text": {
                    "type": "string",
                    "description": "Profile text, headline or resume snippet"
                }
            },
            "required": ["text"]
        }),
    }
}

pub fn quota_tool_definition() -> ToolDefinition {
    ToolDefinition {
        name: "quota_status",
        description: "Show searches used and remaining in the current quota window",
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "ip": {
                    "type": "string",
                    "description": "Client address (anonymous tier)"
                },
                "userId": {
                    "type": "string",
                    "description": "User id (authenticated tier)"
                }
            }
        }),
    }
}

fn caller_from_args(args: &Value) -> CallerKey {
    CallerKey::from_parts(
        args.get("ip").and_then(|v| v.as_str()),
        args.get("userId").and_then(|v| v.as_str()),
    )
}

pub async fn handle_discover(ctx: &ToolContext, args: Value) -> Result<ToolResult> {
    let query = args
        .get("query")
        .and_then(|v| v.as_str())
        .ok_or_else(|| anyhow::anyhow!("Missing query parameter"))?;
    let caller = caller_from_args(&args);

    let response = match ctx.pipeline {
        Ok(ref pipeline) => pipeline.respond_to_query(query, caller).await,
        Err(ref e) => PipelineResponse::from_error(e),
    };

    let summary = if response.success {
        format_leads(
            response.leads.as_deref().unwrap_or_default(),
            response.expanded_query.as_deref().unwrap_or(query),
        )
    } else {
        format!(
            "Error ({}): {}",
            response.code.as_deref().unwrap_or("internal_error"),
            response.error.as_deref().unwrap_or("unknown error")
        )
    };

    let result = ToolResult::structured(summary, serde_json::to_value(&response)?);
    Ok(if response.success { result } else { result.failed() })
}

fn format_leads(leads: &[RankedCandidate], expanded_query: &str) -> String {
    let mut text = format!("Found {} leads for \"{}\"\n", leads.len(), expanded_query);

    for (i, lead) in leads.iter().enumerate() {
        let c = &lead.candidate;
        let score = lead
            .match_score()
            .map(|s| format!(" [{}]", s))
            .unwrap_or_default();
        text.push_str(&format!("\n{}. {}{}", i + 1, c.name, score));

        let role: Vec<&str> = [c.title.as_deref(), c.company.as_deref(), c.location.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        if !role.is_empty() {
            text.push_str(&format!(" - {}", role.join(", ")));
        }

        let creds: Vec<&str> = [
            lead.credentials.licenses.as_deref(),
            lead.credentials.certifications.as_deref(),
            lead.credentials.specialty.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect();
        if !creds.is_empty() {
            text.push_str(&format!("\n   Credentials: {}", creds.join("; ")));
        }
        text.push_str(&format!("\n   {}", c.profile_url));
    }

    text
}

pub async fn handle_extract(args: Value) -> Result<ToolResult> {
    let text = args
        .get("text")
        .and_then(|v| v.as_str())
        .ok_or_else(|| anyhow::anyhow!("Missing text parameter"))?;

    let profile = extract_credentials(text);

    let summary = if profile.is_empty() {
        "No credentials found".to_string()
    } else {
        format!(
            "Licenses: {}\nCertifications: {}\nSpecialty: {}",
            profile.licenses.as_deref().unwrap_or("-"),
            profile.certifications.as_deref().unwrap_or("-"),
            profile.specialty.as_deref().unwrap_or("-"),
        )
    };

    Ok(ToolResult::structured(summary, serde_json::to_value(&profile)?))
}

pub async fn handle_quota(ctx: &ToolContext, args: Value) -> Result<ToolResult> {
    let caller = caller_from_args(&args);
    let report = ctx.limiter.report(&caller, &ctx.quotas)?;

    let summary = format!(
        "{}: {}/{} searches used in the window starting {} ({} remaining)",
        report.caller, report.used, report.limit, report.window_start, report.remaining
    );

    Ok(ToolResult::structured(summary, serde_json::to_value(&report)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadscout_core::{CredentialProfile, ParsedCandidate, ScoreResult};

    #[test]
    fn test_format_leads() {
        let mut lead = RankedCandidate::new(
            ParsedCandidate {
                name: "Maria Lopez".into(),
                profile_url: "https://www.linkedin.com/in/maria-lopez".into(),
                title: Some("ER Nurse".into()),
                company: Some("Jackson Health".into()),
                location: None,
                years_experience: None,
                summary: String::new(),
            },
            CredentialProfile {
                licenses: Some("RN".into()),
                certifications: Some("BLS, ACLS".into()),
                specialty: None,
            },
        );
        lead.score = Some(ScoreResult {
            match_score: 88,
            license_match: true,
            cert_match: true,
            experience_match: true,
            location_match: false,
            notes: String::new(),
        });

        let text = format_leads(&[lead], "ER nurse Miami");
        assert!(text.starts_with("Found 1 leads for \"ER nurse Miami\""));
        assert!(text.contains("1. Maria Lopez [88] - ER Nurse, Jackson Health"));
        assert!(text.contains("Credentials: RN; BLS, ACLS"));
    }

    #[test]
    fn test_tool_schemas_require_inputs() {
        assert_eq!(discover_tool_definition().input_schema["required"][0], "query");
        assert_eq!(extract_tool_definition().input_schema["required"][0], "text");
        assert!(quota_tool_definition().input_schema.get("required").is_none());
    }
}
