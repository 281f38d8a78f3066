//! External response contract

use super::Discovery;
use crate::candidate::RankedCandidate;
use crate::error::{LeadScoutError, Result};
use crate::outcome::Degradation;
use serde::Serialize;

/// Response returned to API and MCP callers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leads: Option<Vec<RankedCandidate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expanded_query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degraded: Option<Vec<Degradation>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub status: u16,
}

impl PipelineResponse {
    pub fn from_discovery(discovery: Discovery) -> Self {
        Self {
            success: true,
            leads: Some(discovery.leads),
            expanded_query: Some(discovery.expanded_query),
            degraded: (!discovery.degraded.is_empty()).then_some(discovery.degraded),
            error: None,
            code: None,
            status: 200,
        }
    }

    pub fn from_error(err: &LeadScoutError) -> Self {
        let status = err.status_code();
        if status >= 500 {
            tracing::error!(error = %err, "discovery failed");
        } else {
            tracing::info!(error = %err, "discovery rejected");
        }

        Self {
            success: false,
            leads: None,
            expanded_query: None,
            degraded: None,
            error: Some(err.to_string()),
            code: Some(err.error_code().to_string()),
            status,
        }
    }

    pub fn from_result(result: Result<Discovery>) -> Self {
        match result {
            Ok(discovery) => Self::from_discovery(discovery),
            Err(e) => Self::from_error(&e),
        }
    }
}
