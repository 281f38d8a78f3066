//! Discover command

use crate::app::{DiscoverArgs, OutputFormat};
use crate::output;
use anyhow::Result;
use leadscout_core::{Config, Pipeline, SearchRequest, SqliteRateLimiter};
use std::sync::Arc;

pub async fn run(args: DiscoverArgs, format: OutputFormat) -> Result<()> {
    let query = args.query.join(" ");
    let request = SearchRequest::new(&query, args.caller.caller_key())?;

    let config = Config::load()?;
    config.require_credentials()?;
    let limiter = Arc::new(SqliteRateLimiter::open(crate::database_path())?);
    let pipeline = Pipeline::from_config(&config, limiter)?;

    let result = pipeline.run(&request).await;

    if let Some(metrics) = pipeline.llm_metrics() {
        tracing::info!(
            requests = metrics.total_requests,
            errors = metrics.total_errors,
            cache_hits = metrics.cache_hits,
            avg_latency_ms = metrics.avg_latency_ms,
            "LLM usage"
        );
    }

    let discovery = result?;
    for reason in &discovery.degraded {
        eprintln!("Warning: {} degraded ({}): {}", reason.stage, reason.code, reason.message);
    }

    print!("{}", output::format_discovery(&discovery, format));
    Ok(())
}
