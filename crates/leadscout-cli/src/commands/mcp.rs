//! MCP command

use anyhow::Result;
use leadscout_core::{Config, SqliteRateLimiter};
use leadscout_mcp::ToolContext;
use std::sync::Arc;

pub async fn run() -> Result<()> {
    let config = Config::load()?;
    let limiter = Arc::new(SqliteRateLimiter::open(crate::database_path())?);
    let ctx = ToolContext::from_config(&config, limiter);
    leadscout_mcp::start_server(&ctx).await
}
