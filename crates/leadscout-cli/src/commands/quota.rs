//! Quota command

use crate::app::{OutputFormat, QuotaArgs};
use anyhow::Result;
use leadscout_core::{Config, SqliteRateLimiter};

pub fn run(args: QuotaArgs, format: OutputFormat) -> Result<()> {
    let config = Config::load()?;
    let limiter = SqliteRateLimiter::open(crate::database_path())?;

    if args.all {
        return list_window(&limiter, &config, format);
    }

    let report = limiter.report(&args.caller.caller_key(), &config.quotas)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            println!("Caller:          {}", report.caller);
            println!("Window start:    {} ({} day)", report.window_start, report.window_days);
            println!("Used:            {}", report.used);
            println!("Limit:           {}", report.limit);
            println!("Remaining:       {}", report.remaining);
        }
    }
    Ok(())
}

fn list_window(limiter: &SqliteRateLimiter, config: &Config, format: OutputFormat) -> Result<()> {
    let usage = limiter.window_usage(config.quotas.window_days)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&usage)?);
        }
        _ if usage.is_empty() => println!("No searches in the current window"),
        _ => {
            for entry in &usage {
                println!("{:<40} {}", entry.caller_key, entry.count);
            }
        }
    }
    Ok(())
}
