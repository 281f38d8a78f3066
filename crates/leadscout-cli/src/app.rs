//! CLI argument definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use leadscout_core::CallerKey;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "leadscout")]
#[command(
    author,
    version,
    about = "Find and qualify healthcare candidates from public professional profiles"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "cli")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search, parse, extract and score candidates for a request
    Discover(DiscoverArgs),

    /// Show quota usage for a caller, or for every active caller
    Quota(QuotaArgs),

    /// Extract credentials from text (arguments or stdin)
    Extract(ExtractArgs),

    /// Parse a saved search response offline
    Parse(ParseArgs),

    /// Start MCP server
    Mcp,
}

#[derive(Args)]
pub struct DiscoverArgs {
    /// Recruiter request, e.g. "ICU nurse Los Angeles"
    #[arg(required = true)]
    pub query: Vec<String>,

    #[command(flatten)]
    pub caller: CallerArgs,
}

#[derive(Args)]
pub struct CallerArgs {
    /// Client address (anonymous tier)
    #[arg(long, conflicts_with = "user")]
    pub ip: Option<String>,

    /// Authenticated user id (full profile, higher quota)
    #[arg(long)]
    pub user: Option<String>,
}

impl CallerArgs {
    pub fn caller_key(&self) -> CallerKey {
        CallerKey::from_parts(
            Some(self.ip.as_deref().unwrap_or("127.0.0.1")),
            self.user.as_deref(),
        )
    }
}

#[derive(Args)]
pub struct QuotaArgs {
    #[command(flatten)]
    pub caller: CallerArgs,

    /// List every caller with usage in the current window
    #[arg(long, conflicts_with_all = ["ip", "user"])]
    pub all: bool,
}

#[derive(Args)]
pub struct ExtractArgs {
    /// Text to scan; read from stdin when omitted
    pub text: Vec<String>,
}

#[derive(Args)]
pub struct ParseArgs {
    /// JSON file with `{"results": [...]}` or a bare array of results
    pub file: PathBuf,

    /// Stop after this many candidates
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Cli,
    Json,
    Csv,
    Md,
}
