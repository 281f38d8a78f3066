//! Database layer for leadscout
//!
//! SQLite storage for per-caller search quotas.

mod rate_limits;
mod schema;

pub use rate_limits::{window_start, QuotaUsage};
pub use schema::Database;
use std::path::PathBuf;

impl Database {
    /// Get the default database path
    pub fn default_path() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::CACHE_DIR_NAME)
            .join("leadscout.sqlite")
    }
}
