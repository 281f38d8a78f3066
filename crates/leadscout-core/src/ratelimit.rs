//! Per-caller search quotas
//!
//! Admission is a single conditional upsert against the `rate_limits` table,
//! so concurrent requests for the same caller can never both take the last
//! slot in a window.

use crate::config::QuotaConfig;
use crate::db::{window_start, Database, QuotaUsage};
use crate::error::{LeadScoutError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::fmt;
use std::sync::Mutex;

/// Who is asking
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CallerKey {
    Anonymous { ip: String },
    User { id: String },
}

/// Caller tier, selecting quota and pipeline profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Anonymous,
    Authenticated,
}

impl CallerKey {
    pub fn anonymous(ip: impl Into<String>) -> Self {
        CallerKey::Anonymous { ip: ip.into() }
    }

    pub fn user(id: impl Into<String>) -> Self {
        CallerKey::User { id: id.into() }
    }

    /// Build from optional request fields; a user id wins over an address
    ///
    /// Missing or blank values fall back to the anonymous `unknown` caller.
    pub fn from_parts(ip: Option<&str>, user_id: Option<&str>) -> Self {
        fn non_blank(v: Option<&str>) -> Option<&str> {
            v.map(str::trim).filter(|v| !v.is_empty())
        }

        match (non_blank(user_id), non_blank(ip)) {
            (Some(id), _) => CallerKey::user(id),
            (None, Some(ip)) => CallerKey::anonymous(ip),
            (None, None) => CallerKey::anonymous("unknown"),
        }
    }

    pub fn tier(&self) -> Tier {
        match self {
            CallerKey::Anonymous { .. } => Tier::Anonymous,
            CallerKey::User { .. } => Tier::Authenticated,
        }
    }

    /// Key stored in the `rate_limits` table
    pub fn storage_key(&self) -> String {
        match self {
            CallerKey::Anonymous { ip } => format!("ip:{}", ip),
            CallerKey::User { id } => format!("user:{}", id),
        }
    }
}

impl fmt::Display for CallerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.storage_key())
    }
}

impl QuotaConfig {
    /// Requests allowed per window for a tier
    pub fn limit_for(&self, tier: Tier) -> u32 {
        match tier {
            Tier::Anonymous => self.anonymous_per_day,
            Tier::Authenticated => self.authenticated_per_day,
        }
    }
}

/// Admission decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum RateDecision {
    Allowed { count: u32, remaining: u32 },
    Denied { limit: u32, count: u32 },
}

impl RateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateDecision::Allowed { .. })
    }
}

/// Quota usage for reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageReport {
    pub caller: String,
    pub tier: Tier,
    pub window_start: NaiveDate,
    pub window_days: u32,
    pub used: u32,
    pub limit: u32,
    pub remaining: u32,
}

/// Rate limiter trait
pub trait RateLimiter: Send + Sync {
    /// Count one request against `caller` if it is under `limit`
    fn check_and_increment(
        &self,
        caller: &CallerKey,
        limit: u32,
        window_days: u32,
    ) -> Result<RateDecision>;

    /// Requests already counted in the current window
    fn usage(&self, caller: &CallerKey, window_days: u32) -> Result<u32>;
}

/// SQLite-backed rate limiter
pub struct SqliteRateLimiter {
    db: Mutex<Database>,
}

impl SqliteRateLimiter {
    /// Wrap an initialized database
    pub fn new(db: Database) -> Self {
        Self { db: Mutex::new(db) }
    }

    /// Open (and initialize) the database at `path`
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let db = Database::open(path)?;
        db.initialize()?;
        Ok(Self::new(db))
    }

    /// In-memory limiter (for testing)
    pub fn in_memory() -> Result<Self> {
        let db = Database::open_in_memory()?;
        db.initialize()?;
        Ok(Self::new(db))
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Database>> {
        self.db
            .lock()
            .map_err(|_| LeadScoutError::Other(anyhow::anyhow!("rate limit database lock poisoned")))
    }

    /// `check_and_increment` at an explicit instant
    pub fn check_and_increment_at(
        &self,
        caller: &CallerKey,
        limit: u32,
        window_days: u32,
        now: DateTime<Utc>,
    ) -> Result<RateDecision> {
        let key = caller.storage_key();
        let window = window_start(now, window_days);
        let db = self.lock()?;

        let decision = match db.increment_if_below(&key, window, limit, now)? {
            Some(count) => RateDecision::Allowed {
                count,
                remaining: limit.saturating_sub(count),
            },
            None => RateDecision::Denied {
                limit,
                count: db.window_count(&key, window)?,
            },
        };

        tracing::debug!(caller = %key, %window, ?decision, "rate limit check");
        Ok(decision)
    }

    /// `usage` at an explicit instant
    pub fn usage_at(&self, caller: &CallerKey, window_days: u32, now: DateTime<Utc>) -> Result<u32> {
        let db = self.lock()?;
        db.window_count(&caller.storage_key(), window_start(now, window_days))
    }

    /// Every caller with usage in the window containing `now`, busiest first
    pub fn window_usage_at(&self, window_days: u32, now: DateTime<Utc>) -> Result<Vec<QuotaUsage>> {
        let db = self.lock()?;
        db.list_window_usage(window_start(now, window_days))
    }

    /// Every caller with usage in the current window
    pub fn window_usage(&self, window_days: u32) -> Result<Vec<QuotaUsage>> {
        self.window_usage_at(window_days, Utc::now())
    }

    /// Usage report for a caller under the configured quotas
    pub fn report(&self, caller: &CallerKey, quotas: &QuotaConfig) -> Result<UsageReport> {
        let now = Utc::now();
        let limit = quotas.limit_for(caller.tier());
        let used = self.usage_at(caller, quotas.window_days, now)?;
        Ok(UsageReport {
            caller: caller.storage_key(),
            tier: caller.tier(),
            window_start: window_start(now, quotas.window_days),
            window_days: quotas.window_days,
            used,
            limit,
            remaining: limit.saturating_sub(used),
        })
    }
}

impl RateLimiter for SqliteRateLimiter {
    fn check_and_increment(
        &self,
        caller: &CallerKey,
        limit: u32,
        window_days: u32,
    ) -> Result<RateDecision> {
        self.check_and_increment_at(caller, limit, window_days, Utc::now())
    }

    fn usage(&self, caller: &CallerKey, window_days: u32) -> Result<u32> {
        self.usage_at(caller, window_days, Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use std::sync::Arc;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_three_allowed_fourth_denied() {
        let limiter = SqliteRateLimiter::in_memory().unwrap();
        let caller = CallerKey::anonymous("203.0.113.9");

        for expected in 1..=3 {
            let decision = limiter.check_and_increment_at(&caller, 3, 1, noon()).unwrap();
            assert_eq!(
                decision,
                RateDecision::Allowed {
                    count: expected,
                    remaining: 3 - expected
                }
            );
        }

        let denied = limiter.check_and_increment_at(&caller, 3, 1, noon()).unwrap();
        assert_eq!(denied, RateDecision::Denied { limit: 3, count: 3 });
        assert_eq!(limiter.usage_at(&caller, 1, noon()).unwrap(), 3);
    }

    #[test]
    fn test_next_window_is_allowed() {
        let limiter = SqliteRateLimiter::in_memory().unwrap();
        let caller = CallerKey::anonymous("203.0.113.9");

        for _ in 0..3 {
            limiter.check_and_increment_at(&caller, 3, 1, noon()).unwrap();
        }
        assert!(!limiter
            .check_and_increment_at(&caller, 3, 1, noon())
            .unwrap()
            .is_allowed());

        let tomorrow = noon() + Duration::days(1);
        let decision = limiter.check_and_increment_at(&caller, 3, 1, tomorrow).unwrap();
        assert_eq!(decision, RateDecision::Allowed { count: 1, remaining: 2 });
    }

    #[test]
    fn test_callers_are_independent() {
        let limiter = SqliteRateLimiter::in_memory().unwrap();
        let a = CallerKey::anonymous("10.0.0.1");
        let b = CallerKey::user("10.0.0.1");

        limiter.check_and_increment_at(&a, 1, 1, noon()).unwrap();
        assert!(!limiter.check_and_increment_at(&a, 1, 1, noon()).unwrap().is_allowed());
        assert!(limiter.check_and_increment_at(&b, 1, 1, noon()).unwrap().is_allowed());
    }

    #[test]
    fn test_zero_limit_denies() {
        let limiter = SqliteRateLimiter::in_memory().unwrap();
        let caller = CallerKey::user("u1");
        assert_eq!(
            limiter.check_and_increment_at(&caller, 0, 1, noon()).unwrap(),
            RateDecision::Denied { limit: 0, count: 0 }
        );
    }

    #[test]
    fn test_concurrent_admissions_never_exceed_limit() {
        let dir = tempfile::tempdir().unwrap();
        let limiter = Arc::new(SqliteRateLimiter::open(dir.path().join("rl.sqlite")).unwrap());
        let caller = CallerKey::anonymous("198.51.100.1");

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                let caller = caller.clone();
                std::thread::spawn(move || {
                    limiter
                        .check_and_increment_at(&caller, 5, 1, noon())
                        .unwrap()
                        .is_allowed()
                })
            })
            .collect();

        let allowed = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|allowed| *allowed)
            .count();
        assert_eq!(allowed, 5);
        assert_eq!(limiter.usage_at(&caller, 1, noon()).unwrap(), 5);
    }

    #[test]
    fn test_caller_key_forms() {
        assert_eq!(CallerKey::anonymous("1.2.3.4").storage_key(), "ip:1.2.3.4");
        assert_eq!(CallerKey::user("42").storage_key(), "user:42");
        assert_eq!(
            CallerKey::from_parts(Some("1.2.3.4"), Some(" 42 ")),
            CallerKey::user("42")
        );
        assert_eq!(CallerKey::from_parts(Some(""), None), CallerKey::anonymous("unknown"));
        assert_eq!(
            CallerKey::from_parts(Some(" 10.0.0.8 "), Some("   ")),
            CallerKey::anonymous("10.0.0.8")
        );
        assert_eq!(CallerKey::user("42").tier(), Tier::Authenticated);
    }

    #[test]
    fn test_window_usage_lists_active_callers() {
        let limiter = SqliteRateLimiter::in_memory().unwrap();
        let busy = CallerKey::user("recruiter-1");
        let quiet = CallerKey::anonymous("192.0.2.10");

        for _ in 0..4 {
            limiter.check_and_increment_at(&busy, 50, 1, noon()).unwrap();
        }
        limiter.check_and_increment_at(&quiet, 3, 1, noon()).unwrap();

        let usage = limiter.window_usage_at(1, noon()).unwrap();
        let rows: Vec<(&str, u32)> = usage
            .iter()
            .map(|u| (u.caller_key.as_str(), u.count))
            .collect();
        assert_eq!(rows, [("user:recruiter-1", 4), ("ip:192.0.2.10", 1)]);

        let next_day = noon() + chrono::Duration::days(1);
        assert!(limiter.window_usage_at(1, next_day).unwrap().is_empty());
    }

    #[test]
    fn test_quota_limits_by_tier() {
        let quotas = QuotaConfig::default();
        assert_eq!(quotas.limit_for(Tier::Anonymous), 3);
        assert_eq!(quotas.limit_for(Tier::Authenticated), 50);
    }
}
