//! Per-caller quota counters

use super::Database;
use crate::error::Result;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, OptionalExtension};
use serde::Serialize;

/// Usage of one caller in one window
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaUsage {
    pub caller_key: String,
    pub window_start: NaiveDate,
    pub count: u32,
}

/// First UTC day of the window containing `now`
///
/// Windows are aligned to multiples of `window_days` since the Unix epoch,
/// so a one-day window starts at UTC midnight.
pub fn window_start(now: DateTime<Utc>, window_days: u32) -> NaiveDate {
    let today = now.date_naive();
    let window_days = i64::from(window_days.max(1));
    let epoch = DateTime::<Utc>::UNIX_EPOCH.date_naive();
    let days = (today - epoch).num_days();
    let aligned = days - days.rem_euclid(window_days);
    epoch + chrono::Duration::days(aligned)
}

impl Database {
    /// Admit one request if the window count is below `limit`
    ///
    /// Creates the row with count 1 on first use, increments it while below
    /// the limit, and leaves it untouched otherwise. Returns the new count,
    /// or `None` when the request is denied.
    pub fn increment_if_below(
        &self,
        caller_key: &str,
        window_start: NaiveDate,
        limit: u32,
        now: DateTime<Utc>,
    ) -> Result<Option<u32>> {
        if limit == 0 {
            return Ok(None);
        }

        let count: Option<i64> = self
            .conn
            .query_row(
                "INSERT INTO rate_limits (caller_key, window_start, count, updated_at)
                 VALUES (?1, ?2, 1, ?3)
                 ON CONFLICT(caller_key, window_start) DO UPDATE
                     SET count = count + 1, updated_at = excluded.updated_at
                     WHERE rate_limits.count < ?4
                 RETURNING count",
                params![
                    caller_key,
                    window_start.to_string(),
                    now.to_rfc3339(),
                    i64::from(limit)
                ],
                |row| row.get(0),
            )
            .optional()?;

        Ok(count.map(|c| c as u32))
    }

    /// Current count for a caller in a window (0 when no row exists)
    pub fn window_count(&self, caller_key: &str, window_start: NaiveDate) -> Result<u32> {
        let count: Option<i64> = self
            .conn
            .query_row(
                "SELECT count FROM rate_limits WHERE caller_key = ?1 AND window_start = ?2",
                params![caller_key, window_start.to_string()],
                |row| row.get(0),
            )
            .optional()?;

        Ok(count.unwrap_or(0) as u32)
    }

    /// All callers with usage in a window, busiest first
    pub fn list_window_usage(&self, window_start: NaiveDate) -> Result<Vec<QuotaUsage>> {
        let mut stmt = self.conn.prepare(
            "SELECT caller_key, count FROM rate_limits
             WHERE window_start = ?1
             ORDER BY count DESC, caller_key",
        )?;

        let rows = stmt
            .query_map(params![window_start.to_string()], |row| {
                Ok(QuotaUsage {
                    caller_key: row.get(0)?,
                    window_start,
                    count: row.get::<_, i64>(1)? as u32,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.initialize().unwrap();
        db
    }

    #[test]
    fn test_window_start_daily() {
        let now = Utc.with_ymd_and_hms(2026, 3, 14, 23, 59, 59).unwrap();
        assert_eq!(
            window_start(now, 1),
            NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
        );
    }

    #[test]
    fn test_window_start_multi_day_is_aligned() {
        let a = Utc.with_ymd_and_hms(2026, 3, 14, 1, 0, 0).unwrap();
        let start = window_start(a, 7);
        let days = (start - DateTime::<Utc>::UNIX_EPOCH.date_naive()).num_days();
        assert_eq!(days % 7, 0);
        assert!(start <= a.date_naive());
        assert!((a.date_naive() - start).num_days() < 7);
    }

    #[test]
    fn test_increment_stops_at_limit() {
        let db = db();
        let now = Utc.with_ymd_and_hms(2026, 1, 5, 12, 0, 0).unwrap();
        let window = window_start(now, 1);

        assert_eq!(db.increment_if_below("ip:1.2.3.4", window, 2, now).unwrap(), Some(1));
        assert_eq!(db.increment_if_below("ip:1.2.3.4", window, 2, now).unwrap(), Some(2));
        assert_eq!(db.increment_if_below("ip:1.2.3.4", window, 2, now).unwrap(), None);
        assert_eq!(db.window_count("ip:1.2.3.4", window).unwrap(), 2);
    }

    #[test]
    fn test_zero_limit_writes_nothing() {
        let db = db();
        let now = Utc.with_ymd_and_hms(2026, 1, 5, 12, 0, 0).unwrap();
        let window = window_start(now, 1);

        assert_eq!(db.increment_if_below("user:7", window, 0, now).unwrap(), None);
        assert!(db.list_window_usage(window).unwrap().is_empty());
    }

    #[test]
    fn test_list_window_usage() {
        let db = db();
        let now = Utc.with_ymd_and_hms(2026, 1, 5, 12, 0, 0).unwrap();
        let window = window_start(now, 1);

        db.increment_if_below("user:a", window, 10, now).unwrap();
        db.increment_if_below("user:b", window, 10, now).unwrap();
        db.increment_if_below("user:b", window, 10, now).unwrap();

        let usage = db.list_window_usage(window).unwrap();
        assert_eq!(usage.len(), 2);
        assert_eq!(usage[0].caller_key, "user:b");
        assert_eq!(usage[0].count, 2);
    }
}
