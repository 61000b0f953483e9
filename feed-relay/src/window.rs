use crate::types::FeedEntry;
use chrono::{DateTime, Duration, DurationRound, TimeDelta, Timelike, Utc};

/// Half-open reporting window `[start, end)`, both bounds on the hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Window covering the `lookback_hours` full hours before the current hour.
    ///
    /// A lookback of zero gives `start == end`, which admits nothing.
    pub fn compute(now: DateTime<Utc>, lookback_hours: u32) -> Self {
        let start = now
            .checked_sub_signed(Duration::hours(i64::from(lookback_hours)))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);

        Self {
            start: floor_to_hour(start),
            end: floor_to_hour(now),
        }
    }

    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        timestamp >= self.start && timestamp < self.end
    }

    /// Entries without a usable timestamp never match.
    pub fn admits(&self, timestamp: Option<DateTime<Utc>>) -> bool {
        timestamp.is_some_and(|t| self.contains(t))
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Zero the minutes, seconds and sub-second part.
pub fn floor_to_hour(t: DateTime<Utc>) -> DateTime<Utc> {
    // duration_trunc counts in i64 nanoseconds, so it only covers 1677..2262.
    t.duration_trunc(TimeDelta::hours(1))
        .ok()
        .or_else(|| t.with_minute(0)?.with_second(0)?.with_nanosecond(0))
        .unwrap_or(t)
}

/// First set, non-zero timestamp in priority order.
///
/// When none qualifies the last candidate is returned as is, so an entry
/// whose last slot is empty resolves to `None` and gets excluded.
pub fn resolve_timestamp(candidates: &[Option<DateTime<Utc>>]) -> Option<DateTime<Utc>> {
    candidates
        .iter()
        .flatten()
        .find(|t| !is_zero(t))
        .copied()
        .or_else(|| candidates.last().copied().flatten())
}

// Feeds with a blank date element come through as the epoch.
fn is_zero(t: &DateTime<Utc>) -> bool {
    t.timestamp() == 0 && t.timestamp_subsec_nanos() == 0
}

/// Published wins over updated.
pub fn entry_timestamp(entry: &FeedEntry) -> Option<DateTime<Utc>> {
    resolve_timestamp(&[entry.published_at, entry.updated_at])
}
