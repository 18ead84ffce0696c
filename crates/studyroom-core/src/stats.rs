//! Completed-session statistics: today and all-time totals.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::session::CompletedSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Stats {
    pub today_sessions: u64,
    pub today_minutes: u64,
    pub total_sessions: u64,
    pub total_minutes: u64,
}

impl Stats {
    /// Totals over `sessions`. A session counts for `today` when its
    /// `started_at`, seen in `tz`, falls on that date.
    pub fn from_sessions<Tz: TimeZone>(
        sessions: &[CompletedSession],
        today: NaiveDate,
        tz: &Tz,
    ) -> Self {
        sessions.iter().fold(Stats::default(), |mut stats, s| {
            let minutes = u64::from(s.duration_min);
            stats.total_sessions += 1;
            stats.total_minutes += minutes;
            if s.started_at.with_timezone(tz).date_naive() == today {
                stats.today_sessions += 1;
                stats.today_minutes += minutes;
            }
            stats
        })
    }
}

/// UTC instants bounding the calendar day `day` in `tz`, end exclusive.
pub fn day_bounds<Tz: TimeZone>(day: NaiveDate, tz: &Tz) -> (DateTime<Utc>, DateTime<Utc>) {
    (day_start(day, tz), day_start(day + Duration::days(1), tz))
}

fn day_start<Tz: TimeZone>(day: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    let midnight = day.and_time(NaiveTime::MIN);
    // Zones that skip midnight on a DST change start the day an hour later.
    tz.from_local_datetime(&midnight)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(midnight + Duration::hours(1))).earliest())
        .map(|start| start.with_timezone(&Utc))
        .unwrap_or_else(|| midnight.and_utc())
}
