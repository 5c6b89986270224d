//! Report date-range construction.
//!
//! Report filters take plain calendar dates. A start date means
//! midnight at the start of that day, an end date means the last
//! millisecond of that day, so a single-day report covers the full
//! day and an afternoon sale on the end date is always included.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

/// Milliseconds from midnight to 23:59:59.999
const DAY_END_OFFSET_MS: i64 = 86_399_999;

/// UTC instant at the start of the given day (00:00:00.000)
pub fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// UTC instant at the end of the given day (23:59:59.999)
pub fn day_end(date: NaiveDate) -> DateTime<Utc> {
    (date.and_time(NaiveTime::MIN) + Duration::milliseconds(DAY_END_OFFSET_MS)).and_utc()
}

/// An optional-bounded UTC time window for report queries.
///
/// `None` on either side means unbounded on that side. Both bounds
/// are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    /// Unbounded range covering everything
    pub const ALL: DateRange = DateRange {
        start: None,
        end: None,
    };

    /// Build a range from optional calendar dates, expanding the start
    /// to start-of-day and the end to end-of-day
    pub fn from_dates(start: Option<NaiveDate>, end: Option<NaiveDate>) -> DateRange {
        DateRange {
            start: start.map(day_start),
            end: end.map(day_end),
        }
    }

    /// True when `instant` falls inside the range
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        if let Some(start) = self.start {
            if instant < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if instant > end {
                return false;
            }
        }
        true
    }
}
