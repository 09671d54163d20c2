use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

use crate::error::{Error, Result};

const MILLIS_IN_SECOND: f64 = 1_000.0;
const MILLIS_IN_MINUTE: f64 = 60.0 * MILLIS_IN_SECOND;
const MINUTES_IN_HOUR: f64 = 60.0;
const MINUTES_IN_DAY: f64 = 24.0 * MINUTES_IN_HOUR;
const MINUTES_IN_MONTH: f64 = 30.0 * MINUTES_IN_DAY;
const MINUTES_IN_YEAR: f64 = 365.0 * MINUTES_IN_DAY;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Second,
    Minute,
    Hour,
    Day,
    Month,
    Year,
}

impl Unit {
    fn as_str(&self) -> &str {
        match self {
            Unit::Second => "second",
            Unit::Minute => "minute",
            Unit::Hour => "hour",
            Unit::Day => "day",
            Unit::Month => "month",
            Unit::Year => "year",
        }
    }
}

/// A rounded elapsed duration expressed in a single unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Distance {
    count: u64,
    unit: Unit,
}

impl Distance {
    fn from_millis(millis: u64) -> Self {
        let millis = millis as f64;
        let minutes = millis / MILLIS_IN_MINUTE;

        let (count, unit) = if minutes < 1.0 {
            ((millis / MILLIS_IN_SECOND).round(), Unit::Second)
        } else if minutes < MINUTES_IN_HOUR {
            (minutes.round(), Unit::Minute)
        } else if minutes < MINUTES_IN_DAY {
            ((minutes / MINUTES_IN_HOUR).round(), Unit::Hour)
        } else if minutes < MINUTES_IN_MONTH {
            ((minutes / MINUTES_IN_DAY).round(), Unit::Day)
        } else if minutes < MINUTES_IN_YEAR {
            let months = (minutes / MINUTES_IN_MONTH).round();
            // Twelve rounded months read better as a year
            if months == 12.0 {
                (1.0, Unit::Year)
            } else {
                (months, Unit::Month)
            }
        } else {
            ((minutes / MINUTES_IN_YEAR).round(), Unit::Year)
        };

        Self {
            count: count as u64,
            unit,
        }
    }

}

impl std::fmt::Display for Distance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 1 {
            write!(f, "1 {}", self.unit.as_str())
        } else {
            write!(f, "{} {}s", self.count, self.unit.as_str())
        }
    }
}

/// Seconds may be omitted, e.g. `2024-06-15T11:30`
const MINUTE_PRECISION_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Parse a timestamp that carries no timezone designator, treating it as UTC
pub fn parse_utc_timestamp(timestamp: &str) -> Result<DateTime<Utc>> {
    let timestamp = timestamp.trim();
    let designated = format!("{}Z", timestamp);

    DateTime::parse_from_rfc3339(&designated)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|e| {
            NaiveDateTime::parse_from_str(timestamp, MINUTE_PRECISION_FORMAT)
                .map(|naive| Utc.from_utc_datetime(&naive))
                .map_err(|_| e)
        })
        .map_err(|e| Error::ParsingError(format!("Invalid UTC timestamp {:?}: {}", timestamp, e)))
}

/// Describe how far `then` lies from `now`, e.g. `"3 days ago"` or `"in 2 hours"`.
///
/// The phrase uses a single unit, rounded to the nearest whole count.
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let millis = now.signed_duration_since(then).num_milliseconds();
    let distance = Distance::from_millis(millis.unsigned_abs());

    if millis < 0 {
        format!("in {}", distance)
    } else {
        format!("{} ago", distance)
    }
}

/// [`relative_time`] measured against the wall clock
pub fn relative_time_to_now(then: DateTime<Utc>) -> String {
    relative_time(then, Utc::now())
}
