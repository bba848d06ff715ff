//! Temporal expression parsing
//!
//! Parses the date grammar accepted in merge requirements into an absolute
//! UTC instant:
//!
//! - `YYYY-MM-DD`
//! - `YYYY-MM-DD HH:MM`
//! - `YYYY-MM-DD HH:MM <TZ>` (named offset or `UTC±HH[:MM]`)
//!
//! Expressions without a timezone suffix are interpreted as UTC.
//! Validation runs in a fixed order: syntax, field ranges, calendar
//! consistency. Each failure carries a message naming the failing check.

mod timezone;

pub use timezone::{Timezone, parse_timezone};

use std::sync::LazyLock;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Timelike, Utc};
use regex::Regex;
use tracing::debug;

use crate::error::{Error, Result};

static DATE_TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})-(\d{2})-(\d{2})\s+(\d{2}):(\d{2})(?:\s+(\S+))?$")
        .expect("static regex must compile")
});

static DATE_ONLY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").expect("static regex must compile"));

/// A parsed temporal expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedInstant {
    /// The absolute instant, in UTC
    pub instant: DateTime<Utc>,
    /// Whether the expression carried a time component
    pub has_time: bool,
}

/// Parse a temporal expression into a UTC instant.
pub fn parse_instant(expression: &str) -> Result<ParsedInstant> {
    let trimmed = expression.trim();

    if let Some(caps) = DATE_TIME_RE.captures(trimmed) {
        let (year, month, day) = read_date_fields(&caps[1], &caps[2], &caps[3])?;

        let hours: u32 = caps[4]
            .parse()
            .map_err(|_| Error::Validation("Hours must be numeric".to_string()))?;
        let minutes: u32 = caps[5]
            .parse()
            .map_err(|_| Error::Validation("Minutes must be numeric".to_string()))?;
        if hours > 23 {
            return Err(Error::Validation(
                "Hours must be between 0 and 23".to_string(),
            ));
        }
        if minutes > 59 {
            return Err(Error::Validation(
                "Minutes must be between 0 and 59".to_string(),
            ));
        }

        let date = calendar_date(year, month, day)?;
        let local = date
            .and_hms_opt(hours, minutes, 0)
            .ok_or_else(|| Error::Validation("Invalid time values".to_string()))?;

        // A trailing token shifts the local wall time back to UTC.
        let offset_minutes = match caps.get(6) {
            Some(tz) => parse_timezone(tz.as_str())?.offset_minutes,
            None => 0,
        };

        let instant = Utc.from_utc_datetime(&local) - Duration::minutes(i64::from(offset_minutes));
        debug!(%instant, has_time = true, "parsed temporal expression");
        return Ok(ParsedInstant {
            instant,
            has_time: true,
        });
    }

    if let Some(caps) = DATE_ONLY_RE.captures(trimmed) {
        let (year, month, day) = read_date_fields(&caps[1], &caps[2], &caps[3])?;
        let date = calendar_date(year, month, day)?;
        let local = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| Error::Validation("Invalid time values".to_string()))?;

        let instant = Utc.from_utc_datetime(&local);
        debug!(%instant, has_time = false, "parsed temporal expression");
        return Ok(ParsedInstant {
            instant,
            has_time: false,
        });
    }

    Err(Error::Validation(
        "Invalid date format. Expected YYYY-MM-DD or YYYY-MM-DD HH:MM [TZ]".to_string(),
    ))
}

/// Parse and range-check the year/month/day fields.
fn read_date_fields(year: &str, month: &str, day: &str) -> Result<(i32, u32, u32)> {
    let year: i32 = year
        .parse()
        .map_err(|_| Error::Validation("Year must be numeric".to_string()))?;
    let month: u32 = month
        .parse()
        .map_err(|_| Error::Validation("Month must be numeric".to_string()))?;
    let day: u32 = day
        .parse()
        .map_err(|_| Error::Validation("Day must be numeric".to_string()))?;

    if !(1..=12).contains(&month) {
        return Err(Error::Validation(
            "Month must be between 1 and 12".to_string(),
        ));
    }
    if !(1..=31).contains(&day) {
        return Err(Error::Validation("Day must be between 1 and 31".to_string()));
    }

    Ok((year, month, day))
}

/// Calendar-consistency check: rejects day-of-month overflow such as
/// `2024-02-30`, which passes the 1-31 range check.
fn calendar_date(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| Error::Validation("Invalid date for the given month".to_string()))
}

/// Format a UTC instant back into the accepted grammar.
///
/// Exact inverse of [`parse_instant`] for timezone-less expressions:
/// zero-padded, space-separated, time included only when requested.
pub fn format_instant(instant: DateTime<Utc>, with_time: bool) -> String {
    if with_time {
        instant.format("%Y-%m-%d %H:%M").to_string()
    } else {
        instant.format("%Y-%m-%d").to_string()
    }
}

/// Format a UTC instant as local wall time in the given timezone, with the
/// canonical timezone token appended.
pub fn format_in_zone(instant: DateTime<Utc>, tz_token: &str) -> Result<String> {
    let tz = parse_timezone(tz_token)?;
    let local = instant + Duration::minutes(i64::from(tz.offset_minutes));
    Ok(format!("{} {}", local.format("%Y-%m-%d %H:%M"), tz.name))
}

/// Truncate an instant to the start of its minute.
pub fn truncate_to_minute(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant
        .with_second(0)
        .and_then(|i| i.with_nanosecond(0))
        .unwrap_or(instant)
}

/// Truncate an instant to the start of its UTC day.
pub fn truncate_to_day(instant: DateTime<Utc>) -> DateTime<Utc> {
    Utc.from_utc_datetime(
        &instant
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .unwrap_or_else(|| instant.naive_utc()),
    )
}
