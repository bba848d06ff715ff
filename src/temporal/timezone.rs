//! Timezone token parsing for temporal expressions
//!
//! Supports a small table of fixed named offsets plus the explicit
//! `UTC±HH[:MM]` form. Named zones are fixed offsets, not IANA zones:
//! `EST` is always -05:00 regardless of the calendar date.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

/// Fixed named offsets, in minutes from UTC.
const NAMED_OFFSETS: &[(&str, i32)] = &[
    ("UTC", 0),
    ("GMT", 0),
    ("EST", -300),
    ("EDT", -240),
    ("CST", -360),
    ("CDT", -300),
    ("MST", -420),
    ("MDT", -360),
    ("PST", -480),
    ("PDT", -420),
];

static UTC_OFFSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^UTC([+-])(\d{1,2}):?(\d{2})?$").expect("static regex must compile")
});

/// A parsed timezone token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timezone {
    /// Offset from UTC in minutes (positive = east of UTC)
    pub offset_minutes: i32,
    /// Canonical name used when formatting (`EST`, `UTC+01:00`, ...)
    pub name: String,
}

/// Parse a timezone token, case-insensitively.
///
/// Accepts a named offset from the fixed table or `UTC±HH[:MM]` within
/// ±14:00.
pub fn parse_timezone(token: &str) -> Result<Timezone> {
    let token = token.trim().to_uppercase();

    if let Some((name, offset)) = NAMED_OFFSETS.iter().find(|(name, _)| *name == token) {
        return Ok(Timezone {
            offset_minutes: *offset,
            name: (*name).to_string(),
        });
    }

    if let Some(caps) = UTC_OFFSET_RE.captures(&token) {
        let sign = if &caps[1] == "+" { 1 } else { -1 };
        let hours: i32 = caps[2].parse().map_err(|_| {
            Error::Validation("Invalid timezone offset: hours must be numeric".to_string())
        })?;
        let minutes: i32 = caps
            .get(3)
            .map_or(Ok(0), |m| m.as_str().parse())
            .map_err(|_| {
                Error::Validation("Invalid timezone offset: minutes must be numeric".to_string())
            })?;

        if hours > 14 || (hours == 14 && minutes > 0) || minutes >= 60 {
            return Err(Error::Validation(
                "Invalid timezone offset: must be between UTC-14:00 and UTC+14:00".to_string(),
            ));
        }

        return Ok(Timezone {
            offset_minutes: sign * (hours * 60 + minutes),
            name: format!(
                "UTC{}{hours:02}:{minutes:02}",
                if sign > 0 { '+' } else { '-' }
            ),
        });
    }

    Err(Error::Validation(
        "Invalid timezone format. Use UTC offset (e.g., UTC+01:00) or timezone name (e.g., EST)"
            .to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_timezones() {
        assert_eq!(parse_timezone("UTC").unwrap().offset_minutes, 0);
        assert_eq!(parse_timezone("GMT").unwrap().offset_minutes, 0);
        assert_eq!(parse_timezone("EST").unwrap().offset_minutes, -300);
        assert_eq!(parse_timezone("PDT").unwrap().offset_minutes, -420);
    }

    #[test]
    fn test_utc_offsets() {
        assert_eq!(parse_timezone("UTC+00:00").unwrap().offset_minutes, 0);
        assert_eq!(parse_timezone("UTC+01:00").unwrap().offset_minutes, 60);
        assert_eq!(parse_timezone("UTC-05:00").unwrap().offset_minutes, -300);
        assert_eq!(parse_timezone("UTC+05:30").unwrap().offset_minutes, 330);
    }

    #[test]
    fn test_simplified_utc_offsets_are_canonicalized() {
        let tz = parse_timezone("UTC+1").unwrap();
        assert_eq!(tz.offset_minutes, 60);
        assert_eq!(tz.name, "UTC+01:00");

        let tz = parse_timezone("UTC-5").unwrap();
        assert_eq!(tz.offset_minutes, -300);
        assert_eq!(tz.name, "UTC-05:00");
    }

    #[test]
    fn test_case_insensitive_and_whitespace() {
        assert_eq!(parse_timezone("est").unwrap().name, "EST");
        assert_eq!(parse_timezone("  utc+01:00 ").unwrap().name, "UTC+01:00");
    }

    #[test]
    fn test_rejects_invalid_tokens() {
        assert!(parse_timezone("INVALID").is_err());
        assert!(parse_timezone("UTC+25:00").is_err());
        assert!(parse_timezone("UTC+00:60").is_err());
        assert!(parse_timezone("UTC+14:01").is_err());
    }

    #[test]
    fn test_offset_boundary() {
        assert_eq!(parse_timezone("UTC+14:00").unwrap().offset_minutes, 840);
        assert_eq!(parse_timezone("UTC-14:00").unwrap().offset_minutes, -840);
    }
}
