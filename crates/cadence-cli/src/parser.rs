use anyhow::Result;
use cadence_core::recurrence::{format_date, parse_date};
use chrono::{NaiveDate, NaiveTime};
use chrono_english::{parse_date_string, Dialect};

/// Turns user input into a `YYYYMMDD` date.
///
/// Eight digit dates pass through unchanged; anything else is read as an
/// English expression ("tomorrow", "next friday") relative to `today`.
/// Blank input stays blank so the service can default it.
pub fn parse_due_date(date_str: &str, today: NaiveDate) -> Result<String> {
    let date_str = date_str.trim();
    if date_str.is_empty() {
        return Ok(String::new());
    }
    if parse_date(date_str).is_ok() {
        return Ok(date_str.to_string());
    }

    let base = today.and_time(NaiveTime::default()).and_utc();
    parse_date_string(date_str, base, Dialect::Us)
        .map(|parsed| format_date(parsed.date_naive()))
        .map_err(|e| anyhow::anyhow!("Failed to parse due date '{}': {}", date_str, e))
}

/// Parses a strict `YYYYMMDD` date supplied on the command line.
pub fn parse_day(value: &str) -> Result<NaiveDate> {
    Ok(parse_date(value.trim())?)
}
