//! Date-only values are stored as unix seconds at 00:00:00 UTC.
//!
//! Input strings use the `YYYY-MM-DD` shape of an HTML date field. Parsing
//! never rolls over: `2026-02-31` is rejected instead of becoming March 3rd.

use chrono::{DateTime, Local, NaiveDate, Utc};
use thiserror::Error;

const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("Invalid date input value")]
    Format,
    #[error("Invalid calendar date")]
    Calendar,
    #[error("Timestamp is not at 00:00:00 UTC")]
    NotMidnight,
    #[error("Timestamp is out of range")]
    OutOfRange,
}

pub fn unix_seconds_utc_midnight_from_date_input(value: &str) -> Result<i64, DateError> {
    let bytes = value.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !well_formed {
        return Err(DateError::Format);
    }

    let year: i32 = value[0..4].parse().map_err(|_| DateError::Format)?;
    let month: u32 = value[5..7].parse().map_err(|_| DateError::Format)?;
    let day: u32 = value[8..10].parse().map_err(|_| DateError::Format)?;

    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or(DateError::Calendar)?;
    let midnight = date.and_hms_opt(0, 0, 0).ok_or(DateError::Calendar)?;
    Ok(midnight.and_utc().timestamp())
}

pub fn date_input_from_unix_seconds_utc_midnight(unix_seconds: i64) -> Result<String, DateError> {
    let instant = DateTime::<Utc>::from_timestamp(unix_seconds, 0).ok_or(DateError::OutOfRange)?;
    Ok(instant.format("%Y-%m-%d").to_string())
}

/// Decodes a date-only value, accepting only instants at exact UTC midnight.
pub fn utc_midnight_date(unix_seconds: i64) -> Result<NaiveDate, DateError> {
    let instant = DateTime::<Utc>::from_timestamp(unix_seconds, 0).ok_or(DateError::OutOfRange)?;
    if unix_seconds.rem_euclid(SECONDS_PER_DAY) != 0 {
        return Err(DateError::NotMidnight);
    }
    Ok(instant.date_naive())
}

/// Renders the UTC calendar date, e.g. `Jan 22, 2026`.
pub fn format_utc_date(unix_seconds: i64) -> String {
    match DateTime::<Utc>::from_timestamp(unix_seconds, 0) {
        Some(instant) => instant.format("%b %-d, %Y").to_string(),
        None => unix_seconds.to_string(),
    }
}

/// Renders a full timestamp in the local time zone.
pub fn format_local_date_time(unix_seconds: i64) -> String {
    match DateTime::<Utc>::from_timestamp(unix_seconds, 0) {
        Some(instant) => instant
            .with_timezone(&Local)
            .format("%b %-d, %Y, %-I:%M %p")
            .to_string(),
        None => unix_seconds.to_string(),
    }
}
