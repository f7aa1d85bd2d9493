//! Publish-age calculation
//!
//! Ages are whole days between a publish timestamp and a reference time,
//! floored, and never negative.

use crate::error::InvalidDateError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Values that can be read as a UTC timestamp
pub trait IntoTimestamp {
    fn into_timestamp(self) -> Result<DateTime<Utc>, InvalidDateError>;
}

impl IntoTimestamp for DateTime<Utc> {
    fn into_timestamp(self) -> Result<DateTime<Utc>, InvalidDateError> {
        Ok(self)
    }
}

impl IntoTimestamp for &DateTime<Utc> {
    fn into_timestamp(self) -> Result<DateTime<Utc>, InvalidDateError> {
        Ok(*self)
    }
}

impl IntoTimestamp for &str {
    fn into_timestamp(self) -> Result<DateTime<Utc>, InvalidDateError> {
        parse_timestamp(self)
    }
}

impl IntoTimestamp for &String {
    fn into_timestamp(self) -> Result<DateTime<Utc>, InvalidDateError> {
        parse_timestamp(self)
    }
}

/// Parses an ISO-8601 timestamp
///
/// Accepts RFC 3339, and reads a bare date or a zone-less date-time as UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, InvalidDateError> {
    let trimmed = value.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    if let Some(naive) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Ok(naive.and_utc());
    }

    Err(InvalidDateError::new(value))
}

/// Whole days elapsed from `published` to `reference`, clamped at zero
pub fn age_in_days(
    published: impl IntoTimestamp,
    reference: impl IntoTimestamp,
) -> Result<u32, InvalidDateError> {
    let published = published.into_timestamp()?;
    let reference = reference.into_timestamp()?;

    let days = (reference - published).num_days();
    if days <= 0 {
        return Ok(0);
    }
    Ok(u32::try_from(days).unwrap_or(u32::MAX))
}

/// Whole days elapsed from `published` until now
pub fn age_in_days_now(published: impl IntoTimestamp) -> Result<u32, InvalidDateError> {
    age_in_days(published, Utc::now())
}
