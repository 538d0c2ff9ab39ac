//! Date presentation for `date` fields
//!
//! The model stores UTC ISO-8601 strings. Date pickers work in the local
//! zone without any timezone control, so the wall-clock time the user picks
//! is taken to be the UTC time: committing keeps the wall clock and labels it
//! UTC, and reading back keeps the wall clock and labels it with the local
//! offset so the picker shows exactly what is stored.

use chrono::{DateTime, FixedOffset, NaiveDateTime, SecondsFormat, Timelike, Utc};

use super::error::{FormError, FormResult};

/// Format used for display and for typed input
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Placeholder shown by an empty date input
pub const DATE_PLACEHOLDER: &str = "Date & Time (UTC)";

/// Render a picked date for display
pub fn format_date(date: &DateTime<FixedOffset>) -> String {
    date.format(DISPLAY_FORMAT).to_string()
}

/// Convert a picked local date into the stored UTC string, minute precision
pub fn to_utc_iso(picked: &DateTime<FixedOffset>) -> String {
    let wall = truncate_to_minute(picked.naive_local());
    wall.and_utc().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Read a stored (or typed) date back into the local display offset
pub fn parse_date(data: &str, local_offset: FixedOffset) -> FormResult<DateTime<FixedOffset>> {
    let wall = parse_utc_wall_clock(data.trim())?;
    wall.and_local_timezone(local_offset)
        .single()
        .ok_or_else(|| FormError::InvalidDate(data.to_string()))
}

fn parse_utc_wall_clock(data: &str) -> FormResult<NaiveDateTime> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(data) {
        return Ok(parsed.with_timezone(&Utc).naive_utc());
    }
    NaiveDateTime::parse_from_str(data, DISPLAY_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(data, "%Y-%m-%dT%H:%M:%S%.f"))
        .or_else(|_| NaiveDateTime::parse_from_str(data, "%Y-%m-%dT%H:%M"))
        .map_err(|_| FormError::InvalidDate(data.to_string()))
}

fn truncate_to_minute(wall: NaiveDateTime) -> NaiveDateTime {
    wall.with_second(0)
        .and_then(|w| w.with_nanosecond(0))
        .unwrap_or(wall)
}
