//!
//! Documentation of the clock module.
//! The one place a wall-clock string becomes a moment in time.
//!

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use super::error::ClockParseError;

///
/// Parse a wall-clock string and place it on `today`
///
/// # Arguments
///
/// * `text` - "h:mm AM/PM" (period case-insensitive, leading zero optional) or "HH:MM"
/// * `today` - The calendar day (UTC) the time belongs to
///
/// # Output
///
/// * Ok(moment) - `today` at the given hour and minute, zero seconds
/// * Err(_) - the string is not a time of day
///
/// # Example
/// ```
/// let moment = parse_time_string_to_date("2:15 PM", today)?;
/// assert_eq!(moment.hour(), 14);
/// ```
///
pub fn parse_time_string_to_date(text: &str, today: NaiveDate) -> Result<DateTime<Utc>, ClockParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ClockParseError::Empty);
    }

    let mut parts = trimmed.split_whitespace();
    let clock = parts.next().unwrap_or_default();
    let period = parts.next();
    if parts.next().is_some() {
        return Err(ClockParseError::Malformed(trimmed.to_string()));
    }

    let (hour_text, minute_text) = match clock.split_once(':') {
        Some(value) => value,
        None => return Err(ClockParseError::Malformed(trimmed.to_string())),
    };

    let hour = match hour_text.parse::<u32>() {
        Ok(value) => value,
        Err(_) => return Err(ClockParseError::InvalidHour(hour_text.to_string())),
    };
    let minute = match minute_text.parse::<u32>() {
        Ok(value) if value < 60 && minute_text.len() == 2 => value,
        _ => return Err(ClockParseError::InvalidMinute(minute_text.to_string())),
    };

    let hour = match period {
        None if hour < 24 => hour,
        None => return Err(ClockParseError::InvalidHour(hour_text.to_string())),
        Some(marker) => {
            if !(1..=12).contains(&hour) {
                return Err(ClockParseError::InvalidHour(hour_text.to_string()));
            }
            if marker.eq_ignore_ascii_case("PM") {
                if hour == 12 { 12 } else { hour + 12 }
            } else if marker.eq_ignore_ascii_case("AM") {
                if hour == 12 { 0 } else { hour }
            } else {
                return Err(ClockParseError::InvalidPeriod(marker.to_string()));
            }
        }
    };

    on_day(today, hour, minute).ok_or_else(|| ClockParseError::Malformed(trimmed.to_string()))
}

/// `day` at `hour:minute:00` UTC, None if the time does not exist
pub fn on_day(day: NaiveDate, hour: u32, minute: u32) -> Option<DateTime<Utc>> {
    let time = NaiveTime::from_hms_opt(hour, minute, 0)?;
    Some(day.and_time(time).and_utc())
}
