//! Time fields as the planner sends them.
//!
//! Times are `HHMMSS` strings relative to the service date, with an optional
//! two-digit day offset prefix (`DDHHMMSS`) for services running past
//! midnight. Dates are `YYYYMMDD`; durations use the same shape as times.
//! Records keep the raw strings; these helpers interpret them on demand.

use std::fmt;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// Error returned when parsing an invalid time, date or duration string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A time of day plus the number of days past the service date.
///
/// # Examples
///
/// ```
/// use rejseplan::domain::ServiceTime;
/// use chrono::NaiveDate;
///
/// let t = ServiceTime::parse("01003000").unwrap();
/// assert_eq!(t.day_offset(), 1);
/// assert_eq!(t.to_string(), "00:30");
///
/// let date = NaiveDate::from_ymd_opt(2025, 9, 15).unwrap();
/// assert_eq!(t.on(date).date(), NaiveDate::from_ymd_opt(2025, 9, 16).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceTime {
    day_offset: u32,
    time: NaiveTime,
}

impl ServiceTime {
    /// Parse `HHMMSS` or `DDHHMMSS`.
    pub fn parse(s: &str) -> Result<Self, TimeError> {
        let (day_offset, hms) = split_day_offset(s)?;
        let [hour, minute, second] = hms;

        if hour > 23 {
            return Err(TimeError::new("hour must be 0-23"));
        }

        let time = NaiveTime::from_hms_opt(hour, minute, second)
            .ok_or_else(|| TimeError::new("minute and second must be 0-59"))?;

        Ok(Self { day_offset, time })
    }

    pub fn day_offset(&self) -> u32 {
        self.day_offset
    }

    pub fn time(&self) -> NaiveTime {
        self.time
    }

    /// Place this time on the calendar, counting from the service date.
    pub fn on(&self, service_date: NaiveDate) -> NaiveDateTime {
        service_date.and_time(self.time) + Duration::days(i64::from(self.day_offset))
    }
}

impl fmt::Display for ServiceTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.time.hour(), self.time.minute())
    }
}

/// Parse a `YYYYMMDD` service date.
///
/// ```
/// use rejseplan::domain::parse_service_date;
///
/// let d = parse_service_date("20250915").unwrap();
/// assert_eq!(d.to_string(), "2025-09-15");
/// assert!(parse_service_date("2025-09-15").is_err());
/// ```
pub fn parse_service_date(s: &str) -> Result<NaiveDate, TimeError> {
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TimeError::new("expected YYYYMMDD"));
    }
    NaiveDate::parse_from_str(s, "%Y%m%d").map_err(|_| TimeError::new("no such date"))
}

/// Parse a `HHMMSS` or `DDHHMMSS` duration (`dur`, `durS`).
///
/// Unlike times of day, hours are not capped at 23.
pub fn parse_duration(s: &str) -> Result<Duration, TimeError> {
    let (days, [hours, minutes, seconds]) = split_day_offset(s)?;

    if minutes > 59 || seconds > 59 {
        return Err(TimeError::new("minute and second must be 0-59"));
    }

    Ok(Duration::days(i64::from(days))
        + Duration::hours(i64::from(hours))
        + Duration::minutes(i64::from(minutes))
        + Duration::seconds(i64::from(seconds)))
}

/// Split into a day offset and `[h, m, s]`.
fn split_day_offset(s: &str) -> Result<(u32, [u32; 3]), TimeError> {
    let bytes = s.as_bytes();
    let (days, rest) = match bytes.len() {
        6 => (0, bytes),
        8 => (
            parse_two_digits(&bytes[0..2]).ok_or_else(|| TimeError::new("invalid day digits"))?,
            &bytes[2..],
        ),
        _ => return Err(TimeError::new("expected HHMMSS or DDHHMMSS")),
    };

    let mut hms = [0u32; 3];
    for (slot, chunk) in hms.iter_mut().zip(rest.chunks(2)) {
        *slot = parse_two_digits(chunk).ok_or_else(|| TimeError::new("invalid digits"))?;
    }

    Ok((days, hms))
}

fn parse_two_digits(bytes: &[u8]) -> Option<u32> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = (bytes[0] as char).to_digit(10)?;
    let d2 = (bytes[1] as char).to_digit(10)?;
    Some(d1 * 10 + d2)
}
