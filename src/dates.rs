//! Pure calendar arithmetic over the wire formats of this crate.
//!
//! Every date crossing a subsystem boundary is a `YYYY-MM-DD` day-string
//! and every time is `HH:MM` 24-hour. Parsing here is strict: anything
//! else is rejected before it can enter the store. Because the day-string
//! format is fixed-width, lexicographic comparison equals calendar order.

use std::cmp::Ordering;

use chrono::{Datelike, Local, NaiveDate, NaiveTime};

use crate::error::DateError;

/// Parse a strict `YYYY-MM-DD` day-string.
pub fn parse_day(s: &str) -> Result<NaiveDate, DateError> {
    let b = s.as_bytes();
    if b.len() != 10 || b[4] != b'-' || b[7] != b'-' {
        return Err(DateError::InvalidDay(s.to_string()));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| DateError::InvalidDay(s.to_string()))
}

/// Format a date as a `YYYY-MM-DD` day-string.
pub fn format_day(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

/// Parse a strict `HH:MM` 24-hour clock string.
pub fn parse_clock(s: &str) -> Result<NaiveTime, DateError> {
    let b = s.as_bytes();
    if b.len() != 5 || b[2] != b':' {
        return Err(DateError::InvalidClock(s.to_string()));
    }
    NaiveTime::parse_from_str(s, "%H:%M").map_err(|_| DateError::InvalidClock(s.to_string()))
}

/// Format a time as an `HH:MM` clock string.
pub fn format_clock(t: NaiveTime) -> String {
    t.format("%H:%M").to_string()
}

/// Add (or subtract) whole days to a day-string.
pub fn add_days(day: &str, n: i64) -> Result<String, DateError> {
    let d = parse_day(day)?;
    Ok(format_day(d + chrono::Duration::days(n)))
}

/// Number of days in a month, leap-aware.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    // The day before the first of the next month is the last of this one.
    let (ny, nm) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(ny, nm, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(30)
}

/// Advance a date by whole months, clamping the day-of-month to the target
/// month's length (Jan 31 + 1 month = Feb 28/29).
pub fn add_months_clamped(date: NaiveDate, months: i32) -> NaiveDate {
    let total = date.year() * 12 + date.month0() as i32 + months;
    let year = total.div_euclid(12);
    let month = total.rem_euclid(12) as u32 + 1;
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day)
        .expect("clamped day is always valid for its month")
}

/// Advance a date by whole years, clamping Feb 29 to Feb 28 off leap years.
pub fn add_years_clamped(date: NaiveDate, years: i32) -> NaiveDate {
    let year = date.year() + years;
    let day = date.day().min(days_in_month(year, date.month()));
    NaiveDate::from_ymd_opt(year, date.month(), day)
        .expect("clamped day is always valid for its month")
}

/// Compare two day-strings in calendar order.
///
/// Both sides must already be valid `YYYY-MM-DD`; the fixed-width format
/// makes byte order and calendar order coincide.
pub fn day_cmp(a: &str, b: &str) -> Ordering {
    a.cmp(b)
}

/// Today's local date as a day-string.
pub fn today_string() -> String {
    format_day(Local::now().date_naive())
}

/// Minutes-past-midnight sort key for an `HH:MM` string.
/// Unparseable input sorts to the end.
pub fn clock_minutes(s: &str) -> u32 {
    match parse_clock(s) {
        Ok(t) => {
            use chrono::Timelike;
            t.hour() * 60 + t.minute()
        }
        Err(_) => 9999,
    }
}
