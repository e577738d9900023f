// crates/core/src/week.rs
//! ISO-8601 week and UTC day bucketing.
//!
//! Timestamps are epoch milliseconds, the unit every stat bucket is keyed
//! by. Functions return `None` only for instants chrono cannot represent.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

pub const DAY_MS: i64 = 86_400_000;
pub const WEEK_MS: i64 = 7 * DAY_MS;

fn from_millis(ts_ms: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ts_ms)
}

fn midnight_millis(date: NaiveDate) -> Option<i64> {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp_millis())
}

/// Monday of the ISO week containing `date`.
pub fn monday_of(date: NaiveDate) -> Option<NaiveDate> {
    // number_from_monday: Monday = 1 .. Sunday = 7
    let offset = i64::from(date.weekday().number_from_monday()) - 1;
    date.checked_sub_signed(Duration::days(offset))
}

/// Monday 00:00:00.000 UTC of the ISO week containing `ts_ms`.
pub fn week_start(ts_ms: i64) -> Option<i64> {
    let date = from_millis(ts_ms)?.date_naive();
    midnight_millis(monday_of(date)?)
}

/// ISO week-numbering year and week index (1..=53) of the week containing `date`.
///
/// The week belongs to the year of its Thursday; week 1 is the week that
/// contains January 4th of that year.
pub fn iso_year_week(date: NaiveDate) -> Option<(i32, u32)> {
    let monday = monday_of(date)?;
    let thursday = monday.checked_add_signed(Duration::days(3))?;
    let iso_year = thursday.year();
    let jan4 = NaiveDate::from_ymd_opt(iso_year, 1, 4)?;
    let week1_monday = monday_of(jan4)?;
    let week = (monday - week1_monday).num_days() / 7 + 1;
    u32::try_from(week).ok().map(|w| (iso_year, w))
}

/// `"YYYY-Www"` label for the ISO week containing `week_start_ms`.
///
/// Normally called with a value from [`week_start`]; any instant inside the
/// week yields the same label.
pub fn week_label(week_start_ms: i64) -> Option<String> {
    let date = from_millis(week_start_ms)?.date_naive();
    let (year, week) = iso_year_week(date)?;
    Some(format!("{year:04}-W{week:02}"))
}

/// 00:00:00.000 UTC of the day containing `ts_ms`.
pub fn day_start(ts_ms: i64) -> Option<i64> {
    midnight_millis(from_millis(ts_ms)?.date_naive())
}

/// `"YYYY-MM-DD"` (UTC) for the day containing `ts_ms`.
pub fn day_label(ts_ms: i64) -> Option<String> {
    from_millis(ts_ms).map(|dt| dt.format("%Y-%m-%d").to_string())
}
