//! Minimal UTC timestamp formatting for the `Analysis_Date` column.

use std::time::{SystemTime, UNIX_EPOCH};

/// Current UTC time as `YYYY-MM-DD HH:MM:SS`.
pub fn utc_timestamp() -> String {
    format_timestamp(SystemTime::now())
}

/// Format a [`SystemTime`] as `YYYY-MM-DD HH:MM:SS` UTC.
pub fn format_timestamp(t: SystemTime) -> String {
    let secs = t
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let secs_per_day = 86400u64;
    let days = secs / secs_per_day;
    let time_of_day = secs % secs_per_day;
    let hours = time_of_day / 3600;
    let minutes = (time_of_day % 3600) / 60;
    let seconds = time_of_day % 60;
    let (year, month, day) = days_to_ymd(days);
    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
        year, month, day, hours, minutes, seconds,
    )
}

/// Convert days since the Unix epoch to (year, month, day).
///
/// Counts on a March-first calendar, where the leap day falls at the end
/// of the year, in 400-year cycles of 146097 days each.
fn days_to_ymd(days: u64) -> (u64, u64, u64) {
    // 719468 days separate 0000-03-01 from 1970-01-01
    let shifted = days + 719468;
    let cycle = shifted / 146097;
    let day_in_cycle = shifted - cycle * 146097;
    let year_in_cycle =
        (day_in_cycle - day_in_cycle / 1460 + day_in_cycle / 36524 - day_in_cycle / 146096) / 365;
    let year = year_in_cycle + cycle * 400;
    let day_of_year =
        day_in_cycle - (365 * year_in_cycle + year_in_cycle / 4 - year_in_cycle / 100);
    let month_from_march = (5 * day_of_year + 2) / 153;
    let day = day_of_year - (153 * month_from_march + 2) / 5 + 1;
    let month = if month_from_march < 10 {
        month_from_march + 3
    } else {
        month_from_march - 9
    };
    let year = if month <= 2 { year + 1 } else { year };
    (year, month, day)
}
