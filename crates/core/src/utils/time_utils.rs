use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// First day of the month after the one containing `date`.
/// Returns `None` past the last representable month.
pub fn first_of_next_month(date: NaiveDate) -> Option<NaiveDate> {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// The earliest first-of-month on or after `date`.
pub fn month_start_on_or_after(date: NaiveDate) -> Option<NaiveDate> {
    if date.day() == 1 {
        Some(date)
    } else {
        first_of_next_month(date)
    }
}

/// The earliest `weekday` on or after `date`.
pub fn weekday_on_or_after(date: NaiveDate, weekday: Weekday) -> Option<NaiveDate> {
    let current = date.weekday().num_days_from_monday() as i64;
    let target = weekday.num_days_from_monday() as i64;
    let days_ahead = (target - current).rem_euclid(7);
    date.checked_add_signed(Duration::days(days_ahead))
}
