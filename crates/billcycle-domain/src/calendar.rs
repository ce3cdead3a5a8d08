//! Month arithmetic shared by the billing-cycle and recurrence engines.
//!
//! Every nominal day-of-month (closing day, due day, recurring day) is mapped
//! onto a real date through [`clamp_day`], so a "31" lands on the last day of
//! short months instead of spilling into the next one. Due days are the one
//! exception: [`resolve_due_date`] lets them overflow on purpose.

use chrono::{Days, Months, NaiveDate};

use crate::YearMonth;

/// Returns whether `year` is a leap year in the proleptic Gregorian calendar.
pub fn is_leap_year(year: i32) -> bool {
    NaiveDate::from_ymd_opt(year, 2, 29).is_some()
}

/// Number of days in `month` (1-12) of `year`.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 31,
    }
}

/// Maps a nominal day onto the month: `min(day, days_in_month)`, never below 1.
pub fn clamp_day(year: i32, month: u32, day: u32) -> u32 {
    day.clamp(1, days_in_month(year, month))
}

/// Calendar-correct month addition. The day is clamped to the length of the
/// resulting month, so Jan 31 + 1 month is the last day of February.
pub fn add_months(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    if months >= 0 {
        date.checked_add_months(Months::new(months.unsigned_abs()))
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))
    }
}

/// Resolves a due day within `month`.
///
/// When `due_day` fits in the month the result is that day. Otherwise the
/// excess rolls over past the last day, landing in the following month
/// (a due day of 35 in a 30-day month is the 5th of the next month).
pub fn resolve_due_date(month: YearMonth, due_day: u32) -> NaiveDate {
    let days = month.days_in_month();
    if due_day <= days {
        month.day(due_day)
    } else {
        month.last_day() + Days::new(u64::from(due_day - days))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2025, 2), 28);
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(2025, 4), 30);
        assert_eq!(days_in_month(2025, 12), 31);
    }

    #[test]
    fn clamp_day_caps_at_month_length() {
        assert_eq!(clamp_day(2025, 2, 31), 28);
        assert_eq!(clamp_day(2024, 2, 31), 29);
        assert_eq!(clamp_day(2025, 4, 31), 30);
        assert_eq!(clamp_day(2025, 1, 15), 15);
        assert_eq!(clamp_day(2025, 1, 0), 1);
    }

    #[test]
    fn add_months_clamps_to_shorter_month() {
        assert_eq!(add_months(date(2025, 1, 31), 1), Some(date(2025, 2, 28)));
        assert_eq!(add_months(date(2024, 1, 31), 1), Some(date(2024, 2, 29)));
        assert_eq!(add_months(date(2025, 11, 15), 3), Some(date(2026, 2, 15)));
        assert_eq!(add_months(date(2025, 3, 31), -1), Some(date(2025, 2, 28)));
        assert_eq!(add_months(date(2025, 1, 10), -13), Some(date(2023, 12, 10)));
    }

    #[test]
    fn due_date_within_month_stays_put() {
        let april = YearMonth::new(2025, 4).unwrap();
        assert_eq!(resolve_due_date(april, 17), date(2025, 4, 17));
        assert_eq!(resolve_due_date(april, 30), date(2025, 4, 30));
    }

    #[test]
    fn due_date_overflows_into_following_month() {
        let april = YearMonth::new(2025, 4).unwrap();
        assert_eq!(resolve_due_date(april, 35), date(2025, 5, 5));

        let february = YearMonth::new(2025, 2).unwrap();
        assert_eq!(resolve_due_date(february, 30), date(2025, 3, 2));

        let december = YearMonth::new(2025, 12).unwrap();
        assert_eq!(resolve_due_date(december, 38), date(2026, 1, 7));
    }
}
