//! Calendar month references used for statement cycles and recurrence slots.

use std::{fmt, str::FromStr};

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::calendar;

pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;

/// A `(year, month)` pair. Ordered chronologically.
///
/// Used both as a card statement identifier and as the calendar slot of a
/// recurring entry occurrence. Serialized as `{"year": .., "month": ..}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "YearMonthParts", into = "YearMonthParts")]
pub struct YearMonth {
    first_day: NaiveDate,
}

#[derive(Clone, Copy, Serialize, Deserialize)]
struct YearMonthParts {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, YearMonthError> {
        if !(1..=12).contains(&month) {
            return Err(YearMonthError::InvalidMonth(month));
        }
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(YearMonthError::YearOutOfRange(year));
        }
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|first_day| Self { first_day })
            .ok_or(YearMonthError::YearOutOfRange(year))
    }

    /// The month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            first_day: date - Days::new(u64::from(date.day0())),
        }
    }

    pub fn year(self) -> i32 {
        self.first_day.year()
    }

    pub fn month(self) -> u32 {
        self.first_day.month()
    }

    pub fn first_day(self) -> NaiveDate {
        self.first_day
    }

    pub fn last_day(self) -> NaiveDate {
        self.first_day + Days::new(u64::from(self.days_in_month() - 1))
    }

    pub fn days_in_month(self) -> u32 {
        calendar::days_in_month(self.year(), self.month())
    }

    /// Date of the nominal `day` in this month, clamped to the month length.
    pub fn day(self, day: u32) -> NaiveDate {
        let clamped = calendar::clamp_day(self.year(), self.month(), day);
        self.first_day + Days::new(u64::from(clamped - 1))
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        Self::of(date) == self
    }

    /// Shifts by `months` (negative moves backwards). `None` outside the supported years.
    pub fn add_months(self, months: i32) -> Option<Self> {
        let shifted = calendar::add_months(self.first_day, months)?;
        Self::new(shifted.year(), shifted.month()).ok()
    }

    pub fn next(self) -> Option<Self> {
        self.add_months(1)
    }

    pub fn previous(self) -> Option<Self> {
        self.add_months(-1)
    }

    /// Signed number of months from `self` to `other`.
    pub fn months_until(self, other: YearMonth) -> i32 {
        (other.year() - self.year()) * 12 + other.month() as i32 - self.month() as i32
    }

    /// `count` consecutive months starting at `self`, stopping early at the supported range.
    pub fn span(self, count: u32) -> Vec<YearMonth> {
        let mut months = Vec::with_capacity(count as usize);
        let mut cursor = Some(self);
        for _ in 0..count {
            let Some(current) = cursor else { break };
            months.push(current);
            cursor = current.next();
        }
        months
    }
}

impl TryFrom<YearMonthParts> for YearMonth {
    type Error = YearMonthError;

    fn try_from(parts: YearMonthParts) -> Result<Self, Self::Error> {
        YearMonth::new(parts.year, parts.month)
    }
}

impl From<YearMonth> for YearMonthParts {
    fn from(value: YearMonth) -> Self {
        Self {
            year: value.year(),
            month: value.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for YearMonth {
    type Err = YearMonthError;

    /// Parses `YYYY-MM`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let (year, month) = trimmed
            .split_once('-')
            .ok_or_else(|| YearMonthError::Parse(trimmed.to_string()))?;
        let year = year
            .parse::<i32>()
            .map_err(|_| YearMonthError::Parse(trimmed.to_string()))?;
        let month = month
            .parse::<u32>()
            .map_err(|_| YearMonthError::Parse(trimmed.to_string()))?;
        YearMonth::new(year, month)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Errors that can occur when constructing [`YearMonth`] values.
pub enum YearMonthError {
    InvalidMonth(u32),
    YearOutOfRange(i32),
    Parse(String),
}

impl fmt::Display for YearMonthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearMonthError::InvalidMonth(month) => write!(f, "month {month} is not in 1..=12"),
            YearMonthError::YearOutOfRange(year) => {
                write!(f, "year {year} is outside {MIN_YEAR}..={MAX_YEAR}")
            }
            YearMonthError::Parse(raw) => write!(f, "`{raw}` is not a YYYY-MM month"),
        }
    }
}

impl std::error::Error for YearMonthError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    #[test]
    fn rejects_invalid_months() {
        assert_eq!(YearMonth::new(2025, 0), Err(YearMonthError::InvalidMonth(0)));
        assert_eq!(YearMonth::new(2025, 13), Err(YearMonthError::InvalidMonth(13)));
    }

    #[test]
    fn ordering_is_chronological() {
        assert!(ym(2024, 12) < ym(2025, 1));
        assert!(ym(2025, 2) > ym(2025, 1));
        assert_eq!(ym(2025, 6).max(ym(2025, 3)), ym(2025, 6));
    }

    #[test]
    fn add_months_crosses_year_boundaries() {
        assert_eq!(ym(2025, 11).add_months(3), Some(ym(2026, 2)));
        assert_eq!(ym(2025, 1).add_months(-1), Some(ym(2024, 12)));
        assert_eq!(ym(MAX_YEAR, 12).next(), None);
        assert_eq!(ym(2025, 3).months_until(ym(2026, 1)), 10);
    }

    #[test]
    fn day_is_clamped_to_month_length() {
        assert_eq!(
            ym(2025, 2).day(31),
            NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()
        );
        assert_eq!(
            ym(2025, 2).last_day(),
            NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()
        );
    }

    #[test]
    fn parses_and_formats() {
        let parsed: YearMonth = "2025-03".parse().unwrap();
        assert_eq!(parsed, ym(2025, 3));
        assert_eq!(parsed.to_string(), "2025-03");
        assert!("2025/03".parse::<YearMonth>().is_err());
    }

    #[test]
    fn serializes_as_year_and_month() {
        let json = serde_json::to_string(&ym(2025, 7)).unwrap();
        assert_eq!(json, r#"{"year":2025,"month":7}"#);
        let back: YearMonth = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ym(2025, 7));
        assert!(serde_json::from_str::<YearMonth>(r#"{"year":2025,"month":13}"#).is_err());
    }
}
