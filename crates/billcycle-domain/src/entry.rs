//! Income and expense lines, including recurring series and their occurrences.
//!
//! A single entity covers three roles:
//! - a plain one-off line (`recurring == false`, no parent),
//! - the head of a recurring series (`recurring == true`, no parent), whose own
//!   month is represented by the head itself,
//! - a materialized occurrence of a series (`parent_id == Some(head)`).

use std::{fmt, str::FromStr};

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{common::*, YearMonth};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Income,
    Expense,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntryKind::Income => "income",
            EntryKind::Expense => "expense",
        };
        f.write_str(label)
    }
}

impl FromStr for EntryKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(EntryKind::Income),
            "expense" => Ok(EntryKind::Expense),
            other => Err(format!("unknown entry kind `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entry {
    pub id: Uuid,
    pub description: String,
    pub amount: f64,
    pub kind: EntryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Anchor date for series heads, occurrence date otherwise.
    pub date: NaiveDate,
    #[serde(default)]
    pub recurring: bool,
    #[serde(default)]
    pub parent_id: Option<Uuid>,
    /// Preferred day-of-month for occurrences; defaults to the anchor's day.
    #[serde(default)]
    pub recurring_day: Option<u32>,
    #[serde(default)]
    pub consolidated: bool,
    #[serde(default)]
    pub consolidated_at: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Entry {
    pub fn new(
        description: impl Into<String>,
        amount: f64,
        kind: EntryKind,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: description.into(),
            amount,
            kind,
            category: None,
            date,
            recurring: false,
            parent_id: None,
            recurring_day: None,
            consolidated: false,
            consolidated_at: None,
            created_at: Utc::now(),
        }
    }

    /// Turns the entry into the head of a monthly series.
    pub fn into_series(mut self, recurring_day: Option<u32>) -> Self {
        self.recurring = true;
        self.parent_id = None;
        self.recurring_day = recurring_day;
        self
    }

    pub fn is_series_head(&self) -> bool {
        self.recurring && self.parent_id.is_none()
    }

    pub fn is_occurrence(&self) -> bool {
        self.parent_id.is_some()
    }

    pub fn month(&self) -> YearMonth {
        YearMonth::of(self.date)
    }

    pub fn preferred_day(&self) -> u32 {
        self.recurring_day.unwrap_or_else(|| self.date.day())
    }

    /// Builds the unconsolidated occurrence of this series head for `month`.
    pub fn occurrence_for(&self, month: YearMonth) -> Entry {
        Entry {
            id: Uuid::new_v4(),
            description: self.description.clone(),
            amount: self.amount,
            kind: self.kind,
            category: self.category.clone(),
            date: month.day(self.preferred_day()),
            recurring: false,
            parent_id: Some(self.id),
            recurring_day: self.recurring_day,
            consolidated: false,
            consolidated_at: None,
            created_at: Utc::now(),
        }
    }
}

impl Identifiable for Entry {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Amounted for Entry {
    fn amount(&self) -> f64 {
        self.amount
    }
}

impl Displayable for Entry {
    fn display_label(&self) -> String {
        format!("{} [{}] {}", self.date, self.kind, self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn occurrence_copies_head_and_clamps_day() {
        let anchor = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        let head = Entry::new("Rent", 1200.0, EntryKind::Expense, anchor).into_series(None);
        let february = YearMonth::new(2025, 2).unwrap();

        let child = head.occurrence_for(february);

        assert_eq!(child.parent_id, Some(head.id));
        assert!(!child.recurring);
        assert!(!child.consolidated);
        assert_eq!(child.amount, 1200.0);
        assert_eq!(child.date, NaiveDate::from_ymd_opt(2025, 2, 28).unwrap());
        assert!(!child.is_series_head());
        assert!(child.is_occurrence());
    }

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("Income".parse::<EntryKind>(), Ok(EntryKind::Income));
        assert!("salary".parse::<EntryKind>().is_err());
    }
}
