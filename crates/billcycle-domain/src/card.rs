//! Credit card definitions and their fixed cycle days.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{common::*, YearMonth};

/// Days added to the closing day when a card has no explicit due day.
pub const DEFAULT_DUE_OFFSET_DAYS: u32 = 7;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreditCard {
    pub id: Uuid,
    pub name: String,
    pub credit_limit: f64,
    /// Day-of-month the statement cycle closes (1-31, clamped to short months).
    pub closing_day: u32,
    /// Payment due day. May exceed the month length, overflowing into the next month.
    #[serde(default)]
    pub due_day: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_digits: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl CreditCard {
    pub fn new(
        name: impl Into<String>,
        credit_limit: f64,
        closing_day: u32,
        due_day: Option<u32>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            credit_limit,
            closing_day,
            due_day,
            brand: None,
            last_digits: None,
            active: true,
            created_at: Utc::now(),
        }
    }

    /// Configured due day, or `closing_day + 7` when unset.
    pub fn effective_due_day(&self) -> u32 {
        self.due_day.unwrap_or(self.closing_day + DEFAULT_DUE_OFFSET_DAYS)
    }

    /// The date the statement for `month` closes.
    pub fn closing_date(&self, month: YearMonth) -> NaiveDate {
        month.day(self.closing_day)
    }
}

impl Identifiable for CreditCard {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for CreditCard {
    fn display_label(&self) -> String {
        match &self.last_digits {
            Some(digits) => format!("{} (*{})", self.name, digits),
            None => self.name.clone(),
        }
    }
}
