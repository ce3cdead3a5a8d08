//! Card invoices (one per card and statement month) and their status rules.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{common::*, YearMonth};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    #[default]
    Open,
    Closed,
    Paid,
}

impl InvoiceStatus {
    /// Status implied by the calendar alone: closed once `today` reaches the closing date.
    pub fn from_cycle(closing_date: NaiveDate, today: NaiveDate) -> Self {
        if today >= closing_date {
            InvoiceStatus::Closed
        } else {
            InvoiceStatus::Open
        }
    }

    pub fn is_paid(self) -> bool {
        matches!(self, InvoiceStatus::Paid)
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            InvoiceStatus::Open => "open",
            InvoiceStatus::Closed => "closed",
            InvoiceStatus::Paid => "paid",
        };
        f.write_str(label)
    }
}

/// Persisted invoice row. `amount` and non-paid `status` are caches refreshed on every read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Invoice {
    pub id: Uuid,
    pub card_id: Uuid,
    pub statement: YearMonth,
    pub amount: f64,
    pub due_date: NaiveDate,
    pub status: InvoiceStatus,
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Invoice {
    pub fn new(card_id: Uuid, statement: YearMonth, amount: f64, due_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            card_id,
            statement,
            amount,
            due_date,
            status: InvoiceStatus::Open,
            paid_at: None,
            created_at: Utc::now(),
        }
    }

    /// Re-derives open/closed from the calendar. Paid invoices are left alone.
    pub fn refresh_status(&mut self, closing_date: NaiveDate, today: NaiveDate) {
        if !self.status.is_paid() {
            self.status = InvoiceStatus::from_cycle(closing_date, today);
        }
    }
}

impl Identifiable for Invoice {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Amounted for Invoice {
    fn amount(&self) -> f64 {
        self.amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn cycle_closes_on_closing_day() {
        let closing = date(2025, 3, 10);
        assert_eq!(
            InvoiceStatus::from_cycle(closing, date(2025, 3, 9)),
            InvoiceStatus::Open
        );
        assert_eq!(
            InvoiceStatus::from_cycle(closing, date(2025, 3, 10)),
            InvoiceStatus::Closed
        );
    }

    #[test]
    fn refresh_keeps_paid_status() {
        let month = YearMonth::new(2025, 3).unwrap();
        let mut invoice = Invoice::new(Uuid::new_v4(), month, 10.0, date(2025, 3, 17));
        invoice.status = InvoiceStatus::Paid;
        invoice.refresh_status(date(2025, 3, 10), date(2025, 2, 1));
        assert_eq!(invoice.status, InvoiceStatus::Paid);
    }
}
