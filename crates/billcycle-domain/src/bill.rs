//! Standalone bills (boletos) paid outside any card.

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BillStatus {
    Paid,
    Overdue,
    Pending,
}

impl fmt::Display for BillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BillStatus::Paid => "paid",
            BillStatus::Overdue => "overdue",
            BillStatus::Pending => "pending",
        };
        f.write_str(label)
    }
}

impl FromStr for BillStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "paid" => Ok(BillStatus::Paid),
            "overdue" => Ok(BillStatus::Overdue),
            "pending" => Ok(BillStatus::Pending),
            other => Err(format!("unknown bill status `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bill {
    pub id: Uuid,
    pub description: String,
    pub amount: f64,
    pub due_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    pub paid: bool,
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Bill {
    pub fn new(description: impl Into<String>, amount: f64, due_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: description.into(),
            amount,
            due_date,
            category: None,
            barcode: None,
            paid: false,
            paid_at: None,
            created_at: Utc::now(),
        }
    }

    pub fn status(&self, today: NaiveDate) -> BillStatus {
        if self.paid {
            BillStatus::Paid
        } else if self.due_date < today {
            BillStatus::Overdue
        } else {
            BillStatus::Pending
        }
    }
}

impl Identifiable for Bill {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Amounted for Bill {
    fn amount(&self) -> f64 {
        self.amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_derives_from_due_date() {
        let due = NaiveDate::from_ymd_opt(2025, 5, 10).unwrap();
        let mut bill = Bill::new("Water", 80.0, due);

        assert_eq!(bill.status(NaiveDate::from_ymd_opt(2025, 5, 10).unwrap()), BillStatus::Pending);
        assert_eq!(bill.status(NaiveDate::from_ymd_opt(2025, 5, 11).unwrap()), BillStatus::Overdue);

        bill.paid = true;
        assert_eq!(bill.status(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()), BillStatus::Paid);
    }
}
