//! Card purchases and the installments they are split into.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{common::*, YearMonth};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Purchase {
    pub id: Uuid,
    pub card_id: Uuid,
    pub description: String,
    pub amount: f64,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub installment_count: u32,
    pub created_at: DateTime<Utc>,
}

impl Purchase {
    pub fn new(
        card_id: Uuid,
        description: impl Into<String>,
        amount: f64,
        date: NaiveDate,
        installment_count: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            card_id,
            description: description.into(),
            amount,
            date,
            category: None,
            installment_count,
            created_at: Utc::now(),
        }
    }

    /// Per-installment amount. Plain division: `amount / n` times `n` may not
    /// add back up to `amount` to the cent.
    pub fn installment_amount(&self) -> f64 {
        self.amount / f64::from(self.installment_count.max(1))
    }
}

impl Identifiable for Purchase {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Amounted for Purchase {
    fn amount(&self) -> f64 {
        self.amount
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Installment {
    pub id: Uuid,
    pub purchase_id: Uuid,
    /// 1-based position within the purchase.
    pub sequence: u32,
    pub total: u32,
    pub amount: f64,
    /// Derived from `statement` and the card's due day.
    pub due_date: NaiveDate,
    /// Statement the installment is billed on. Authoritative for invoice membership.
    #[serde(default)]
    pub statement: Option<YearMonth>,
    /// First statement ever assigned. Written once.
    #[serde(default)]
    pub original_statement: Option<YearMonth>,
    #[serde(default)]
    pub anticipated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub anticipated_from: Option<YearMonth>,
    pub paid: bool,
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
}

impl Installment {
    pub fn new(
        purchase_id: Uuid,
        sequence: u32,
        total: u32,
        amount: f64,
        statement: YearMonth,
        due_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            purchase_id,
            sequence,
            total,
            amount,
            due_date,
            statement: Some(statement),
            original_statement: Some(statement),
            anticipated_at: None,
            anticipated_from: None,
            paid: false,
            paid_at: None,
        }
    }

    pub fn is_on_statement(&self, month: YearMonth) -> bool {
        self.statement == Some(month)
    }

    /// Records the first-ever statement unless one is already stored.
    pub fn remember_original_statement(&mut self, month: YearMonth) {
        if self.original_statement.is_none() {
            self.original_statement = Some(month);
        }
    }

    pub fn mark_paid(&mut self, at: DateTime<Utc>) {
        self.paid = true;
        self.paid_at = Some(at);
    }

    pub fn mark_unpaid(&mut self) {
        self.paid = false;
        self.paid_at = None;
    }

    pub fn was_anticipated(&self) -> bool {
        self.anticipated_at.is_some()
    }
}

impl Identifiable for Installment {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Amounted for Installment {
    fn amount(&self) -> f64 {
        self.amount
    }
}

impl fmt::Display for Installment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.sequence, self.total)
    }
}
