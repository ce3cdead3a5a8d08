//! Billing-cycle resolution: which statement a date belongs to and when it is due.
//!
//! Every other service asks this one. Installment generation, anticipation and
//! invoice views must agree on cycle boundaries, so none of them recompute
//! closing or due dates on their own.

use chrono::NaiveDate;

use billcycle_domain::{calendar::resolve_due_date, CreditCard, YearMonth};

use crate::CoreError;

/// Whether a statement is the one of the current calendar month or the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Current,
    Next,
}

impl StatementKind {
    pub fn label(self) -> &'static str {
        match self {
            StatementKind::Current => "current",
            StatementKind::Next => "next",
        }
    }
}

/// A statement still open for changes on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenStatement {
    pub statement: YearMonth,
    pub kind: StatementKind,
}

pub struct CycleService;

impl CycleService {
    /// The day the card's statement for `month` closes, clamped to the month length.
    pub fn closing_date(card: &CreditCard, month: YearMonth) -> NaiveDate {
        card.closing_date(month)
    }

    /// Whether the statement for `month` has closed by `today`.
    pub fn is_closed(card: &CreditCard, month: YearMonth, today: NaiveDate) -> bool {
        today >= Self::closing_date(card, month)
    }

    /// The statement still accepting charges on `date`.
    ///
    /// On or after this month's closing date the cycle has rolled over to next month.
    pub fn open_statement(card: &CreditCard, date: NaiveDate) -> Result<OpenStatement, CoreError> {
        let month = YearMonth::of(date);
        if Self::is_closed(card, month, date) {
            let statement = month.next().ok_or_else(|| out_of_range(month))?;
            Ok(OpenStatement {
                statement,
                kind: StatementKind::Next,
            })
        } else {
            Ok(OpenStatement {
                statement: month,
                kind: StatementKind::Current,
            })
        }
    }

    /// Statement of the first installment of a purchase made on `purchase_date`.
    pub fn first_statement_for(
        card: &CreditCard,
        purchase_date: NaiveDate,
    ) -> Result<YearMonth, CoreError> {
        Ok(Self::open_statement(card, purchase_date)?.statement)
    }

    /// Statement of installment `sequence` (1-based) given the first one.
    pub fn statement_for_sequence(
        first: YearMonth,
        sequence: u32,
    ) -> Result<YearMonth, CoreError> {
        let offset = i32::try_from(sequence.saturating_sub(1))
            .map_err(|_| CoreError::Validation(format!("installment {sequence} out of range")))?;
        first.add_months(offset).ok_or_else(|| out_of_range(first))
    }

    /// Due date of the card's statement for `statement`.
    ///
    /// Uses the card's due day, or closing day + 7 when unset. Due days past the
    /// end of the month overflow into the following month.
    pub fn due_date_for(card: &CreditCard, statement: YearMonth) -> NaiveDate {
        resolve_due_date(statement, card.effective_due_day())
    }
}

fn out_of_range(month: YearMonth) -> CoreError {
    CoreError::Validation(format!("statement cycle after {month} is out of range"))
}
