//! Bills (boletos): standalone payables with a due date.

use chrono::NaiveDate;
use tracing::{debug, info};
use uuid::Uuid;

use billcycle_domain::{Bill, BillStatus, Book, YearMonth};

use crate::{invoice_service::PaymentOutcome, Clock, CoreError};

/// Field changes applied by [`BillService::update`].
#[derive(Debug, Clone, Default)]
pub struct BillChanges {
    pub description: Option<String>,
    pub amount: Option<f64>,
    pub due_date: Option<NaiveDate>,
    pub category: Option<Option<String>>,
    pub barcode: Option<Option<String>>,
}

/// Filter for [`BillService::list`]. Status is evaluated against `today`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BillQuery {
    pub month: Option<YearMonth>,
    pub status: Option<BillStatus>,
}

pub struct BillService;

impl BillService {
    pub fn add(book: &mut Book, bill: Bill) -> Result<Uuid, CoreError> {
        Self::validate(&bill)?;
        let id = book.add_bill(bill);
        info!(bill = %id, "bill added");
        Ok(id)
    }

    pub fn update(book: &mut Book, id: Uuid, changes: BillChanges) -> Result<(), CoreError> {
        let mut updated = book
            .bill(id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("bill", id))?;
        if let Some(description) = changes.description {
            updated.description = description;
        }
        if let Some(amount) = changes.amount {
            updated.amount = amount;
        }
        if let Some(due_date) = changes.due_date {
            updated.due_date = due_date;
        }
        if let Some(category) = changes.category {
            updated.category = category;
        }
        if let Some(barcode) = changes.barcode {
            updated.barcode = barcode;
        }
        Self::validate(&updated)?;
        if let Some(bill) = book.bill_mut(id) {
            *bill = updated;
        }
        book.touch();
        Ok(())
    }

    pub fn pay(book: &mut Book, id: Uuid, clock: &dyn Clock) -> Result<PaymentOutcome, CoreError> {
        let bill = book
            .bill_mut(id)
            .ok_or_else(|| CoreError::not_found("bill", id))?;
        if bill.paid {
            debug!(bill = %id, "bill already paid");
            return Ok(PaymentOutcome::AlreadyPaid);
        }
        bill.paid = true;
        bill.paid_at = Some(clock.now());
        book.touch();
        info!(bill = %id, "bill paid");
        Ok(PaymentOutcome::Paid)
    }

    pub fn remove(book: &mut Book, id: Uuid) -> Result<(), CoreError> {
        book.remove_bill(id)?;
        info!(bill = %id, "bill removed");
        Ok(())
    }

    /// Bills matching `query`, ordered by due date.
    pub fn list<'a>(book: &'a Book, query: BillQuery, today: NaiveDate) -> Vec<&'a Bill> {
        let mut bills: Vec<_> = book
            .bills
            .iter()
            .filter(|bill| query.month.map_or(true, |month| month.contains(bill.due_date)))
            .filter(|bill| query.status.map_or(true, |status| bill.status(today) == status))
            .collect();
        bills.sort_by_key(|bill| bill.due_date);
        bills
    }

    fn validate(bill: &Bill) -> Result<(), CoreError> {
        if bill.description.trim().is_empty() {
            return Err(CoreError::Validation(
                "bill description must not be empty".into(),
            ));
        }
        if !bill.amount.is_finite() || bill.amount <= 0.0 {
            return Err(CoreError::Validation("bill amount must be positive".into()));
        }
        Ok(())
    }
}
