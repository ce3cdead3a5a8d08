//! Purchase registration and the installment generator.

use chrono::NaiveDate;
use tracing::{debug, info, warn};
use uuid::Uuid;

use billcycle_domain::{Book, CreditCard, Installment, Purchase};

use crate::{cycle_service::CycleService, invoice_service::PaymentOutcome, Clock, CoreError};

/// Input for [`InstallmentService::register_purchase`].
#[derive(Debug, Clone)]
pub struct PurchaseRequest {
    pub card_id: Uuid,
    pub description: String,
    pub amount: f64,
    pub date: NaiveDate,
    pub installment_count: u32,
    pub category: Option<String>,
}

impl PurchaseRequest {
    pub fn new(
        card_id: Uuid,
        description: impl Into<String>,
        amount: f64,
        date: NaiveDate,
        installment_count: u32,
    ) -> Self {
        Self {
            card_id,
            description: description.into(),
            amount,
            date,
            installment_count,
            category: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

pub struct InstallmentService;

impl InstallmentService {
    /// Splits `purchase` into its installments without storing anything.
    ///
    /// Installment `i` lands on the first statement shifted by `i - 1` months
    /// and is due on that statement's due date. Amounts are a plain division.
    pub fn generate(card: &CreditCard, purchase: &Purchase) -> Result<Vec<Installment>, CoreError> {
        if purchase.installment_count == 0 {
            return Err(CoreError::Validation(
                "installment count must be at least 1".into(),
            ));
        }
        let first = CycleService::first_statement_for(card, purchase.date)?;
        let amount = purchase.installment_amount();
        (1..=purchase.installment_count)
            .map(|sequence| {
                let statement = CycleService::statement_for_sequence(first, sequence)?;
                Ok(Installment::new(
                    purchase.id,
                    sequence,
                    purchase.installment_count,
                    amount,
                    statement,
                    CycleService::due_date_for(card, statement),
                ))
            })
            .collect()
    }

    /// Stores a purchase and all of its installments, or nothing.
    pub fn register_purchase(book: &mut Book, request: PurchaseRequest) -> Result<Uuid, CoreError> {
        Self::validate(&request)?;
        let card = book
            .card(request.card_id)
            .ok_or_else(|| CoreError::not_found("card", request.card_id))?;
        if !card.active {
            return Err(CoreError::Validation(format!(
                "card `{}` is inactive",
                card.name
            )));
        }
        let mut purchase = Purchase::new(
            request.card_id,
            request.description,
            request.amount,
            request.date,
            request.installment_count,
        );
        purchase.category = request.category;
        let installments = Self::generate(card, &purchase)?;
        let count = installments.len();
        let id = book.transact(|draft| draft.add_purchase(purchase, installments))?;
        info!(purchase = %id, installments = count, "purchase registered");
        Ok(id)
    }

    /// Deletes a purchase and its installments.
    pub fn delete_purchase(book: &mut Book, id: Uuid) -> Result<(), CoreError> {
        book.remove_purchase(id)?;
        info!(purchase = %id, "purchase removed");
        Ok(())
    }

    pub fn list_purchases(book: &Book, card_id: Uuid) -> Result<Vec<&Purchase>, CoreError> {
        if book.card(card_id).is_none() {
            return Err(CoreError::not_found("card", card_id));
        }
        let mut purchases: Vec<_> = book.purchases_of(card_id).collect();
        purchases.sort_by_key(|purchase| purchase.date);
        Ok(purchases)
    }

    pub fn installments_of(book: &Book, purchase_id: Uuid) -> Result<Vec<&Installment>, CoreError> {
        if book.purchase(purchase_id).is_none() {
            return Err(CoreError::not_found("purchase", purchase_id));
        }
        Ok(book.installments_of(purchase_id))
    }

    /// Marks one installment paid. Paying a paid installment is a no-op.
    pub fn pay_installment(
        book: &mut Book,
        id: Uuid,
        clock: &dyn Clock,
    ) -> Result<PaymentOutcome, CoreError> {
        let installment = book
            .installment_mut(id)
            .ok_or_else(|| CoreError::not_found("installment", id))?;
        if installment.paid {
            debug!(installment = %id, "installment already paid");
            return Ok(PaymentOutcome::AlreadyPaid);
        }
        installment.mark_paid(clock.now());
        book.touch();
        info!(installment = %id, "installment paid");
        Ok(PaymentOutcome::Paid)
    }

    /// Assigns statements to installments stored without one.
    ///
    /// The statement is rebuilt from the purchase's first statement plus the
    /// installment sequence, the original statement is recorded when missing
    /// and the due date is re-derived. Returns the number of installments updated.
    pub fn backfill_statements(book: &mut Book) -> Result<usize, CoreError> {
        book.transact(|draft| -> Result<usize, CoreError> {
            let pending: Vec<Uuid> = draft
                .installments
                .iter()
                .filter(|installment| installment.statement.is_none())
                .map(|installment| installment.id)
                .collect();
            let mut updated = 0;
            for id in pending {
                let Some(installment) = draft.installment(id) else {
                    continue;
                };
                let sequence = installment.sequence;
                let Some(purchase) = draft.purchase(installment.purchase_id) else {
                    warn!(installment = %id, "installment without purchase, skipping backfill");
                    continue;
                };
                let Some(card) = draft.card(purchase.card_id) else {
                    warn!(purchase = %purchase.id, "purchase without card, skipping backfill");
                    continue;
                };
                let first = CycleService::first_statement_for(card, purchase.date)?;
                let statement = CycleService::statement_for_sequence(first, sequence)?;
                let due_date = CycleService::due_date_for(card, statement);
                if let Some(installment) = draft.installment_mut(id) {
                    installment.statement = Some(statement);
                    installment.remember_original_statement(statement);
                    installment.due_date = due_date;
                    updated += 1;
                }
            }
            if updated > 0 {
                info!(updated, "installment statements backfilled");
            }
            Ok(updated)
        })
    }

    fn validate(request: &PurchaseRequest) -> Result<(), CoreError> {
        if request.description.trim().is_empty() {
            return Err(CoreError::Validation(
                "purchase description must not be empty".into(),
            ));
        }
        if !request.amount.is_finite() || request.amount <= 0.0 {
            return Err(CoreError::Validation(
                "purchase amount must be positive".into(),
            ));
        }
        if request.installment_count == 0 {
            return Err(CoreError::Validation(
                "installment count must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
