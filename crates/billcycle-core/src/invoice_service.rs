//! Statement views and invoice payment.
//!
//! Invoice rows are created lazily the first time a statement with a non-zero
//! amount is read. Their amount and open/closed status are caches rewritten
//! on every read. Only paid is a stored decision.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use billcycle_domain::{total_of, Book, Installment, Invoice, InvoiceStatus, YearMonth};

use crate::{cycle_service::CycleService, Clock, CoreError};

pub const TIMELINE_PAST_MONTHS: i32 = 6;
pub const TIMELINE_FUTURE_MONTHS: i32 = 5;

/// Result of a pay or unpay action. Repeating an action is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentOutcome {
    Paid,
    AlreadyPaid,
    Unpaid,
    NotPaid,
}

impl PaymentOutcome {
    /// Whether the call changed anything.
    pub fn changed(self) -> bool {
        matches!(self, PaymentOutcome::Paid | PaymentOutcome::Unpaid)
    }
}

/// A card statement as of a given day.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementView {
    pub card_id: Uuid,
    pub card_name: String,
    pub statement: YearMonth,
    pub amount: f64,
    pub closing_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: InvoiceStatus,
    pub invoice_id: Option<Uuid>,
    pub paid_at: Option<DateTime<Utc>>,
    pub installments: Vec<Installment>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineEntry {
    pub statement: YearMonth,
    pub amount: f64,
    pub is_current: bool,
    pub is_past: bool,
    pub is_paid: bool,
}

pub struct InvoiceService;

impl InvoiceService {
    /// Sum of the installments billed on the card's statement.
    pub fn statement_amount(book: &Book, card_id: Uuid, statement: YearMonth) -> f64 {
        total_of(book.statement_installments(card_id, statement))
    }

    /// Builds the view of one statement, creating or refreshing its invoice row.
    pub fn statement_view(
        book: &mut Book,
        card_id: Uuid,
        statement: YearMonth,
        today: NaiveDate,
    ) -> Result<StatementView, CoreError> {
        let card = book
            .card(card_id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("card", card_id))?;
        let installments: Vec<Installment> = book
            .statement_installments(card_id, statement)
            .into_iter()
            .cloned()
            .collect();
        let amount = total_of(&installments);
        let closing_date = CycleService::closing_date(&card, statement);
        let due_date = CycleService::due_date_for(&card, statement);

        let existing = book.invoice_for(card_id, statement).map(|invoice| invoice.id);
        let invoice = match existing {
            Some(id) => book.invoice_mut(id).map(|invoice| {
                invoice.amount = amount;
                invoice.due_date = due_date;
                invoice.refresh_status(closing_date, today);
                invoice.clone()
            }),
            None if amount != 0.0 => {
                let mut invoice = Invoice::new(card_id, statement, amount, due_date);
                invoice.refresh_status(closing_date, today);
                book.add_invoice(invoice.clone())?;
                info!(card = %card_id, %statement, amount, "invoice created");
                Some(invoice)
            }
            None => None,
        };

        Ok(StatementView {
            card_id,
            card_name: card.name,
            statement,
            amount,
            closing_date,
            due_date,
            status: invoice
                .as_ref()
                .map(|invoice| invoice.status)
                .unwrap_or_else(|| InvoiceStatus::from_cycle(closing_date, today)),
            invoice_id: invoice.as_ref().map(|invoice| invoice.id),
            paid_at: invoice.and_then(|invoice| invoice.paid_at),
            installments,
        })
    }

    /// One view per active card with something billed or an invoice on record.
    pub fn invoices_for_month(
        book: &mut Book,
        statement: YearMonth,
        today: NaiveDate,
    ) -> Result<Vec<StatementView>, CoreError> {
        let mut cards: Vec<(String, Uuid)> = book
            .active_cards()
            .map(|card| (card.name.to_lowercase(), card.id))
            .collect();
        cards.sort();
        let mut views = Vec::new();
        for (_, card_id) in cards {
            let view = Self::statement_view(book, card_id, statement, today)?;
            if view.amount != 0.0 || view.invoice_id.is_some() {
                views.push(view);
            }
        }
        Ok(views)
    }

    /// Pays an invoice and every unpaid installment on its statement.
    pub fn pay(
        book: &mut Book,
        invoice_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<PaymentOutcome, CoreError> {
        book.transact(|draft| -> Result<PaymentOutcome, CoreError> {
            let invoice = draft
                .invoice(invoice_id)
                .ok_or_else(|| CoreError::not_found("invoice", invoice_id))?;
            if invoice.status.is_paid() {
                debug!(invoice = %invoice_id, "invoice already paid");
                return Ok(PaymentOutcome::AlreadyPaid);
            }
            let (card_id, statement) = (invoice.card_id, invoice.statement);
            let now = clock.now();
            let mut settled = 0;
            for id in draft.statement_installment_ids(card_id, statement) {
                if let Some(installment) = draft.installment_mut(id) {
                    if !installment.paid {
                        installment.mark_paid(now);
                        settled += 1;
                    }
                }
            }
            if let Some(invoice) = draft.invoice_mut(invoice_id) {
                invoice.status = InvoiceStatus::Paid;
                invoice.paid_at = Some(now);
            }
            info!(invoice = %invoice_id, %statement, installments = settled, "invoice paid");
            Ok(PaymentOutcome::Paid)
        })
    }

    /// Reverts a payment. Every installment on the statement goes back to
    /// unpaid and the status is re-derived from the closing date.
    pub fn unpay(
        book: &mut Book,
        invoice_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<PaymentOutcome, CoreError> {
        book.transact(|draft| -> Result<PaymentOutcome, CoreError> {
            let invoice = draft
                .invoice(invoice_id)
                .ok_or_else(|| CoreError::not_found("invoice", invoice_id))?;
            if !invoice.status.is_paid() {
                debug!(invoice = %invoice_id, "invoice is not paid");
                return Ok(PaymentOutcome::NotPaid);
            }
            let (card_id, statement) = (invoice.card_id, invoice.statement);
            let closing_date = draft
                .card(card_id)
                .map(|card| CycleService::closing_date(card, statement))
                .ok_or_else(|| CoreError::not_found("card", card_id))?;
            for id in draft.statement_installment_ids(card_id, statement) {
                if let Some(installment) = draft.installment_mut(id) {
                    installment.mark_unpaid();
                }
            }
            if let Some(invoice) = draft.invoice_mut(invoice_id) {
                invoice.paid_at = None;
                invoice.status = InvoiceStatus::from_cycle(closing_date, clock.today());
            }
            info!(invoice = %invoice_id, %statement, "invoice payment reverted");
            Ok(PaymentOutcome::Unpaid)
        })
    }

    /// Pays the card's statement, creating its invoice first when needed.
    pub fn pay_statement(
        book: &mut Book,
        card_id: Uuid,
        statement: YearMonth,
        clock: &dyn Clock,
    ) -> Result<PaymentOutcome, CoreError> {
        book.transact(|draft| -> Result<PaymentOutcome, CoreError> {
            let view = Self::statement_view(draft, card_id, statement, clock.today())?;
            let invoice_id = view.invoice_id.ok_or_else(|| {
                CoreError::Validation(format!("nothing billed on statement {statement}"))
            })?;
            Self::pay(draft, invoice_id, clock)
        })
    }

    pub fn unpay_statement(
        book: &mut Book,
        card_id: Uuid,
        statement: YearMonth,
        clock: &dyn Clock,
    ) -> Result<PaymentOutcome, CoreError> {
        let invoice_id = book
            .invoice_for(card_id, statement)
            .map(|invoice| invoice.id)
            .ok_or_else(|| CoreError::not_found("invoice", format!("{card_id}/{statement}")))?;
        Self::unpay(book, invoice_id, clock)
    }

    /// Twelve statement months around `today`: six past, the current one and five ahead.
    pub fn timeline(book: &Book, today: NaiveDate) -> Vec<TimelineEntry> {
        let current = YearMonth::of(today);
        let card_ids: Vec<Uuid> = book.active_cards().map(|card| card.id).collect();
        (-TIMELINE_PAST_MONTHS..=TIMELINE_FUTURE_MONTHS)
            .filter_map(|offset| current.add_months(offset))
            .map(|statement| {
                let amount = card_ids
                    .iter()
                    .map(|&card_id| Self::statement_amount(book, card_id, statement))
                    .sum();
                let mut invoices = book
                    .invoices
                    .iter()
                    .filter(|invoice| invoice.statement == statement)
                    .peekable();
                let is_paid = invoices.peek().is_some()
                    && invoices.all(|invoice| invoice.status.is_paid());
                TimelineEntry {
                    statement,
                    amount,
                    is_current: statement == current,
                    is_past: statement < current,
                    is_paid,
                }
            })
            .collect()
    }
}
