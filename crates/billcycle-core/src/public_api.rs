//! Stable, public-facing helpers that wrap the internal service layer.
//!
//! This module exposes the engine operations front ends (CLI, HTTP adapters)
//! rely on without depending on the entire service surface area.

use chrono::NaiveDate;
use uuid::Uuid;

use billcycle_domain::{Book, CreditCard, EntryKind, Installment, Purchase, YearMonth};

use crate::{
    anticipation_service::{AnticipationReport, AnticipationService},
    cycle_service::{CycleService, OpenStatement},
    installment_service::InstallmentService,
    invoice_service::{InvoiceService, PaymentOutcome},
    recurrence_service::{OccurrenceRow, RecurrenceService},
    Clock, CoreError,
};

/// Statement the first installment of a purchase made on `date` is billed on.
pub fn api_resolve_statement_for_purchase(
    card: &CreditCard,
    date: NaiveDate,
) -> Result<YearMonth, CoreError> {
    CycleService::first_statement_for(card, date)
}

/// Splits a purchase into dated installments without storing them.
pub fn api_generate_installments(
    card: &CreditCard,
    purchase: &Purchase,
) -> Result<Vec<Installment>, CoreError> {
    InstallmentService::generate(card, purchase)
}

pub fn api_due_date_for_statement(card: &CreditCard, statement: YearMonth) -> NaiveDate {
    CycleService::due_date_for(card, statement)
}

/// Creates the missing recurring occurrences of `month`, returning how many were created.
pub fn api_ensure_recurring_materialized(
    book: &mut Book,
    month: YearMonth,
) -> Result<usize, CoreError> {
    RecurrenceService::ensure_materialized(book, month)
}

pub fn api_list_occurrences_for_month(
    book: &mut Book,
    month: YearMonth,
    kind: Option<EntryKind>,
) -> Result<Vec<OccurrenceRow>, CoreError> {
    RecurrenceService::list_occurrences(book, month, kind)
}

pub fn api_suggest_anticipation_target(
    card: &CreditCard,
    clock: &dyn Clock,
) -> Result<OpenStatement, CoreError> {
    AnticipationService::suggest_target(card, clock)
}

pub fn api_anticipate_installments(
    book: &mut Book,
    purchase_id: Uuid,
    installment_ids: &[Uuid],
    clock: &dyn Clock,
) -> Result<AnticipationReport, CoreError> {
    AnticipationService::anticipate(book, purchase_id, installment_ids, clock)
}

/// Pays an invoice and cascades the payment to its installments.
pub fn api_pay_invoice(
    book: &mut Book,
    invoice_id: Uuid,
    clock: &dyn Clock,
) -> Result<PaymentOutcome, CoreError> {
    InvoiceService::pay(book, invoice_id, clock)
}

/// Reverts an invoice payment and re-derives its status.
pub fn api_unpay_invoice(
    book: &mut Book,
    invoice_id: Uuid,
    clock: &dyn Clock,
) -> Result<PaymentOutcome, CoreError> {
    InvoiceService::unpay(book, invoice_id, clock)
}
