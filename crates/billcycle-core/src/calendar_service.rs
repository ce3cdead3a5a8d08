//! Dated events (invoice, bill and entry due dates) inside a date range.

use std::fmt;

use chrono::{Days, NaiveDate};
use uuid::Uuid;

use billcycle_domain::{Book, EntryFilter, EntryKind, YearMonth};

use crate::{
    invoice_service::InvoiceService, recurrence_service::RecurrenceService, CoreError,
};

/// Widest range a single calendar query may cover.
pub const MAX_CALENDAR_MONTHS: i32 = 24;

/// Statement months before the range start whose due date can still fall in
/// the range. Due days reach at most two months past the statement month.
const DUE_DATE_LOOKBACK_MONTHS: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EventKind {
    Invoice,
    Bill,
    Income,
    Expense,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EventKind::Invoice => "invoice",
            EventKind::Bill => "bill",
            EventKind::Income => "income",
            EventKind::Expense => "expense",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEvent {
    pub date: NaiveDate,
    pub kind: EventKind,
    pub title: String,
    pub amount: f64,
    pub status: String,
    pub reference_id: Uuid,
}

pub struct CalendarService;

impl CalendarService {
    /// Unpaid invoices, unpaid bills and unconsolidated entries dated between
    /// `start` and `end` inclusive, sorted by date.
    ///
    /// Every month touched by the range is materialized first, and the
    /// statements whose due dates can land in the range are refreshed.
    pub fn events(
        book: &mut Book,
        start: NaiveDate,
        end: NaiveDate,
        today: NaiveDate,
    ) -> Result<Vec<CalendarEvent>, CoreError> {
        if end < start {
            return Err(CoreError::Validation(format!(
                "calendar range ends ({end}) before it starts ({start})"
            )));
        }
        let first_month = YearMonth::of(start);
        let span = first_month.months_until(YearMonth::of(end)) + 1;
        if span > MAX_CALENDAR_MONTHS {
            return Err(CoreError::Validation(format!(
                "calendar range may cover at most {MAX_CALENDAR_MONTHS} months"
            )));
        }
        for month in first_month.span(span as u32) {
            RecurrenceService::ensure_materialized(book, month)?;
        }

        let mut events = Vec::new();
        let statements = first_month
            .add_months(-DUE_DATE_LOOKBACK_MONTHS)
            .unwrap_or(first_month)
            .span((span + DUE_DATE_LOOKBACK_MONTHS) as u32);
        let card_ids: Vec<Uuid> = book.active_cards().map(|card| card.id).collect();
        for card_id in card_ids {
            for &statement in &statements {
                let view = InvoiceService::statement_view(book, card_id, statement, today)?;
                let Some(invoice_id) = view.invoice_id else {
                    continue;
                };
                if view.status.is_paid() || view.due_date < start || view.due_date > end {
                    continue;
                }
                events.push(CalendarEvent {
                    date: view.due_date,
                    kind: EventKind::Invoice,
                    title: format!("{} {}", view.card_name, statement),
                    amount: view.amount,
                    status: view.status.to_string(),
                    reference_id: invoice_id,
                });
            }
        }

        for bill in book
            .bills
            .iter()
            .filter(|bill| !bill.paid && bill.due_date >= start && bill.due_date <= end)
        {
            events.push(CalendarEvent {
                date: bill.due_date,
                kind: EventKind::Bill,
                title: bill.description.clone(),
                amount: bill.amount,
                status: bill.status(today).to_string(),
                reference_id: bill.id,
            });
        }

        let until = end.checked_add_days(Days::new(1)).unwrap_or(end);
        let filter = EntryFilter::new().consolidated(false).between(start, until);
        for entry in book.find_entries(&filter) {
            events.push(CalendarEvent {
                date: entry.date,
                kind: match entry.kind {
                    EntryKind::Income => EventKind::Income,
                    EntryKind::Expense => EventKind::Expense,
                },
                title: entry.description.clone(),
                amount: entry.amount,
                status: "scheduled".to_string(),
                reference_id: entry.id,
            });
        }

        events.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then(a.kind.cmp(&b.kind))
                .then_with(|| a.title.cmp(&b.title))
        });
        Ok(events)
    }
}
