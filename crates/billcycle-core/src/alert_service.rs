//! Derived notices about upcoming due dates and card limits. Nothing here is stored.

use chrono::NaiveDate;
use uuid::Uuid;

use billcycle_domain::{Book, YearMonth};

use crate::{card_service::CardService, invoice_service::InvoiceService, CoreError};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertThresholds {
    /// Days ahead an unpaid invoice starts being reported.
    pub invoice_days: u32,
    /// Days ahead an unpaid bill starts being reported.
    pub bill_days: u32,
    /// Card usage percentage above which a card is reported.
    pub card_usage_percent: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            invoice_days: 5,
            bill_days: 3,
            card_usage_percent: 80.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    InvoiceDue,
    BillDue,
    CardLimit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AlertPriority {
    Normal,
    High,
    Urgent,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub kind: AlertKind,
    pub priority: AlertPriority,
    pub message: String,
    pub reference_id: Uuid,
}

pub struct AlertService;

impl AlertService {
    /// Invoices and bills due within their thresholds, and cards over the usage threshold.
    /// Most urgent first.
    pub fn alerts(
        book: &mut Book,
        today: NaiveDate,
        thresholds: AlertThresholds,
    ) -> Result<Vec<Alert>, CoreError> {
        let mut alerts = Vec::new();
        let current = YearMonth::of(today);
        let statements: Vec<YearMonth> = [-2, -1, 0, 1]
            .into_iter()
            .filter_map(|offset| current.add_months(offset))
            .collect();
        let card_ids: Vec<Uuid> = book.active_cards().map(|card| card.id).collect();

        for &card_id in &card_ids {
            for &statement in &statements {
                let view = InvoiceService::statement_view(book, card_id, statement, today)?;
                let Some(invoice_id) = view.invoice_id else {
                    continue;
                };
                if view.status.is_paid() {
                    continue;
                }
                let Some(days_left) = days_within(today, view.due_date, thresholds.invoice_days)
                else {
                    continue;
                };
                alerts.push(Alert {
                    kind: AlertKind::InvoiceDue,
                    priority: if days_left <= 2 {
                        AlertPriority::High
                    } else {
                        AlertPriority::Normal
                    },
                    message: format!(
                        "{} invoice {} due {} ({:.2}, {} day(s) left)",
                        view.card_name, statement, view.due_date, view.amount, days_left
                    ),
                    reference_id: invoice_id,
                });
            }
        }

        for bill in book.bills.iter().filter(|bill| !bill.paid) {
            let Some(days_left) = days_within(today, bill.due_date, thresholds.bill_days) else {
                continue;
            };
            alerts.push(Alert {
                kind: AlertKind::BillDue,
                priority: if days_left == 0 {
                    AlertPriority::Urgent
                } else {
                    AlertPriority::High
                },
                message: format!(
                    "{} due {} ({:.2}, {} day(s) left)",
                    bill.description, bill.due_date, bill.amount, days_left
                ),
                reference_id: bill.id,
            });
        }

        for &card_id in &card_ids {
            let usage = CardService::usage(book, card_id)?;
            if usage.percent() > thresholds.card_usage_percent {
                let name = book.card(card_id).map(|card| card.name.as_str()).unwrap_or("");
                alerts.push(Alert {
                    kind: AlertKind::CardLimit,
                    priority: AlertPriority::Normal,
                    message: format!(
                        "{} is using {:.1}% of its limit ({:.2} available)",
                        name,
                        usage.percent(),
                        usage.available
                    ),
                    reference_id: card_id,
                });
            }
        }

        alerts.sort_by(|a, b| b.priority.cmp(&a.priority));
        Ok(alerts)
    }
}

/// Days from `today` to `due` when `due` lies within `window` days ahead.
fn days_within(today: NaiveDate, due: NaiveDate, window: u32) -> Option<i64> {
    let days_left = (due - today).num_days();
    (0..=i64::from(window)).contains(&days_left).then_some(days_left)
}
