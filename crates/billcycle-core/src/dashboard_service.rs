//! Month-level aggregates for the dashboard.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use billcycle_domain::{BillStatus, Book, EntryFilter, EntryKind, YearMonth};

use crate::{
    card_service::CardService, entry_service::EntryService,
    recurrence_service::RecurrenceService, CoreError,
};

pub const UNCATEGORIZED: &str = "Uncategorized";
pub const MAX_TREND_MONTHS: u32 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CardTotals {
    pub limit: f64,
    pub used: f64,
    pub available: f64,
    pub usage_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BillTotals {
    pub pending_count: usize,
    pub pending_amount: f64,
    pub overdue_count: usize,
    pub overdue_amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MonthTotals {
    pub income: f64,
    /// Expense entries plus card purchases dated in the month.
    pub expenses: f64,
    pub card_expenses: f64,
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub month: YearMonth,
    pub cards: CardTotals,
    pub bills: BillTotals,
    pub monthly: MonthTotals,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    pub month: YearMonth,
    pub totals: MonthTotals,
}

pub struct DashboardService;

impl DashboardService {
    /// Card usage, outstanding bills and the month's cash flow.
    pub fn summary(
        book: &mut Book,
        month: YearMonth,
        today: NaiveDate,
    ) -> Result<DashboardSummary, CoreError> {
        RecurrenceService::ensure_materialized(book, month)?;

        let mut cards = CardTotals::default();
        for card in book.active_cards() {
            cards.limit += card.credit_limit;
            cards.used += CardService::total_used(book, card.id);
        }
        cards.available = cards.limit - cards.used;
        if cards.limit > 0.0 {
            cards.usage_percent = cards.used / cards.limit * 100.0;
        }

        let mut bills = BillTotals::default();
        for bill in book.bills.iter().filter(|bill| !bill.paid) {
            bills.pending_count += 1;
            bills.pending_amount += bill.amount;
            if bill.status(today) == BillStatus::Overdue {
                bills.overdue_count += 1;
                bills.overdue_amount += bill.amount;
            }
        }

        Ok(DashboardSummary {
            month,
            cards,
            bills,
            monthly: Self::month_totals(book, month),
        })
    }

    /// Income, expenses and balance of `month` as currently stored.
    pub fn month_totals(book: &Book, month: YearMonth) -> MonthTotals {
        let income = EntryService::month_total(book, month, EntryKind::Income);
        let card_expenses: f64 = book
            .purchases
            .iter()
            .filter(|purchase| month.contains(purchase.date))
            .map(|purchase| purchase.amount)
            .sum();
        let expenses = EntryService::month_total(book, month, EntryKind::Expense) + card_expenses;
        MonthTotals {
            income,
            expenses,
            card_expenses,
            balance: income - expenses,
        }
    }

    /// Expense entries and card purchases of `month` grouped by category,
    /// largest first.
    pub fn expenses_by_category(
        book: &mut Book,
        month: YearMonth,
    ) -> Result<Vec<CategoryTotal>, CoreError> {
        RecurrenceService::ensure_materialized(book, month)?;
        let mut totals: BTreeMap<String, f64> = BTreeMap::new();
        let filter = EntryFilter::new().kind(EntryKind::Expense).within(month);
        let expenses = book.find_entries(&filter);
        for entry in expenses {
            *totals.entry(category_label(entry.category.as_deref())).or_default() += entry.amount;
        }
        for purchase in book.purchases.iter().filter(|p| month.contains(p.date)) {
            *totals
                .entry(category_label(purchase.category.as_deref()))
                .or_default() += purchase.amount;
        }
        let mut rows: Vec<_> = totals
            .into_iter()
            .map(|(category, amount)| CategoryTotal { category, amount })
            .collect();
        rows.sort_by(|a, b| b.amount.total_cmp(&a.amount));
        Ok(rows)
    }

    /// Totals for the `months` months before `month`, oldest first.
    pub fn monthly_trend(
        book: &mut Book,
        month: YearMonth,
        months: u32,
    ) -> Result<Vec<TrendPoint>, CoreError> {
        if months == 0 || months > MAX_TREND_MONTHS {
            return Err(CoreError::Validation(format!(
                "trend length must be between 1 and {MAX_TREND_MONTHS}"
            )));
        }
        let mut points = Vec::new();
        for back in (1..=months as i32).rev() {
            let Some(past) = month.add_months(-back) else {
                continue;
            };
            RecurrenceService::ensure_materialized(book, past)?;
            points.push(TrendPoint {
                month: past,
                totals: Self::month_totals(book, past),
            });
        }
        Ok(points)
    }
}

fn category_label(category: Option<&str>) -> String {
    match category.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => UNCATEGORIZED.to_string(),
    }
}
