use billcycle_domain::EntryKind;

use super::{book_with_card, date, month};
use crate::{
    DashboardService, EntryRequest, EntryService, InstallmentService, PurchaseRequest,
    UNCATEGORIZED,
};

fn february_book() -> billcycle_domain::Book {
    let (mut book, card_id) = book_with_card(1000.0);
    EntryService::add(
        &mut book,
        EntryRequest::new("Salary", 5000.0, EntryKind::Income, date(2025, 1, 5)).monthly(None),
    )
    .unwrap();
    EntryService::add(
        &mut book,
        EntryRequest::new("Rent", 1500.0, EntryKind::Expense, date(2025, 2, 7))
            .with_category("Housing"),
    )
    .unwrap();
    InstallmentService::register_purchase(
        &mut book,
        PurchaseRequest::new(card_id, "Jacket", 300.0, date(2025, 2, 3), 3),
    )
    .unwrap();
    book.add_bill(billcycle_domain::Bill::new("Water", 60.0, date(2025, 2, 1)));
    book
}

#[test]
fn summary_materializes_and_aggregates_the_month() {
    let mut book = february_book();

    let summary = DashboardService::summary(&mut book, month(2025, 2), date(2025, 2, 10)).unwrap();

    assert_eq!(summary.monthly.income, 5000.0);
    assert_eq!(summary.monthly.card_expenses, 300.0);
    assert_eq!(summary.monthly.expenses, 1800.0);
    assert_eq!(summary.monthly.balance, 3200.0);
    assert_eq!(summary.cards.limit, 1000.0);
    assert_eq!(summary.cards.used, 300.0);
    assert_eq!(summary.cards.available, 700.0);
    assert_eq!(summary.bills.pending_count, 1);
    assert_eq!(summary.bills.overdue_count, 1);
    assert_eq!(summary.bills.overdue_amount, 60.0);
}

#[test]
fn expenses_are_grouped_by_category() {
    let mut book = february_book();

    let rows = DashboardService::expenses_by_category(&mut book, month(2025, 2)).unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].category, "Housing");
    assert_eq!(rows[0].amount, 1500.0);
    assert_eq!(rows[1].category, UNCATEGORIZED);
    assert_eq!(rows[1].amount, 300.0);
}

#[test]
fn monthly_trend_covers_preceding_months() {
    let mut book = february_book();

    let trend = DashboardService::monthly_trend(&mut book, month(2025, 3), 3).unwrap();

    let months: Vec<_> = trend.iter().map(|point| point.month).collect();
    assert_eq!(months, vec![month(2024, 12), month(2025, 1), month(2025, 2)]);
    assert_eq!(trend[0].totals.income, 0.0);
    assert_eq!(trend[1].totals.income, 5000.0);
    assert_eq!(trend[2].totals.expenses, 1800.0);
}
