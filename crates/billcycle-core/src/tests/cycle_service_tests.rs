use billcycle_domain::CreditCard;

use super::{date, month};
use crate::{CycleService, StatementKind};

#[test]
fn purchase_on_closing_day_rolls_into_next_statement() {
    let card = CreditCard::new("Visa", 1000.0, 10, None);

    let on_closing = CycleService::first_statement_for(&card, date(2025, 3, 10)).unwrap();
    let day_before = CycleService::first_statement_for(&card, date(2025, 3, 9)).unwrap();

    assert_eq!(on_closing, month(2025, 4));
    assert_eq!(day_before, month(2025, 3));
}

#[test]
fn december_purchase_after_closing_lands_in_january() {
    let card = CreditCard::new("Visa", 1000.0, 10, None);

    let statement = CycleService::first_statement_for(&card, date(2024, 12, 15)).unwrap();

    assert_eq!(statement, month(2025, 1));
}

#[test]
fn closing_day_beyond_month_length_is_clamped() {
    let card = CreditCard::new("Visa", 1000.0, 31, Some(5));

    assert_eq!(
        CycleService::closing_date(&card, month(2025, 2)),
        date(2025, 2, 28)
    );
    assert_eq!(
        CycleService::first_statement_for(&card, date(2025, 2, 28)).unwrap(),
        month(2025, 3)
    );
    assert_eq!(
        CycleService::first_statement_for(&card, date(2025, 2, 27)).unwrap(),
        month(2025, 2)
    );
}

#[test]
fn default_due_day_overflows_short_month() {
    let card = CreditCard::new("Visa", 1000.0, 28, None);

    let due = CycleService::due_date_for(&card, month(2025, 4));

    assert_eq!(due, date(2025, 5, 5));
}

#[test]
fn explicit_due_day_within_month_is_used_as_is() {
    let card = CreditCard::new("Visa", 1000.0, 3, Some(12));

    assert_eq!(
        CycleService::due_date_for(&card, month(2025, 6)),
        date(2025, 6, 12)
    );
}

#[test]
fn open_statement_reports_kind() {
    let card = CreditCard::new("Visa", 1000.0, 10, None);

    let before = CycleService::open_statement(&card, date(2025, 5, 9)).unwrap();
    let after = CycleService::open_statement(&card, date(2025, 5, 10)).unwrap();

    assert_eq!(before.statement, month(2025, 5));
    assert_eq!(before.kind, StatementKind::Current);
    assert_eq!(after.statement, month(2025, 6));
    assert_eq!(after.kind, StatementKind::Next);
}

#[test]
fn statement_for_sequence_offsets_from_first() {
    let first = month(2025, 11);

    assert_eq!(CycleService::statement_for_sequence(first, 1).unwrap(), first);
    assert_eq!(
        CycleService::statement_for_sequence(first, 3).unwrap(),
        month(2026, 1)
    );
}
