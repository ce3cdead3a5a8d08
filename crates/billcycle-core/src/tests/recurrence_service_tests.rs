use uuid::Uuid;

use billcycle_domain::{Book, EntryKind};

use super::{date, month};
use crate::{CoreError, EntryRequest, EntryService, OccurrenceSource, RecurrenceService};

fn salary_book(anchor_month: u32, recurring_day: Option<u32>) -> (Book, Uuid) {
    let mut book = Book::new("Recurring");
    let id = EntryService::add(
        &mut book,
        EntryRequest::new("Salary", 5000.0, EntryKind::Income, date(2025, anchor_month, 5))
            .monthly(recurring_day),
    )
    .expect("add series");
    (book, id)
}

#[test]
fn materialization_is_idempotent() {
    let (mut book, origin_id) = salary_book(1, None);

    let first = RecurrenceService::ensure_materialized(&mut book, month(2025, 3)).unwrap();
    let snapshot = book.entries.clone();
    let second = RecurrenceService::ensure_materialized(&mut book, month(2025, 3)).unwrap();

    assert_eq!(first, 1);
    assert_eq!(second, 0);
    assert_eq!(book.entries, snapshot);
    assert_eq!(book.children_of(origin_id).count(), 1);
}

#[test]
fn materializing_nothing_leaves_updated_at_alone() {
    let mut empty = Book::new("Empty");
    let empty_stamp = empty.updated_at;
    let (mut book, _) = salary_book(1, None);
    RecurrenceService::ensure_materialized(&mut book, month(2025, 3)).unwrap();
    let stamp = book.updated_at;

    let none = RecurrenceService::ensure_materialized(&mut empty, month(2025, 3)).unwrap();
    let again = RecurrenceService::ensure_materialized(&mut book, month(2025, 3)).unwrap();

    assert_eq!(none, 0);
    assert_eq!(again, 0);
    assert_eq!(empty.updated_at, empty_stamp);
    assert_eq!(book.updated_at, stamp);
}

#[test]
fn nothing_is_materialized_before_inception() {
    let (mut book, origin_id) = salary_book(6, None);

    let created = RecurrenceService::ensure_materialized(&mut book, month(2025, 3)).unwrap();

    assert_eq!(created, 0);
    assert_eq!(book.children_of(origin_id).count(), 0);
}

#[test]
fn anchor_month_is_represented_by_the_origin() {
    let (mut book, origin_id) = salary_book(6, None);

    let created = RecurrenceService::ensure_materialized(&mut book, month(2025, 6)).unwrap();
    let occurrence =
        RecurrenceService::occurrence_for_month(&mut book, origin_id, month(2025, 6)).unwrap();

    assert_eq!(created, 0);
    assert_eq!(occurrence.map(|entry| entry.id), Some(origin_id));
}

#[test]
fn occurrence_for_later_month_is_a_child() {
    let (mut book, origin_id) = salary_book(6, None);

    let occurrence =
        RecurrenceService::occurrence_for_month(&mut book, origin_id, month(2025, 8))
            .unwrap()
            .cloned()
            .expect("materialized occurrence");

    assert_ne!(occurrence.id, origin_id);
    assert_eq!(occurrence.parent_id, Some(origin_id));
    assert_eq!(occurrence.date, date(2025, 8, 5));
    assert!(!occurrence.recurring);
    assert!(!occurrence.consolidated);
    assert_eq!(occurrence.amount, 5000.0);
}

#[test]
fn occurrence_before_inception_is_none() {
    let (mut book, origin_id) = salary_book(6, None);

    let occurrence =
        RecurrenceService::occurrence_for_month(&mut book, origin_id, month(2025, 2)).unwrap();

    assert!(occurrence.is_none());
}

#[test]
fn recurring_day_is_clamped_to_short_months() {
    let mut book = Book::new("Clamp");
    let rent = EntryService::add(
        &mut book,
        EntryRequest::new("Rent", 1500.0, EntryKind::Expense, date(2024, 1, 31)).monthly(Some(31)),
    )
    .unwrap();

    let leap = RecurrenceService::occurrence_for_month(&mut book, rent, month(2024, 2))
        .unwrap()
        .map(|entry| entry.date);
    let common = RecurrenceService::occurrence_for_month(&mut book, rent, month(2025, 2))
        .unwrap()
        .map(|entry| entry.date);

    assert_eq!(leap, Some(date(2024, 2, 29)));
    assert_eq!(common, Some(date(2025, 2, 28)));
}

#[test]
fn list_occurrences_marks_origin_and_children() {
    let (mut book, origin_id) = salary_book(1, None);
    EntryService::add(
        &mut book,
        EntryRequest::new("Gym", 90.0, EntryKind::Expense, date(2025, 2, 1)).monthly(None),
    )
    .unwrap();

    let january = RecurrenceService::list_occurrences(&mut book, month(2025, 1), None).unwrap();
    let february = RecurrenceService::list_occurrences(&mut book, month(2025, 2), None).unwrap();
    let incomes =
        RecurrenceService::list_occurrences(&mut book, month(2025, 2), Some(EntryKind::Income))
            .unwrap();

    assert_eq!(january.len(), 1);
    assert_eq!(january[0].source, OccurrenceSource::Origin);
    assert_eq!(january[0].entry_id, origin_id);

    assert_eq!(february.len(), 2);
    assert_eq!(february[0].description, "Gym");
    assert_eq!(february[0].source, OccurrenceSource::Origin);
    assert_eq!(february[1].source, OccurrenceSource::Child);
    assert_eq!(february[1].origin_id, origin_id);

    assert_eq!(incomes.len(), 1);
    assert_eq!(incomes[0].kind, EntryKind::Income);
}

#[test]
fn generate_months_fills_a_bounded_range_once() {
    let (mut book, origin_id) = salary_book(1, None);

    let created = RecurrenceService::generate_months(&mut book, month(2025, 1), 4).unwrap();
    let repeated = RecurrenceService::generate_months(&mut book, month(2025, 1), 4).unwrap();

    assert_eq!(created, 3);
    assert_eq!(repeated, 0);
    assert_eq!(book.children_of(origin_id).count(), 3);
}

#[test]
fn generate_months_rejects_empty_range() {
    let (mut book, _) = salary_book(1, None);

    let err = RecurrenceService::generate_months(&mut book, month(2025, 1), 0).unwrap_err();

    assert!(matches!(err, CoreError::Validation(_)));
}

#[test]
fn delete_series_removes_children() {
    let (mut book, origin_id) = salary_book(1, None);
    RecurrenceService::generate_months(&mut book, month(2025, 2), 2).unwrap();

    let removed = RecurrenceService::delete_series(&mut book, origin_id).unwrap();

    assert_eq!(removed, 3);
    assert!(book.entries.is_empty());
}

#[test]
fn occurrence_for_month_rejects_plain_entries() {
    let mut book = Book::new("Plain");
    let gift = EntryService::add(
        &mut book,
        EntryRequest::new("Gift", 50.0, EntryKind::Income, date(2025, 1, 5)),
    )
    .unwrap();

    let err = RecurrenceService::occurrence_for_month(&mut book, gift, month(2025, 2)).unwrap_err();

    assert!(matches!(err, CoreError::Validation(_)));
}
