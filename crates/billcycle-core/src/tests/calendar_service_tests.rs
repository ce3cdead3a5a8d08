use billcycle_domain::{Bill, EntryKind};

use super::{book_with_card, date, three_installment_purchase};
use crate::{CalendarService, CoreError, EntryRequest, EntryService, EventKind};

#[test]
fn events_combine_invoices_bills_and_entries() {
    let (mut book, card_id) = book_with_card(1000.0);
    three_installment_purchase(&mut book, card_id);
    book.add_bill(Bill::new("Electricity", 180.0, date(2025, 1, 20)));
    EntryService::add(
        &mut book,
        EntryRequest::new("Salary", 5000.0, EntryKind::Income, date(2024, 12, 5)).monthly(None),
    )
    .unwrap();

    let events =
        CalendarService::events(&mut book, date(2025, 1, 1), date(2025, 1, 31), date(2025, 1, 5))
            .unwrap();

    let kinds: Vec<_> = events.iter().map(|event| (event.date, event.kind)).collect();
    assert_eq!(
        kinds,
        vec![
            (date(2025, 1, 5), EventKind::Income),
            (date(2025, 1, 17), EventKind::Invoice),
            (date(2025, 1, 20), EventKind::Bill),
        ]
    );
    assert_eq!(events[1].amount, 100.0);
    assert_eq!(events[1].status, "open");
}

#[test]
fn consolidated_entries_and_paid_bills_are_left_out() {
    let (mut book, _) = book_with_card(1000.0);
    let mut bill = Bill::new("Water", 60.0, date(2025, 1, 10));
    bill.paid = true;
    book.add_bill(bill);
    let entry = EntryService::add(
        &mut book,
        EntryRequest::new("Bonus", 700.0, EntryKind::Income, date(2025, 1, 15)),
    )
    .unwrap();
    EntryService::consolidate(&mut book, entry, date(2025, 1, 15)).unwrap();

    let events =
        CalendarService::events(&mut book, date(2025, 1, 1), date(2025, 1, 31), date(2025, 1, 5))
            .unwrap();

    assert!(events.is_empty());
}

#[test]
fn reversed_range_is_rejected() {
    let (mut book, _) = book_with_card(1000.0);

    let err =
        CalendarService::events(&mut book, date(2025, 2, 1), date(2025, 1, 1), date(2025, 1, 5))
            .unwrap_err();

    assert!(matches!(err, CoreError::Validation(_)));
}
