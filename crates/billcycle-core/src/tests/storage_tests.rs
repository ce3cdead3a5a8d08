use billcycle_domain::{Book, Entry, EntryKind, Purchase};
use uuid::Uuid;

use super::{book_with_card, date, month, three_installment_purchase};
use crate::book_warnings;

#[test]
fn clean_book_has_no_warnings() {
    let (mut book, card_id) = book_with_card(1000.0);
    three_installment_purchase(&mut book, card_id);

    assert!(book_warnings(&book).is_empty());
}

#[test]
fn dangling_references_are_reported() {
    let (mut book, card_id) = book_with_card(1000.0);
    let purchase_id = three_installment_purchase(&mut book, card_id);
    book.purchases
        .push(Purchase::new(Uuid::new_v4(), "Orphan", 10.0, date(2025, 1, 1), 1));
    let first = book.installments_of(purchase_id)[0].id;
    book.installment_mut(first).unwrap().statement = None;

    let warnings = book_warnings(&book);

    assert_eq!(warnings.len(), 2);
    assert!(warnings[0].contains("unknown card"));
    assert!(warnings[1].contains("no statement"));
}

#[test]
fn duplicate_occurrences_are_reported() {
    let mut book = Book::new("Dupes");
    let head = Entry::new("Salary", 5000.0, EntryKind::Income, date(2025, 1, 5)).into_series(None);
    book.add_entry(head.clone()).unwrap();
    book.entries.push(head.occurrence_for(month(2025, 2)));
    book.entries.push(head.occurrence_for(month(2025, 2)));

    let warnings = book_warnings(&book);

    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("2 occurrences in 2025-02"));
}
