use billcycle_domain::Bill;

use super::{book_with_card, date, three_installment_purchase};
use crate::{AlertKind, AlertPriority, AlertService, AlertThresholds};

#[test]
fn upcoming_due_dates_and_high_usage_raise_alerts() {
    let (mut book, card_id) = book_with_card(350.0);
    three_installment_purchase(&mut book, card_id);
    book.add_bill(Bill::new("Internet", 100.0, date(2025, 1, 14)));
    book.add_bill(Bill::new("Gym", 90.0, date(2025, 1, 16)));
    book.add_bill(Bill::new("Insurance", 300.0, date(2025, 2, 20)));

    let alerts =
        AlertService::alerts(&mut book, date(2025, 1, 14), AlertThresholds::default()).unwrap();

    let summary: Vec<_> = alerts.iter().map(|alert| (alert.kind, alert.priority)).collect();
    assert_eq!(
        summary,
        vec![
            (AlertKind::BillDue, AlertPriority::Urgent),
            (AlertKind::BillDue, AlertPriority::High),
            (AlertKind::InvoiceDue, AlertPriority::Normal),
            (AlertKind::CardLimit, AlertPriority::Normal),
        ]
    );
}

#[test]
fn thresholds_are_configurable() {
    let (mut book, card_id) = book_with_card(1000.0);
    three_installment_purchase(&mut book, card_id);

    let quiet = AlertService::alerts(
        &mut book,
        date(2025, 1, 10),
        AlertThresholds {
            invoice_days: 2,
            ..AlertThresholds::default()
        },
    )
    .unwrap();
    let loud = AlertService::alerts(
        &mut book,
        date(2025, 1, 10),
        AlertThresholds {
            invoice_days: 7,
            bill_days: 3,
            card_usage_percent: 10.0,
        },
    )
    .unwrap();

    assert!(quiet.is_empty());
    assert_eq!(loud.len(), 2);
}
