use billcycle_domain::InvoiceStatus;

use super::{book_with_card, clock_on, date, month, three_installment_purchase};
use crate::{AnticipationService, CoreError, InvoiceService, PaymentOutcome};

#[test]
fn invoice_is_created_lazily_for_non_zero_statements() {
    let (mut book, card_id) = book_with_card(1000.0);
    three_installment_purchase(&mut book, card_id);

    let empty =
        InvoiceService::statement_view(&mut book, card_id, month(2024, 12), date(2025, 1, 5))
            .unwrap();
    let january =
        InvoiceService::statement_view(&mut book, card_id, month(2025, 1), date(2025, 1, 5))
            .unwrap();

    assert_eq!(empty.amount, 0.0);
    assert!(empty.invoice_id.is_none());
    assert_eq!(january.amount, 100.0);
    assert_eq!(january.installments.len(), 1);
    assert_eq!(january.due_date, date(2025, 1, 17));
    assert_eq!(book.invoices.len(), 1);
}

#[test]
fn status_turns_closed_on_closing_date() {
    let (mut book, card_id) = book_with_card(1000.0);
    three_installment_purchase(&mut book, card_id);

    let open = InvoiceService::statement_view(&mut book, card_id, month(2025, 1), date(2025, 1, 9))
        .unwrap();
    let closed =
        InvoiceService::statement_view(&mut book, card_id, month(2025, 1), date(2025, 1, 10))
            .unwrap();

    assert_eq!(open.status, InvoiceStatus::Open);
    assert_eq!(closed.status, InvoiceStatus::Closed);
    assert_eq!(open.invoice_id, closed.invoice_id);
}

#[test]
fn amounts_follow_anticipated_installments() {
    let (mut book, card_id) = book_with_card(1000.0);
    let purchase_id = three_installment_purchase(&mut book, card_id);
    let today = date(2025, 1, 20);
    InvoiceService::statement_view(&mut book, card_id, month(2025, 3), today).unwrap();
    let third = book.installments_of(purchase_id)[2].id;

    AnticipationService::anticipate(&mut book, purchase_id, &[third], &clock_on(2025, 1, 20))
        .unwrap();

    let february =
        InvoiceService::statement_view(&mut book, card_id, month(2025, 2), today).unwrap();
    let march = InvoiceService::statement_view(&mut book, card_id, month(2025, 3), today).unwrap();
    assert_eq!(february.amount, 200.0);
    assert_eq!(march.amount, 0.0);
    assert_eq!(
        book.invoice(march.invoice_id.unwrap()).unwrap().amount,
        0.0
    );
}

#[test]
fn pay_and_unpay_cascade_to_installments() {
    let (mut book, card_id) = book_with_card(1000.0);
    let purchase_id = three_installment_purchase(&mut book, card_id);
    let view = InvoiceService::statement_view(&mut book, card_id, month(2025, 1), date(2025, 1, 5))
        .unwrap();
    let invoice_id = view.invoice_id.unwrap();

    let paid = InvoiceService::pay(&mut book, invoice_id, &clock_on(2025, 1, 15)).unwrap();
    let again = InvoiceService::pay(&mut book, invoice_id, &clock_on(2025, 1, 15)).unwrap();

    let installments = book.installments_of(purchase_id);
    assert_eq!(paid, PaymentOutcome::Paid);
    assert_eq!(again, PaymentOutcome::AlreadyPaid);
    assert!(installments[0].paid);
    assert!(!installments[1].paid);
    assert_eq!(book.invoice(invoice_id).unwrap().status, InvoiceStatus::Paid);

    let unpaid = InvoiceService::unpay(&mut book, invoice_id, &clock_on(2025, 1, 15)).unwrap();

    let invoice = book.invoice(invoice_id).unwrap();
    assert_eq!(unpaid, PaymentOutcome::Unpaid);
    assert_eq!(invoice.status, InvoiceStatus::Closed);
    assert!(invoice.paid_at.is_none());
    assert!(book
        .installments_of(purchase_id)
        .iter()
        .all(|installment| !installment.paid));
}

#[test]
fn unpay_before_closing_rederives_open() {
    let (mut book, card_id) = book_with_card(1000.0);
    three_installment_purchase(&mut book, card_id);
    let clock = clock_on(2025, 1, 6);

    InvoiceService::pay_statement(&mut book, card_id, month(2025, 1), &clock).unwrap();
    let outcome =
        InvoiceService::unpay_statement(&mut book, card_id, month(2025, 1), &clock).unwrap();
    let repeat =
        InvoiceService::unpay_statement(&mut book, card_id, month(2025, 1), &clock).unwrap();

    let invoice = book.invoice_for(card_id, month(2025, 1)).unwrap();
    assert_eq!(outcome, PaymentOutcome::Unpaid);
    assert_eq!(repeat, PaymentOutcome::NotPaid);
    assert_eq!(invoice.status, InvoiceStatus::Open);
}

#[test]
fn unpay_reverts_installments_paid_individually() {
    let (mut book, card_id) = book_with_card(1000.0);
    let purchase_id = three_installment_purchase(&mut book, card_id);
    let clock = clock_on(2025, 1, 15);
    let first = book.installments_of(purchase_id)[0].id;
    crate::InstallmentService::pay_installment(&mut book, first, &clock).unwrap();

    InvoiceService::pay_statement(&mut book, card_id, month(2025, 1), &clock).unwrap();
    InvoiceService::unpay_statement(&mut book, card_id, month(2025, 1), &clock).unwrap();

    assert!(!book.installment(first).unwrap().paid);
}

#[test]
fn paying_an_empty_statement_is_rejected() {
    let (mut book, card_id) = book_with_card(1000.0);

    let clock = clock_on(2025, 1, 5);
    let err =
        InvoiceService::pay_statement(&mut book, card_id, month(2025, 1), &clock).unwrap_err();

    assert!(matches!(err, CoreError::Validation(_)));
    assert!(book.invoices.is_empty());
}

#[test]
fn invoices_for_month_skips_idle_cards() {
    let (mut book, card_id) = book_with_card(1000.0);
    crate::CardService::add(
        &mut book,
        billcycle_domain::CreditCard::new("Idle", 500.0, 5, None),
    )
    .unwrap();
    three_installment_purchase(&mut book, card_id);

    let views = InvoiceService::invoices_for_month(&mut book, month(2025, 2), date(2025, 1, 20))
        .unwrap();

    assert_eq!(views.len(), 1);
    assert_eq!(views[0].card_id, card_id);
}

#[test]
fn timeline_spans_twelve_months_around_today() {
    let (mut book, card_id) = book_with_card(1000.0);
    three_installment_purchase(&mut book, card_id);
    InvoiceService::pay_statement(&mut book, card_id, month(2025, 1), &clock_on(2025, 1, 15))
        .unwrap();

    let timeline = InvoiceService::timeline(&book, date(2025, 2, 3));

    assert_eq!(timeline.len(), 12);
    assert_eq!(timeline[0].statement, month(2024, 8));
    assert_eq!(timeline[11].statement, month(2025, 7));
    let current: Vec<_> = timeline.iter().filter(|entry| entry.is_current).collect();
    assert_eq!(current.len(), 1);
    assert_eq!(current[0].statement, month(2025, 2));
    assert_eq!(current[0].amount, 100.0);
    let january = timeline
        .iter()
        .find(|entry| entry.statement == month(2025, 1))
        .unwrap();
    assert!(january.is_past);
    assert!(january.is_paid);
    assert!(!current[0].is_paid);
}
