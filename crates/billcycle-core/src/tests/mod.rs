mod alert_service_tests;
mod calendar_service_tests;
mod cycle_service_tests;
mod dashboard_service_tests;
mod invoice_service_tests;
mod recurrence_service_tests;
mod storage_tests;

use chrono::NaiveDate;
use uuid::Uuid;

use billcycle_domain::{Book, CreditCard, YearMonth};

use crate::{CardService, FixedClock, InstallmentService, PurchaseRequest};

pub(crate) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub(crate) fn month(year: i32, month: u32) -> YearMonth {
    YearMonth::new(year, month).unwrap()
}

pub(crate) fn clock_on(year: i32, month: u32, day: u32) -> FixedClock {
    FixedClock::on(date(year, month, day))
}

/// A book holding one card closing on the 10th with the default due day (17th).
pub(crate) fn book_with_card(limit: f64) -> (Book, Uuid) {
    let mut book = Book::new("Tests");
    let card_id = CardService::add(&mut book, CreditCard::new("Visa", limit, 10, None))
        .expect("add card");
    (book, card_id)
}

/// Registers a 300.00 purchase in three installments on 2025-01-05,
/// billed on the January, February and March statements.
pub(crate) fn three_installment_purchase(book: &mut Book, card_id: Uuid) -> Uuid {
    InstallmentService::register_purchase(
        book,
        PurchaseRequest::new(card_id, "Headphones", 300.0, date(2025, 1, 5), 3),
    )
    .expect("register purchase")
}
