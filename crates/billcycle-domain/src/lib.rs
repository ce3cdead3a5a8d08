//! billcycle-domain
//!
//! Pure domain models (cards, purchases, installments, invoices, entries, bills)
//! plus the calendar math every cycle calculation builds on.
//! No I/O, no CLI, no storage. Only data types, core enums and the in-memory book.

pub mod bill;
pub mod book;
pub mod calendar;
pub mod card;
pub mod common;
pub mod entry;
pub mod invoice;
pub mod purchase;
pub mod year_month;

pub use bill::*;
pub use book::*;
pub use card::*;
pub use common::*;
pub use entry::*;
pub use invoice::*;
pub use purchase::*;
pub use year_month::*;
