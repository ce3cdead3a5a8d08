//! billcycle-core
//!
//! Billing-cycle, installment, recurrence and anticipation services, plus the
//! read-side views (invoices, dashboard, calendar, alerts) built on them.
//! Depends on billcycle-domain. No CLI, no terminal I/O, no direct storage interactions.

pub mod alert_service;
pub mod anticipation_service;
pub mod bill_service;
pub mod calendar_service;
pub mod card_service;
pub mod cycle_service;
pub mod dashboard_service;
pub mod entry_service;
pub mod error;
pub mod installment_service;
pub mod invoice_service;
pub mod public_api;
pub mod recurrence_service;
pub mod storage;
pub mod time;

pub use alert_service::*;
pub use anticipation_service::*;
pub use bill_service::*;
pub use calendar_service::*;
pub use card_service::*;
pub use cycle_service::*;
pub use dashboard_service::*;
pub use entry_service::*;
pub use error::CoreError;
pub use installment_service::*;
pub use invoice_service::*;
pub use recurrence_service::*;
pub use storage::*;
pub use time::*;

#[cfg(test)]
mod tests;
