#![doc(test(attr(deny(warnings))))]

//! billcycle tracks credit card statements, installment purchases, recurring
//! income and expenses, and bills, and answers "what do I owe and when".
//!
//! The library crates hold the model and the services; this crate wires them
//! to disk and exposes the `billcycle` command-line tool.

pub mod cli;
pub mod errors;
pub mod utils;

pub use errors::AppError;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("billcycle tracing initialized");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
