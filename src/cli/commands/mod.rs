//! One module per top-level command. Each exposes its clap definition and a
//! `run` entry point; mutating commands save the book before returning.

pub mod backup;
pub mod bill;
pub mod card;
pub mod config;
pub mod entry;
pub mod invoice;
pub mod purchase;
pub mod recurring;
pub mod report;

use uuid::Uuid;

/// First eight characters of an id, enough to tell rows apart in listings.
pub(crate) fn short_id(id: Uuid) -> String {
    id.to_string()[..8].to_string()
}
