//! Recurrence materialization: one concrete occurrence per series and month.
//!
//! A series head represents its own anchor month. Every later month gets a
//! child entry, created lazily the first time the month is read. Calling
//! [`RecurrenceService::ensure_materialized`] again for the same month creates
//! nothing, and the book rejects a second child for the same slot outright.

use chrono::NaiveDate;
use tracing::{debug, info};
use uuid::Uuid;

use billcycle_domain::{Book, Entry, EntryKind, YearMonth};

use crate::CoreError;

/// Upper bound for a single [`RecurrenceService::generate_months`] call.
pub const MAX_GENERATED_MONTHS: u32 = 120;

/// Where an occurrence row comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OccurrenceSource {
    /// The series head itself, for its anchor month.
    Origin,
    /// A materialized child entry.
    Child,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OccurrenceRow {
    pub source: OccurrenceSource,
    pub origin_id: Uuid,
    pub entry_id: Uuid,
    pub description: String,
    pub amount: f64,
    pub kind: EntryKind,
    pub date: NaiveDate,
    pub consolidated: bool,
}

impl OccurrenceRow {
    fn from_entry(source: OccurrenceSource, origin_id: Uuid, entry: &Entry) -> Self {
        Self {
            source,
            origin_id,
            entry_id: entry.id,
            description: entry.description.clone(),
            amount: entry.amount,
            kind: entry.kind,
            date: entry.date,
            consolidated: entry.consolidated,
        }
    }
}

pub struct RecurrenceService;

impl RecurrenceService {
    /// Creates the missing occurrences of every series for `month` and
    /// returns how many were created.
    ///
    /// Months before a series' anchor month are never filled, and the anchor
    /// month itself is represented by the head.
    pub fn ensure_materialized(book: &mut Book, month: YearMonth) -> Result<usize, CoreError> {
        book.transact(|draft| -> Result<usize, CoreError> {
            let heads: Vec<Entry> = draft.series_heads().cloned().collect();
            let mut created = 0;
            for head in &heads {
                let anchor = head.month();
                if month < anchor {
                    debug!(series = %head.id, %month, "month precedes series start");
                    continue;
                }
                if month == anchor {
                    continue;
                }
                if draft.occurrence_of(head.id, month).is_some() {
                    continue;
                }
                draft.add_entry(head.occurrence_for(month))?;
                created += 1;
            }
            if created > 0 {
                info!(%month, created, "recurring occurrences materialized");
            }
            Ok(created)
        })
    }

    /// The entry standing for `origin_id` in `month`: the head in its anchor
    /// month, the materialized child afterwards, nothing before the anchor.
    pub fn occurrence_for_month<'a>(
        book: &'a mut Book,
        origin_id: Uuid,
        month: YearMonth,
    ) -> Result<Option<&'a Entry>, CoreError> {
        let anchor = Self::series_head(book, origin_id)?.month();
        Self::ensure_materialized(book, month)?;
        let book: &'a Book = book;
        if month == anchor {
            return Ok(book.entry(origin_id));
        }
        Ok(book.occurrence_of(origin_id, month))
    }

    /// Materializes `month` and lists one row per series occurring in it.
    pub fn list_occurrences(
        book: &mut Book,
        month: YearMonth,
        kind: Option<EntryKind>,
    ) -> Result<Vec<OccurrenceRow>, CoreError> {
        Self::ensure_materialized(book, month)?;
        let mut rows = Vec::new();
        for head in book.series_heads() {
            if kind.is_some_and(|kind| head.kind != kind) {
                continue;
            }
            if head.month() == month {
                rows.push(OccurrenceRow::from_entry(OccurrenceSource::Origin, head.id, head));
            } else if let Some(child) = book.occurrence_of(head.id, month) {
                rows.push(OccurrenceRow::from_entry(OccurrenceSource::Child, head.id, child));
            }
        }
        rows.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.description.cmp(&b.description)));
        Ok(rows)
    }

    /// Materializes `count` consecutive months starting at `start`.
    pub fn generate_months(
        book: &mut Book,
        start: YearMonth,
        count: u32,
    ) -> Result<usize, CoreError> {
        if count == 0 || count > MAX_GENERATED_MONTHS {
            return Err(CoreError::Validation(format!(
                "month count must be between 1 and {MAX_GENERATED_MONTHS}"
            )));
        }
        book.transact(|draft| -> Result<usize, CoreError> {
            let mut created = 0;
            for month in start.span(count) {
                created += Self::ensure_materialized(draft, month)?;
            }
            Ok(created)
        })
    }

    /// Removes a series head and every occurrence materialized from it.
    pub fn delete_series(book: &mut Book, origin_id: Uuid) -> Result<usize, CoreError> {
        Self::series_head(book, origin_id)?;
        let removed = book.remove_entry(origin_id)?;
        info!(series = %origin_id, removed, "recurring series removed");
        Ok(removed)
    }

    fn series_head(book: &Book, origin_id: Uuid) -> Result<&Entry, CoreError> {
        let entry = book
            .entry(origin_id)
            .ok_or_else(|| CoreError::not_found("entry", origin_id))?;
        if !entry.is_series_head() {
            return Err(CoreError::Validation(format!(
                "entry {origin_id} is not a recurring series"
            )));
        }
        Ok(entry)
    }
}
