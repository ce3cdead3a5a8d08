//! Income and expense lines: one-off entries, recurring series heads and
//! their occurrences.

use chrono::NaiveDate;
use tracing::{debug, info};
use uuid::Uuid;

use billcycle_domain::{Book, Entry, EntryFilter, EntryKind, YearMonth};

use crate::{recurrence_service::RecurrenceService, CoreError};

/// Input for [`EntryService::add`].
#[derive(Debug, Clone)]
pub struct EntryRequest {
    pub description: String,
    pub amount: f64,
    pub kind: EntryKind,
    pub date: NaiveDate,
    pub category: Option<String>,
    pub recurring: bool,
    pub recurring_day: Option<u32>,
}

impl EntryRequest {
    pub fn new(
        description: impl Into<String>,
        amount: f64,
        kind: EntryKind,
        date: NaiveDate,
    ) -> Self {
        Self {
            description: description.into(),
            amount,
            kind,
            date,
            category: None,
            recurring: false,
            recurring_day: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Makes the entry the head of a monthly series.
    pub fn monthly(mut self, recurring_day: Option<u32>) -> Self {
        self.recurring = true;
        self.recurring_day = recurring_day;
        self
    }
}

/// Field changes applied by [`EntryService::update`]. `None` leaves a field as is.
#[derive(Debug, Clone, Default)]
pub struct EntryChanges {
    pub description: Option<String>,
    pub amount: Option<f64>,
    pub kind: Option<EntryKind>,
    pub date: Option<NaiveDate>,
    pub category: Option<Option<String>>,
    /// Only series heads carry a preferred day.
    pub recurring_day: Option<Option<u32>>,
}

/// Result of a consolidation toggle. Repeating a toggle is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsolidationOutcome {
    Consolidated,
    AlreadyConsolidated,
    Unconsolidated,
    NotConsolidated,
}

pub struct EntryService;

impl EntryService {
    pub fn add(book: &mut Book, request: EntryRequest) -> Result<Uuid, CoreError> {
        Self::validate(&request)?;
        let mut entry = Entry::new(request.description, request.amount, request.kind, request.date);
        entry.category = request.category;
        if request.recurring {
            entry = entry.into_series(request.recurring_day);
        }
        let id = book.add_entry(entry)?;
        info!(entry = %id, recurring = request.recurring, "entry added");
        Ok(id)
    }

    /// Edits one entry in place. Editing a series head changes future
    /// occurrences only; children already materialized keep their values.
    pub fn update(book: &mut Book, id: Uuid, changes: EntryChanges) -> Result<(), CoreError> {
        let mut updated = book
            .entry(id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("entry", id))?;
        if let Some(description) = changes.description {
            updated.description = description;
        }
        if let Some(amount) = changes.amount {
            updated.amount = amount;
        }
        if let Some(kind) = changes.kind {
            updated.kind = kind;
        }
        if let Some(date) = changes.date {
            updated.date = date;
        }
        if let Some(category) = changes.category {
            updated.category = category;
        }
        if let Some(recurring_day) = changes.recurring_day {
            if !updated.is_series_head() {
                return Err(CoreError::Validation(
                    "only recurring entries have a recurring day".into(),
                ));
            }
            updated.recurring_day = recurring_day;
        }
        Self::check(&updated.description, updated.amount, updated.recurring_day)?;
        if let Some(origin_id) = updated.parent_id {
            let month = updated.month();
            let taken = book
                .occurrence_of(origin_id, month)
                .is_some_and(|other| other.id != id);
            if taken {
                return Err(CoreError::Duplicate(format!(
                    "series {} already has an occurrence in {}",
                    origin_id, month
                )));
            }
        }
        if let Some(entry) = book.entry_mut(id) {
            *entry = updated;
        }
        book.touch();
        info!(entry = %id, "entry updated");
        Ok(())
    }

    /// Marks money as moved for an entry, recording `on` as the settlement date.
    pub fn consolidate(
        book: &mut Book,
        id: Uuid,
        on: NaiveDate,
    ) -> Result<ConsolidationOutcome, CoreError> {
        let entry = book
            .entry_mut(id)
            .ok_or_else(|| CoreError::not_found("entry", id))?;
        if entry.consolidated {
            debug!(entry = %id, "entry already consolidated");
            return Ok(ConsolidationOutcome::AlreadyConsolidated);
        }
        entry.consolidated = true;
        entry.consolidated_at = Some(on);
        book.touch();
        info!(entry = %id, "entry consolidated");
        Ok(ConsolidationOutcome::Consolidated)
    }

    pub fn unconsolidate(book: &mut Book, id: Uuid) -> Result<ConsolidationOutcome, CoreError> {
        let entry = book
            .entry_mut(id)
            .ok_or_else(|| CoreError::not_found("entry", id))?;
        if !entry.consolidated {
            return Ok(ConsolidationOutcome::NotConsolidated);
        }
        entry.consolidated = false;
        entry.consolidated_at = None;
        book.touch();
        info!(entry = %id, "entry consolidation reverted");
        Ok(ConsolidationOutcome::Unconsolidated)
    }

    /// Deletes an entry. A series head takes its occurrences along; any other
    /// entry is removed alone. Returns the number of rows removed.
    pub fn delete(book: &mut Book, id: Uuid) -> Result<usize, CoreError> {
        let is_head = book
            .entry(id)
            .ok_or_else(|| CoreError::not_found("entry", id))?
            .is_series_head();
        if is_head {
            return RecurrenceService::delete_series(book, id);
        }
        let removed = book.remove_entry(id)?;
        info!(entry = %id, "entry removed");
        Ok(removed)
    }

    /// Entries dated in `month` after materializing its recurring occurrences.
    pub fn list_for_month(
        book: &mut Book,
        month: YearMonth,
        kind: Option<EntryKind>,
    ) -> Result<Vec<Entry>, CoreError> {
        RecurrenceService::ensure_materialized(book, month)?;
        let mut filter = EntryFilter::new().within(month);
        filter.kind = kind;
        Ok(book.find_entries(&filter).into_iter().cloned().collect())
    }

    /// Sum of entries of `kind` dated in `month`. Does not materialize.
    pub fn month_total(book: &Book, month: YearMonth, kind: EntryKind) -> f64 {
        book.find_entries(&EntryFilter::new().kind(kind).within(month))
            .into_iter()
            .map(|entry| entry.amount)
            .sum()
    }

    fn validate(request: &EntryRequest) -> Result<(), CoreError> {
        Self::check(&request.description, request.amount, request.recurring_day)
    }

    fn check(description: &str, amount: f64, recurring_day: Option<u32>) -> Result<(), CoreError> {
        if description.trim().is_empty() {
            return Err(CoreError::Validation(
                "entry description must not be empty".into(),
            ));
        }
        if !amount.is_finite() || amount <= 0.0 {
            return Err(CoreError::Validation("entry amount must be positive".into()));
        }
        if let Some(day) = recurring_day {
            if !(1..=31).contains(&day) {
                return Err(CoreError::Validation(
                    "recurring day must be between 1 and 31".into(),
                ));
            }
        }
        Ok(())
    }
}
