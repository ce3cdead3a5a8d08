//! The book: every record of one personal-finance file, held in memory.
//!
//! Services never touch storage directly. They read and mutate a [`Book`],
//! and a storage backend persists the whole document. Foreign keys and the
//! one-occurrence-per-month rule are enforced here on insert, the same place
//! a relational store would enforce its constraints.

use std::{collections::HashSet, fmt};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    common::{find_by_id, find_by_id_mut},
    Bill, CreditCard, Entry, EntryKind, Installment, Invoice, Purchase, YearMonth,
};

pub const CURRENT_SCHEMA_VERSION: u8 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Book {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub cards: Vec<CreditCard>,
    #[serde(default)]
    pub purchases: Vec<Purchase>,
    #[serde(default)]
    pub installments: Vec<Installment>,
    #[serde(default)]
    pub invoices: Vec<Invoice>,
    #[serde(default)]
    pub entries: Vec<Entry>,
    #[serde(default)]
    pub bills: Vec<Bill>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "Book::schema_version_default")]
    pub schema_version: u8,
}

impl Book {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            cards: Vec::new(),
            purchases: Vec::new(),
            installments: Vec::new(),
            invoices: Vec::new(),
            entries: Vec::new(),
            bills: Vec::new(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }

    /// Runs `op` against a draft copy and keeps the draft only when `op` succeeds.
    ///
    /// Either every write of the operation lands or none does. A draft
    /// that ends up equal to the book is dropped, leaving `updated_at` as is.
    pub fn transact<T, E>(
        &mut self,
        op: impl FnOnce(&mut Book) -> Result<T, E>,
    ) -> Result<T, E> {
        let mut draft = self.clone();
        let value = op(&mut draft)?;
        if draft != *self {
            draft.touch();
            *self = draft;
        }
        Ok(value)
    }

    pub fn card(&self, id: Uuid) -> Option<&CreditCard> {
        find_by_id(&self.cards, id)
    }

    pub fn card_mut(&mut self, id: Uuid) -> Option<&mut CreditCard> {
        find_by_id_mut(&mut self.cards, id)
    }

    pub fn active_cards(&self) -> impl Iterator<Item = &CreditCard> {
        self.cards.iter().filter(|card| card.active)
    }

    pub fn purchase(&self, id: Uuid) -> Option<&Purchase> {
        find_by_id(&self.purchases, id)
    }

    pub fn installment(&self, id: Uuid) -> Option<&Installment> {
        find_by_id(&self.installments, id)
    }

    pub fn installment_mut(&mut self, id: Uuid) -> Option<&mut Installment> {
        find_by_id_mut(&mut self.installments, id)
    }

    pub fn invoice(&self, id: Uuid) -> Option<&Invoice> {
        find_by_id(&self.invoices, id)
    }

    pub fn invoice_mut(&mut self, id: Uuid) -> Option<&mut Invoice> {
        find_by_id_mut(&mut self.invoices, id)
    }

    pub fn entry(&self, id: Uuid) -> Option<&Entry> {
        find_by_id(&self.entries, id)
    }

    pub fn entry_mut(&mut self, id: Uuid) -> Option<&mut Entry> {
        find_by_id_mut(&mut self.entries, id)
    }

    pub fn bill(&self, id: Uuid) -> Option<&Bill> {
        find_by_id(&self.bills, id)
    }

    pub fn bill_mut(&mut self, id: Uuid) -> Option<&mut Bill> {
        find_by_id_mut(&mut self.bills, id)
    }

    pub fn add_card(&mut self, card: CreditCard) -> Uuid {
        let id = card.id;
        self.cards.push(card);
        self.touch();
        id
    }

    /// Stores a purchase together with its installments.
    pub fn add_purchase(
        &mut self,
        purchase: Purchase,
        installments: Vec<Installment>,
    ) -> Result<Uuid, BookError> {
        if self.card(purchase.card_id).is_none() {
            return Err(BookError::missing("card", purchase.card_id));
        }
        if let Some(stray) = installments
            .iter()
            .find(|installment| installment.purchase_id != purchase.id)
        {
            return Err(BookError::ForeignInstallment {
                installment_id: stray.id,
                purchase_id: purchase.id,
            });
        }
        let id = purchase.id;
        self.purchases.push(purchase);
        self.installments.extend(installments);
        self.touch();
        Ok(id)
    }

    /// Stores an invoice. At most one invoice exists per card and statement.
    pub fn add_invoice(&mut self, invoice: Invoice) -> Result<Uuid, BookError> {
        if self.card(invoice.card_id).is_none() {
            return Err(BookError::missing("card", invoice.card_id));
        }
        if self.invoice_for(invoice.card_id, invoice.statement).is_some() {
            return Err(BookError::DuplicateInvoice {
                card_id: invoice.card_id,
                statement: invoice.statement,
            });
        }
        let id = invoice.id;
        self.invoices.push(invoice);
        self.touch();
        Ok(id)
    }

    /// Stores an entry. Occurrences must point at an existing series head and
    /// at most one occurrence exists per head and calendar month.
    pub fn add_entry(&mut self, entry: Entry) -> Result<Uuid, BookError> {
        if let Some(parent_id) = entry.parent_id {
            let parent = self
                .entry(parent_id)
                .ok_or_else(|| BookError::missing("entry", parent_id))?;
            if !parent.is_series_head() {
                return Err(BookError::NotASeriesHead(parent_id));
            }
            let month = entry.month();
            if self.occurrence_of(parent_id, month).is_some() {
                return Err(BookError::DuplicateOccurrence {
                    origin_id: parent_id,
                    month,
                });
            }
        }
        let id = entry.id;
        self.entries.push(entry);
        self.touch();
        Ok(id)
    }

    pub fn add_bill(&mut self, bill: Bill) -> Uuid {
        let id = bill.id;
        self.bills.push(bill);
        self.touch();
        id
    }

    /// Installments of a purchase ordered by sequence.
    pub fn installments_of(&self, purchase_id: Uuid) -> Vec<&Installment> {
        let mut items: Vec<_> = self
            .installments
            .iter()
            .filter(|installment| installment.purchase_id == purchase_id)
            .collect();
        items.sort_by_key(|installment| installment.sequence);
        items
    }

    pub fn purchases_of(&self, card_id: Uuid) -> impl Iterator<Item = &Purchase> {
        self.purchases
            .iter()
            .filter(move |purchase| purchase.card_id == card_id)
    }

    /// Every installment of every purchase made with the card.
    pub fn card_installments(&self, card_id: Uuid) -> Vec<&Installment> {
        let purchase_ids: HashSet<Uuid> = self.purchases_of(card_id).map(|p| p.id).collect();
        self.installments
            .iter()
            .filter(|installment| purchase_ids.contains(&installment.purchase_id))
            .collect()
    }

    /// Installments billed on the card's statement for `month`.
    pub fn statement_installments(&self, card_id: Uuid, month: YearMonth) -> Vec<&Installment> {
        self.card_installments(card_id)
            .into_iter()
            .filter(|installment| installment.is_on_statement(month))
            .collect()
    }

    /// Ids of installments billed on the card's statement for `month`.
    pub fn statement_installment_ids(&self, card_id: Uuid, month: YearMonth) -> Vec<Uuid> {
        self.statement_installments(card_id, month)
            .into_iter()
            .map(|installment| installment.id)
            .collect()
    }

    pub fn invoice_for(&self, card_id: Uuid, statement: YearMonth) -> Option<&Invoice> {
        self.invoices
            .iter()
            .find(|invoice| invoice.card_id == card_id && invoice.statement == statement)
    }

    pub fn series_heads(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(|entry| entry.is_series_head())
    }

    pub fn children_of(&self, origin_id: Uuid) -> impl Iterator<Item = &Entry> {
        self.entries
            .iter()
            .filter(move |entry| entry.parent_id == Some(origin_id))
    }

    /// The materialized occurrence of a series for a calendar month, matched on its date.
    pub fn occurrence_of(&self, origin_id: Uuid, month: YearMonth) -> Option<&Entry> {
        self.children_of(origin_id)
            .find(|entry| month.contains(entry.date))
    }

    pub fn find_entries(&self, filter: &EntryFilter) -> Vec<&Entry> {
        let mut items: Vec<_> = self
            .entries
            .iter()
            .filter(|entry| filter.matches(entry))
            .collect();
        items.sort_by_key(|entry| entry.date);
        items
    }

    /// Removes a card with its purchases, installments and invoices.
    pub fn remove_card(&mut self, id: Uuid) -> Result<(), BookError> {
        if self.card(id).is_none() {
            return Err(BookError::missing("card", id));
        }
        let purchase_ids: HashSet<Uuid> = self.purchases_of(id).map(|p| p.id).collect();
        self.installments
            .retain(|installment| !purchase_ids.contains(&installment.purchase_id));
        self.purchases.retain(|purchase| purchase.card_id != id);
        self.invoices.retain(|invoice| invoice.card_id != id);
        self.cards.retain(|card| card.id != id);
        self.touch();
        Ok(())
    }

    /// Removes a purchase with its installments.
    pub fn remove_purchase(&mut self, id: Uuid) -> Result<(), BookError> {
        let before = self.purchases.len();
        self.purchases.retain(|purchase| purchase.id != id);
        if self.purchases.len() == before {
            return Err(BookError::missing("purchase", id));
        }
        self.installments
            .retain(|installment| installment.purchase_id != id);
        self.touch();
        Ok(())
    }

    /// Removes an entry. Removing a series head removes its occurrences too.
    /// Returns the number of rows removed.
    pub fn remove_entry(&mut self, id: Uuid) -> Result<usize, BookError> {
        if self.entry(id).is_none() {
            return Err(BookError::missing("entry", id));
        }
        let before = self.entries.len();
        self.entries
            .retain(|entry| entry.id != id && entry.parent_id != Some(id));
        self.touch();
        Ok(before - self.entries.len())
    }

    pub fn remove_bill(&mut self, id: Uuid) -> Result<(), BookError> {
        let before = self.bills.len();
        self.bills.retain(|bill| bill.id != id);
        if self.bills.len() == before {
            return Err(BookError::missing("bill", id));
        }
        self.touch();
        Ok(())
    }
}

/// Field-equality and date-range predicate over entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryFilter {
    pub kind: Option<EntryKind>,
    pub recurring: Option<bool>,
    pub parent_id: Option<Uuid>,
    pub consolidated: Option<bool>,
    /// Inclusive lower bound on the entry date.
    pub from: Option<NaiveDate>,
    /// Exclusive upper bound on the entry date.
    pub until: Option<NaiveDate>,
}

impl EntryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(mut self, kind: EntryKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn recurring(mut self, recurring: bool) -> Self {
        self.recurring = Some(recurring);
        self
    }

    pub fn parent(mut self, parent_id: Uuid) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn consolidated(mut self, consolidated: bool) -> Self {
        self.consolidated = Some(consolidated);
        self
    }

    pub fn between(mut self, from: NaiveDate, until: NaiveDate) -> Self {
        self.from = Some(from);
        self.until = Some(until);
        self
    }

    /// Restricts to dates inside the calendar month.
    pub fn within(self, month: YearMonth) -> Self {
        let until = month.last_day() + chrono::Days::new(1);
        self.between(month.first_day(), until)
    }

    pub fn matches(&self, entry: &Entry) -> bool {
        self.kind.map_or(true, |kind| entry.kind == kind)
            && self.recurring.map_or(true, |flag| entry.recurring == flag)
            && self
                .parent_id
                .map_or(true, |parent| entry.parent_id == Some(parent))
            && self
                .consolidated
                .map_or(true, |flag| entry.consolidated == flag)
            && self.from.map_or(true, |from| entry.date >= from)
            && self.until.map_or(true, |until| entry.date < until)
    }
}

/// Constraint violations raised by [`Book`] mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookError {
    NotFound { entity: &'static str, id: Uuid },
    DuplicateOccurrence { origin_id: Uuid, month: YearMonth },
    DuplicateInvoice { card_id: Uuid, statement: YearMonth },
    NotASeriesHead(Uuid),
    ForeignInstallment { installment_id: Uuid, purchase_id: Uuid },
}

impl BookError {
    pub fn missing(entity: &'static str, id: Uuid) -> Self {
        BookError::NotFound { entity, id }
    }
}

impl fmt::Display for BookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookError::NotFound { entity, id } => write!(f, "{entity} {id} not found"),
            BookError::DuplicateOccurrence { origin_id, month } => {
                write!(f, "series {origin_id} already has an occurrence in {month}")
            }
            BookError::DuplicateInvoice { card_id, statement } => {
                write!(f, "card {card_id} already has an invoice for {statement}")
            }
            BookError::NotASeriesHead(id) => write!(f, "entry {id} is not a recurring series head"),
            BookError::ForeignInstallment {
                installment_id,
                purchase_id,
            } => write!(
                f,
                "installment {installment_id} does not belong to purchase {purchase_id}"
            ),
        }
    }
}

impl std::error::Error for BookError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn transact_discards_draft_on_error() {
        let mut book = Book::new("Household");
        let result: Result<(), &str> = book.transact(|draft| {
            draft.add_card(CreditCard::new("Visa", 1000.0, 10, None));
            Err("boom")
        });

        assert!(result.is_err());
        assert!(book.cards.is_empty());
    }

    #[test]
    fn transact_keeps_draft_on_success() {
        let mut book = Book::new("Household");
        let id = book
            .transact(|draft| {
                Ok::<_, BookError>(draft.add_card(CreditCard::new("Visa", 1000.0, 10, None)))
            })
            .unwrap();

        assert!(book.card(id).is_some());
    }

    #[test]
    fn transact_without_writes_leaves_book_untouched() {
        let mut book = Book::new("Household");
        let before = book.updated_at;

        let count = book
            .transact(|draft| Ok::<_, BookError>(draft.entries.len()))
            .unwrap();

        assert_eq!(count, 0);
        assert_eq!(book.updated_at, before);
    }

    #[test]
    fn transact_touches_after_field_writes() {
        let mut book = Book::new("Household");
        let id = book.add_card(CreditCard::new("Visa", 1000.0, 10, None));
        book.updated_at = DateTime::<Utc>::MIN_UTC;

        book.transact(|draft| {
            if let Some(card) = draft.card_mut(id) {
                card.active = false;
            }
            Ok::<_, BookError>(())
        })
        .unwrap();

        assert!(book.updated_at > DateTime::<Utc>::MIN_UTC);
    }

    #[test]
    fn second_occurrence_in_same_month_is_rejected() {
        let mut book = Book::new("Household");
        let head =
            Entry::new("Salary", 5000.0, EntryKind::Income, date(2025, 1, 5)).into_series(None);
        let head_id = book.add_entry(head.clone()).unwrap();
        let march = YearMonth::new(2025, 3).unwrap();

        book.add_entry(head.occurrence_for(march)).unwrap();
        let err = book.add_entry(head.occurrence_for(march)).unwrap_err();

        assert_eq!(
            err,
            BookError::DuplicateOccurrence {
                origin_id: head_id,
                month: march
            }
        );
        assert_eq!(book.children_of(head_id).count(), 1);
    }

    #[test]
    fn occurrence_needs_series_head_parent() {
        let mut book = Book::new("Household");
        let plain = Entry::new("Gift", 50.0, EntryKind::Income, date(2025, 1, 5));
        let plain_id = book.add_entry(plain.clone()).unwrap();

        let mut child = plain.clone();
        child.id = Uuid::new_v4();
        child.parent_id = Some(plain_id);

        assert_eq!(
            book.add_entry(child).unwrap_err(),
            BookError::NotASeriesHead(plain_id)
        );
    }

    #[test]
    fn removing_card_cascades() {
        let mut book = Book::new("Household");
        let card = CreditCard::new("Visa", 1000.0, 10, None);
        let card_id = book.add_card(card);
        let purchase = Purchase::new(card_id, "TV", 300.0, date(2025, 1, 3), 1);
        let month = YearMonth::new(2025, 1).unwrap();
        let installment = Installment::new(purchase.id, 1, 1, 300.0, month, date(2025, 1, 17));
        book.add_purchase(purchase, vec![installment]).unwrap();
        book.add_invoice(Invoice::new(card_id, month, 300.0, date(2025, 1, 17)))
            .unwrap();

        book.remove_card(card_id).unwrap();

        assert!(book.purchases.is_empty());
        assert!(book.installments.is_empty());
        assert!(book.invoices.is_empty());
    }

    #[test]
    fn entry_filter_combines_predicates() {
        let mut book = Book::new("Household");
        book.add_entry(Entry::new("Salary", 5000.0, EntryKind::Income, date(2025, 2, 5)))
            .unwrap();
        book.add_entry(Entry::new("Market", 300.0, EntryKind::Expense, date(2025, 2, 7)))
            .unwrap();
        book.add_entry(Entry::new("Market", 280.0, EntryKind::Expense, date(2025, 3, 7)))
            .unwrap();

        let february = YearMonth::new(2025, 2).unwrap();
        let filter = EntryFilter::new().kind(EntryKind::Expense).within(february);
        let found = book.find_entries(&filter);

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].amount, 300.0);
    }
}
