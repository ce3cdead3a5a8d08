//! Credit card maintenance and limit usage.

use tracing::info;
use uuid::Uuid;

use billcycle_domain::{total_of, Book, CreditCard, Installment};

use crate::CoreError;

pub const MAX_CLOSING_DAY: u32 = 31;
pub const MAX_DUE_DAY: u32 = 62;

/// Field changes applied by [`CardService::update`]. `None` leaves a field as is.
#[derive(Debug, Clone, Default)]
pub struct CardChanges {
    pub name: Option<String>,
    pub credit_limit: Option<f64>,
    pub closing_day: Option<u32>,
    pub due_day: Option<Option<u32>>,
    pub brand: Option<Option<String>>,
    pub last_digits: Option<Option<String>>,
}

/// Limit consumption of a card, recomputed from its unpaid installments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardUsage {
    pub limit: f64,
    pub used: f64,
    pub available: f64,
}

impl CardUsage {
    /// Percentage of the limit in use, `0` for cards without a limit.
    pub fn percent(&self) -> f64 {
        if self.limit > 0.0 {
            self.used / self.limit * 100.0
        } else {
            0.0
        }
    }
}

pub struct CardService;

impl CardService {
    pub fn add(book: &mut Book, card: CreditCard) -> Result<Uuid, CoreError> {
        Self::validate(&card)?;
        let id = book.add_card(card);
        info!(card = %id, "card added");
        Ok(id)
    }

    pub fn update(book: &mut Book, id: Uuid, changes: CardChanges) -> Result<(), CoreError> {
        let mut updated = book
            .card(id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("card", id))?;
        if let Some(name) = changes.name {
            updated.name = name;
        }
        if let Some(limit) = changes.credit_limit {
            updated.credit_limit = limit;
        }
        if let Some(closing_day) = changes.closing_day {
            updated.closing_day = closing_day;
        }
        if let Some(due_day) = changes.due_day {
            updated.due_day = due_day;
        }
        if let Some(brand) = changes.brand {
            updated.brand = brand;
        }
        if let Some(last_digits) = changes.last_digits {
            updated.last_digits = last_digits;
        }
        Self::validate(&updated)?;
        if let Some(card) = book.card_mut(id) {
            *card = updated;
        }
        book.touch();
        Ok(())
    }

    /// Hides the card from invoice listings without touching its history.
    pub fn deactivate(book: &mut Book, id: Uuid) -> Result<bool, CoreError> {
        let card = book
            .card_mut(id)
            .ok_or_else(|| CoreError::not_found("card", id))?;
        let was_active = card.active;
        card.active = false;
        if was_active {
            book.touch();
            info!(card = %id, "card deactivated");
        }
        Ok(was_active)
    }

    /// Deletes the card together with its purchases, installments and invoices.
    pub fn remove(book: &mut Book, id: Uuid) -> Result<(), CoreError> {
        book.remove_card(id)?;
        info!(card = %id, "card removed");
        Ok(())
    }

    pub fn list(book: &Book) -> Vec<&CreditCard> {
        let mut cards: Vec<_> = book.cards.iter().collect();
        cards.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        cards
    }

    /// Sum of the card's unpaid installments.
    pub fn total_used(book: &Book, card_id: Uuid) -> f64 {
        let unpaid: Vec<&Installment> = book
            .card_installments(card_id)
            .into_iter()
            .filter(|installment| !installment.paid)
            .collect();
        total_of(unpaid)
    }

    pub fn usage(book: &Book, card_id: Uuid) -> Result<CardUsage, CoreError> {
        let card = book
            .card(card_id)
            .ok_or_else(|| CoreError::not_found("card", card_id))?;
        let used = Self::total_used(book, card_id);
        Ok(CardUsage {
            limit: card.credit_limit,
            used,
            available: card.credit_limit - used,
        })
    }

    fn validate(card: &CreditCard) -> Result<(), CoreError> {
        if card.name.trim().is_empty() {
            return Err(CoreError::Validation("card name must not be empty".into()));
        }
        if !card.credit_limit.is_finite() || card.credit_limit < 0.0 {
            return Err(CoreError::Validation(
                "credit limit must be zero or positive".into(),
            ));
        }
        if !(1..=MAX_CLOSING_DAY).contains(&card.closing_day) {
            return Err(CoreError::Validation(format!(
                "closing day must be between 1 and {MAX_CLOSING_DAY}"
            )));
        }
        if let Some(due_day) = card.due_day {
            if !(1..=MAX_DUE_DAY).contains(&due_day) {
                return Err(CoreError::Validation(format!(
                    "due day must be between 1 and {MAX_DUE_DAY}"
                )));
            }
        }
        Ok(())
    }
}
