use std::{
    collections::{HashMap, HashSet},
    path::PathBuf,
};

use billcycle_domain::{Book, YearMonth};
use uuid::Uuid;

use crate::CoreError;

/// Describes a persisted backup artifact for a book.
#[derive(Debug, Clone)]
pub struct BookBackupInfo {
    pub book: String,
    pub id: String,
    pub created_at: String,
    pub path: PathBuf,
}

/// Abstraction over persistence backends capable of storing books and backups.
pub trait BookStorage: Send + Sync {
    fn save_book(&self, name: &str, book: &Book) -> Result<(), CoreError>;
    fn load_book(&self, name: &str) -> Result<Book, CoreError>;
    fn list_books(&self) -> Result<Vec<String>, CoreError>;
    fn delete_book(&self, name: &str) -> Result<(), CoreError>;
    fn backup_book(
        &self,
        name: &str,
        book: &Book,
        note: Option<&str>,
    ) -> Result<BookBackupInfo, CoreError>;
    fn list_backups(&self, name: &str) -> Result<Vec<BookBackupInfo>, CoreError>;
    fn restore_backup(&self, backup: &BookBackupInfo) -> Result<Book, CoreError>;
}

/// Detects dangling references and other anomalies within a book snapshot.
pub fn book_warnings(book: &Book) -> Vec<String> {
    let card_ids: HashSet<_> = book.cards.iter().map(|c| c.id).collect();
    let purchase_ids: HashSet<_> = book.purchases.iter().map(|p| p.id).collect();
    let entry_ids: HashSet<_> = book.entries.iter().map(|e| e.id).collect();
    let mut warnings = Vec::new();

    for purchase in &book.purchases {
        if !card_ids.contains(&purchase.card_id) {
            warnings.push(format!(
                "purchase {} references unknown card {}",
                purchase.id, purchase.card_id
            ));
        }
    }
    for installment in &book.installments {
        if !purchase_ids.contains(&installment.purchase_id) {
            warnings.push(format!(
                "installment {} references unknown purchase {}",
                installment.id, installment.purchase_id
            ));
        }
        if installment.statement.is_none() {
            warnings.push(format!(
                "installment {} has no statement assigned",
                installment.id
            ));
        }
    }
    for invoice in &book.invoices {
        if !card_ids.contains(&invoice.card_id) {
            warnings.push(format!(
                "invoice {} references unknown card {}",
                invoice.id, invoice.card_id
            ));
        }
    }

    let mut slots: HashMap<(Uuid, YearMonth), usize> = HashMap::new();
    for entry in &book.entries {
        let Some(parent_id) = entry.parent_id else {
            continue;
        };
        if !entry_ids.contains(&parent_id) {
            warnings.push(format!(
                "entry {} references missing series {}",
                entry.id, parent_id
            ));
        }
        *slots.entry((parent_id, entry.month())).or_default() += 1;
    }
    let mut duplicates: Vec<_> = slots.into_iter().filter(|(_, count)| *count > 1).collect();
    duplicates.sort_by_key(|((_, month), _)| *month);
    for ((parent_id, month), count) in duplicates {
        warnings.push(format!(
            "series {parent_id} has {count} occurrences in {month}"
        ));
    }
    warnings
}
