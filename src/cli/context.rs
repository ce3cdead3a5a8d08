use chrono::{DateTime, NaiveDate, Utc};
use tracing::{info, warn};

use billcycle_config::{Config, ConfigManager};
use billcycle_core::{
    book_warnings, AlertThresholds, BookStorage, Clock, CoreError, FixedClock, SystemClock,
};
use billcycle_domain::Book;
use billcycle_storage_json::JsonBookStorage;

use super::Cli;
use crate::AppError;

/// Everything a command needs: preferences, storage and the open book.
pub struct CliContext {
    config_manager: ConfigManager,
    config: Config,
    storage: JsonBookStorage,
    book_name: String,
    book: Book,
    clock: Box<dyn Clock>,
}

impl CliContext {
    /// Loads the configuration and the selected book, starting an empty book
    /// when none was saved yet.
    pub fn open(cli: &Cli) -> Result<Self, AppError> {
        let base = cli.data_dir.clone().unwrap_or_else(Config::default_base_dir);
        let config_manager = ConfigManager::with_base_dir(base)?;
        let config = config_manager.load()?;
        if !config.ui_color_enabled {
            super::output::disable_colors();
        }

        let (books_dir, backups_dir) = match &cli.data_dir {
            Some(dir) => (dir.join("books"), dir.join("backups")),
            None => (config.resolve_data_root(), config.resolve_backup_root()),
        };
        let storage =
            JsonBookStorage::with_retention(books_dir, backups_dir, config.backup_retention)?;

        let book_name = cli.book.clone().unwrap_or_else(|| config.book_name.clone());
        let book = match storage.load_book(&book_name) {
            Ok(book) => {
                for warning in book_warnings(&book) {
                    warn!(book = %book_name, "{}", warning);
                }
                book
            }
            Err(CoreError::NotFound { .. }) => {
                info!(book = %book_name, "starting a new book");
                Book::new(book_name.clone())
            }
            Err(err) => return Err(err.into()),
        };

        let clock: Box<dyn Clock> = match cli.today {
            Some(day) => Box::new(FixedClock::on(day)),
            None => Box::new(SystemClock),
        };

        Ok(Self {
            config_manager,
            config,
            storage,
            book_name,
            book,
            clock,
        })
    }

    pub fn book(&self) -> &Book {
        &self.book
    }

    pub fn book_mut(&mut self) -> &mut Book {
        &mut self.book
    }

    /// The book together with the clock, for services that need both.
    pub fn book_and_clock(&mut self) -> (&mut Book, &dyn Clock) {
        (&mut self.book, self.clock.as_ref())
    }

    pub fn replace_book(&mut self, book: Book) {
        self.book = book;
    }

    pub fn book_name(&self) -> &str {
        &self.book_name
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn storage(&self) -> &JsonBookStorage {
        &self.storage
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn money(&self, amount: f64) -> String {
        super::output::money(amount, &self.config.currency, &self.config.locale)
    }

    pub fn alert_thresholds(&self) -> AlertThresholds {
        AlertThresholds {
            invoice_days: self.config.invoice_alert_days,
            bill_days: self.config.bill_alert_days,
            card_usage_percent: self.config.card_usage_alert_percent,
        }
    }

    /// Persists the book under its name.
    pub fn save(&self) -> Result<(), AppError> {
        self.storage.save_book(&self.book_name, &self.book)?;
        Ok(())
    }

    /// Book revision marker for [`CliContext::save_if_touched`].
    pub fn revision(&self) -> DateTime<Utc> {
        self.book.updated_at
    }

    /// Saves when something (such as lazy materialization) changed the book
    /// since `revision` was taken.
    pub fn save_if_touched(&self, revision: DateTime<Utc>) -> Result<(), AppError> {
        if self.book.updated_at != revision {
            self.save()?;
        }
        Ok(())
    }

    pub fn update_config(&mut self, config: Config) -> Result<(), AppError> {
        self.config_manager.save(&config)?;
        self.config = config;
        Ok(())
    }
}
