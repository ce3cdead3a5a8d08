use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ConfigError;

const DEFAULT_ROOT_DIR: &str = "Billcycle";

/// Stores user-configurable preferences for the billcycle CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    #[serde(default = "Config::default_book_name")]
    pub book_name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    /// Optional custom root directory for books. Defaults to `~/Documents/Billcycle/books`.
    pub data_root: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    /// Optional custom root directory for backups. Defaults to `~/Documents/Billcycle/backups`.
    pub backup_root: Option<PathBuf>,

    #[serde(default = "Config::default_backup_retention")]
    pub backup_retention: usize,
    #[serde(default = "Config::default_invoice_alert_days")]
    pub invoice_alert_days: u32,
    #[serde(default = "Config::default_bill_alert_days")]
    pub bill_alert_days: u32,
    #[serde(default = "Config::default_card_usage_alert_percent")]
    pub card_usage_alert_percent: f64,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            currency: "USD".into(),
            book_name: Self::default_book_name(),
            data_root: None,
            backup_root: None,
            backup_retention: Self::default_backup_retention(),
            invoice_alert_days: Self::default_invoice_alert_days(),
            bill_alert_days: Self::default_bill_alert_days(),
            card_usage_alert_percent: Self::default_card_usage_alert_percent(),
            ui_color_enabled: Self::default_ui_color_enabled(),
        }
    }
}

impl Config {
    pub fn default_book_name() -> String {
        "default".into()
    }

    pub fn default_backup_retention() -> usize {
        5
    }

    pub fn default_invoice_alert_days() -> u32 {
        5
    }

    pub fn default_bill_alert_days() -> u32 {
        3
    }

    pub fn default_card_usage_alert_percent() -> f64 {
        80.0
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    /// `~/Documents/Billcycle`, falling back to the home directory.
    pub fn default_base_dir() -> PathBuf {
        dirs::document_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_ROOT_DIR)
    }

    pub fn resolve_data_root(&self) -> PathBuf {
        if let Some(path) = &self.data_root {
            return path.clone();
        }
        Self::default_base_dir().join("books")
    }

    pub fn resolve_backup_root(&self) -> PathBuf {
        if let Some(path) = &self.backup_root {
            return path.clone();
        }
        Self::default_base_dir().join("backups")
    }

    /// Applies a `key = value` setting coming from the command line.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match key {
            "locale" => self.locale = non_empty(key, value)?,
            "currency" => self.currency = non_empty(key, value)?.to_uppercase(),
            "book_name" => self.book_name = non_empty(key, value)?,
            "data_root" => self.data_root = optional_path(value),
            "backup_root" => self.backup_root = optional_path(value),
            "backup_retention" => {
                let retention: usize = parse(key, value)?;
                if retention == 0 {
                    return Err(invalid(key, "must keep at least one backup"));
                }
                self.backup_retention = retention;
            }
            "invoice_alert_days" => self.invoice_alert_days = parse(key, value)?,
            "bill_alert_days" => self.bill_alert_days = parse(key, value)?,
            "card_usage_alert_percent" => {
                let percent: f64 = parse(key, value)?;
                if !(0.0..=100.0).contains(&percent) {
                    return Err(invalid(key, "must be between 0 and 100"));
                }
                self.card_usage_alert_percent = percent;
            }
            "ui_color_enabled" => self.ui_color_enabled = parse(key, value)?,
            _ => return Err(invalid(key, "unknown setting")),
        }
        Ok(())
    }
}

fn non_empty(key: &str, value: &str) -> Result<String, ConfigError> {
    if value.is_empty() {
        Err(invalid(key, "cannot be empty"))
    } else {
        Ok(value.to_string())
    }
}

fn optional_path(value: &str) -> Option<PathBuf> {
    if value.is_empty() {
        None
    } else {
        Some(PathBuf::from(value))
    }
}

fn parse<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| invalid(key, &format!("cannot parse `{}`", value)))
}

fn invalid(key: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
