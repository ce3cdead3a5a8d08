use clap::Subcommand;

use crate::cli::{output, CliContext};
use crate::AppError;

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the current preferences
    Show,
    /// Change one preference, e.g. `config set currency BRL`
    Set { key: String, value: String },
}

pub fn run(context: &mut CliContext, command: ConfigCommand) -> Result<(), AppError> {
    match command {
        ConfigCommand::Show => {
            let config = context.config();
            output::section("Configuration");
            let optional = |path: &Option<std::path::PathBuf>| {
                path.as_ref()
                    .map(|path| path.display().to_string())
                    .unwrap_or_else(|| "(default)".into())
            };
            let rows = [
                ("locale", config.locale.clone()),
                ("currency", config.currency.clone()),
                ("book_name", config.book_name.clone()),
                ("data_root", optional(&config.data_root)),
                ("backup_root", optional(&config.backup_root)),
                ("backup_retention", config.backup_retention.to_string()),
                ("invoice_alert_days", config.invoice_alert_days.to_string()),
                ("bill_alert_days", config.bill_alert_days.to_string()),
                (
                    "card_usage_alert_percent",
                    config.card_usage_alert_percent.to_string(),
                ),
                ("ui_color_enabled", config.ui_color_enabled.to_string()),
            ];
            for (key, value) in rows {
                output::row(&[format!("{:<26}", key), value]);
            }
            Ok(())
        }
        ConfigCommand::Set { key, value } => {
            let mut config = context.config().clone();
            config.set(&key, &value)?;
            context.update_config(config)?;
            output::success(format!("{} = {}", key, value.trim()));
            Ok(())
        }
    }
}
