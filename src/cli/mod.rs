//! `billcycle` command line: argument parsing and dispatch to the services.

pub mod commands;
pub mod context;
pub mod output;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use billcycle_domain::YearMonth;

use crate::AppError;
pub use context::CliContext;

#[derive(Debug, Parser)]
#[command(
    name = "billcycle",
    version,
    about = "Credit card statements, installments, recurring entries and bills"
)]
pub struct Cli {
    /// Base directory holding configuration, books and backups.
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Book to work on. Defaults to the configured book.
    #[arg(long, global = true, value_name = "NAME")]
    pub book: Option<String>,

    /// Evaluate everything as of this day (YYYY-MM-DD) instead of today.
    #[arg(long, global = true, value_name = "DATE")]
    pub today: Option<NaiveDate>,

    /// Plain output without colors.
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage credit cards
    #[command(subcommand)]
    Card(commands::card::CardCommand),
    /// Register, list and anticipate installment purchases
    #[command(subcommand)]
    Purchase(commands::purchase::PurchaseCommand),
    /// Card statements and their payment
    #[command(subcommand)]
    Invoice(commands::invoice::InvoiceCommand),
    /// Income and expense entries
    #[command(subcommand)]
    Entry(commands::entry::EntryCommand),
    /// Monthly series materialization
    #[command(subcommand)]
    Recurring(commands::recurring::RecurringCommand),
    /// Standalone bills
    #[command(subcommand)]
    Bill(commands::bill::BillCommand),
    /// Card usage, bills and cash flow of a month
    Summary(commands::report::SummaryArgs),
    /// Upcoming due dates and entries in a date range
    Calendar(commands::report::CalendarArgs),
    /// Invoices and bills due soon, cards close to their limit
    Alerts,
    /// Book snapshots
    #[command(subcommand)]
    Backup(commands::backup::BackupCommand),
    /// Show or change preferences
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),
}

/// `--month/--year` pair. Missing parts default to the current month.
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct PeriodArgs {
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    pub month: Option<u32>,
    #[arg(long)]
    pub year: Option<i32>,
}

impl PeriodArgs {
    pub fn resolve(&self, today: NaiveDate) -> Result<YearMonth, AppError> {
        let current = YearMonth::of(today);
        YearMonth::new(
            self.year.unwrap_or(current.year()),
            self.month.unwrap_or(current.month()),
        )
        .map_err(|err| AppError::Input(err.to_string()))
    }
}

/// Parses the arguments' global options, opens the book and runs the command.
pub fn run(cli: Cli) -> Result<(), AppError> {
    if cli.no_color {
        output::disable_colors();
    }
    let mut context = CliContext::open(&cli)?;
    match cli.command {
        Command::Card(command) => commands::card::run(&mut context, command),
        Command::Purchase(command) => commands::purchase::run(&mut context, command),
        Command::Invoice(command) => commands::invoice::run(&mut context, command),
        Command::Entry(command) => commands::entry::run(&mut context, command),
        Command::Recurring(command) => commands::recurring::run(&mut context, command),
        Command::Bill(command) => commands::bill::run(&mut context, command),
        Command::Summary(args) => commands::report::summary(&mut context, args),
        Command::Calendar(args) => commands::report::calendar(&mut context, args),
        Command::Alerts => commands::report::alerts(&mut context),
        Command::Backup(command) => commands::backup::run(&mut context, command),
        Command::Config(command) => commands::config::run(&mut context, command),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_defaults_to_current_month() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();

        let period = PeriodArgs::default().resolve(today).unwrap();
        assert_eq!(period, YearMonth::new(2025, 3).unwrap());

        let explicit = PeriodArgs {
            month: Some(11),
            year: None,
        };
        assert_eq!(explicit.resolve(today).unwrap(), YearMonth::new(2025, 11).unwrap());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_purchase_with_installments() {
        let cli = Cli::try_parse_from([
            "billcycle",
            "--data-dir",
            "/tmp/x",
            "purchase",
            "add",
            "--card",
            "5f0c1c3e-0a52-4c55-9a8e-7a4f38f0b0a1",
            "--description",
            "Laptop",
            "--amount",
            "1200",
            "--installments",
            "4",
        ])
        .unwrap();

        assert!(matches!(
            cli.command,
            Command::Purchase(commands::purchase::PurchaseCommand::Add(_))
        ));
    }
}
