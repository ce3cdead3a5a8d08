use clap::Subcommand;

use billcycle_core::{OccurrenceSource, RecurrenceService};
use billcycle_domain::{EntryKind, YearMonth};

use crate::cli::{output, CliContext, PeriodArgs};
use crate::AppError;

#[derive(Debug, Subcommand)]
pub enum RecurringCommand {
    /// Create the missing occurrences of every series for a month
    Materialize {
        #[command(flatten)]
        period: PeriodArgs,
    },
    /// Create occurrences for several consecutive months
    Generate {
        /// First month (YYYY-MM); defaults to the current month.
        #[arg(long)]
        from: Option<YearMonth>,
        #[arg(long, default_value_t = 12)]
        months: u32,
    },
    /// One row per series occurring in a month
    Occurrences {
        #[command(flatten)]
        period: PeriodArgs,
        #[arg(long)]
        kind: Option<EntryKind>,
    },
}

pub fn run(context: &mut CliContext, command: RecurringCommand) -> Result<(), AppError> {
    match command {
        RecurringCommand::Materialize { period } => {
            let month = period.resolve(context.today())?;
            let created = RecurrenceService::ensure_materialized(context.book_mut(), month)?;
            if created > 0 {
                context.save()?;
            }
            output::success(format!("{} occurrence(s) created for {}", created, month));
            Ok(())
        }
        RecurringCommand::Generate { from, months } => {
            let start = from.unwrap_or_else(|| YearMonth::of(context.today()));
            let created = RecurrenceService::generate_months(context.book_mut(), start, months)?;
            if created > 0 {
                context.save()?;
            }
            output::success(format!(
                "{} occurrence(s) created over {} month(s) from {}",
                created, months, start
            ));
            Ok(())
        }
        RecurringCommand::Occurrences { period, kind } => {
            let month = period.resolve(context.today())?;
            let revision = context.revision();
            let rows = RecurrenceService::list_occurrences(context.book_mut(), month, kind)?;
            context.save_if_touched(revision)?;

            output::section(format!("Recurring {}", month));
            if rows.is_empty() {
                output::info("No recurring entries this month.");
            }
            for row in rows {
                let source = match row.source {
                    OccurrenceSource::Origin => "origin",
                    OccurrenceSource::Child => "occurrence",
                };
                let state = if row.consolidated { "consolidated" } else { "" };
                output::row(&[
                    row.entry_id.to_string(),
                    row.date.to_string(),
                    row.kind.to_string(),
                    row.description,
                    context.money(row.amount),
                    source.to_string(),
                    state.to_string(),
                ]);
            }
            Ok(())
        }
    }
}
