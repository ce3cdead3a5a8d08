use chrono::NaiveDate;
use clap::{Args, Subcommand};
use uuid::Uuid;

use billcycle_core::{ConsolidationOutcome, EntryChanges, EntryRequest, EntryService};
use billcycle_domain::EntryKind;

use crate::cli::{output, CliContext, PeriodArgs};
use crate::AppError;

#[derive(Debug, Subcommand)]
pub enum EntryCommand {
    /// Record an income or expense, optionally repeating monthly
    Add(EntryAddArgs),
    /// Entries of a month, recurring occurrences included
    List {
        #[command(flatten)]
        period: PeriodArgs,
        #[arg(long)]
        kind: Option<EntryKind>,
    },
    /// Change fields of an entry; editing a series affects future months only
    Edit(EntryEditArgs),
    /// Mark an entry as settled, or undo it
    Consolidate {
        id: Uuid,
        #[arg(long)]
        undo: bool,
    },
    /// Delete an entry; deleting a series removes all its occurrences
    Delete { id: Uuid },
}

#[derive(Debug, Args)]
pub struct EntryAddArgs {
    #[arg(long)]
    pub description: String,
    #[arg(long)]
    pub amount: f64,
    /// `income` or `expense`.
    #[arg(long)]
    pub kind: EntryKind,
    /// Defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,
    #[arg(long)]
    pub category: Option<String>,
    /// Repeat every month from `date` on.
    #[arg(long)]
    pub monthly: bool,
    /// Preferred day for the monthly occurrences.
    #[arg(long, requires = "monthly")]
    pub day: Option<u32>,
}

#[derive(Debug, Args)]
pub struct EntryEditArgs {
    pub id: Uuid,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub amount: Option<f64>,
    #[arg(long)]
    pub kind: Option<EntryKind>,
    #[arg(long)]
    pub date: Option<NaiveDate>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long, conflicts_with = "category")]
    pub clear_category: bool,
    /// Preferred day for the monthly occurrences.
    #[arg(long)]
    pub day: Option<u32>,
}

pub fn run(context: &mut CliContext, command: EntryCommand) -> Result<(), AppError> {
    match command {
        EntryCommand::Add(args) => add(context, args),
        EntryCommand::List { period, kind } => list(context, period, kind),
        EntryCommand::Edit(args) => edit(context, args),
        EntryCommand::Consolidate { id, undo } => consolidate(context, id, undo),
        EntryCommand::Delete { id } => {
            let removed = EntryService::delete(context.book_mut(), id)?;
            context.save()?;
            output::success(format!("Removed {} entry row(s)", removed));
            Ok(())
        }
    }
}

fn add(context: &mut CliContext, args: EntryAddArgs) -> Result<(), AppError> {
    let date = args.date.unwrap_or_else(|| context.today());
    let mut request = EntryRequest::new(args.description, args.amount, args.kind, date);
    if let Some(category) = args.category {
        request = request.with_category(category);
    }
    if args.monthly {
        request = request.monthly(args.day);
    }
    let id = EntryService::add(context.book_mut(), request)?;
    context.save()?;
    let label = if args.monthly { "monthly " } else { "" };
    output::success(format!("Added {}{} {}", label, args.kind, id));
    Ok(())
}

fn edit(context: &mut CliContext, args: EntryEditArgs) -> Result<(), AppError> {
    let category = if args.clear_category {
        Some(None)
    } else {
        args.category.map(Some)
    };
    let changes = EntryChanges {
        description: args.description,
        amount: args.amount,
        kind: args.kind,
        date: args.date,
        category,
        recurring_day: args.day.map(Some),
    };
    EntryService::update(context.book_mut(), args.id, changes)?;
    context.save()?;
    output::success(format!("Entry {} updated", args.id));
    Ok(())
}

fn list(
    context: &mut CliContext,
    period: PeriodArgs,
    kind: Option<EntryKind>,
) -> Result<(), AppError> {
    let month = period.resolve(context.today())?;
    let revision = context.revision();
    let entries = EntryService::list_for_month(context.book_mut(), month, kind)?;
    context.save_if_touched(revision)?;

    output::section(format!("Entries {}", month));
    if entries.is_empty() {
        output::info("No entries this month.");
        return Ok(());
    }
    for entry in &entries {
        let mut notes = Vec::new();
        if entry.is_series_head() {
            notes.push("monthly".to_string());
        }
        if entry.is_occurrence() {
            notes.push("occurrence".to_string());
        }
        if entry.consolidated {
            notes.push("consolidated".to_string());
        }
        output::row(&[
            entry.id.to_string(),
            entry.date.to_string(),
            entry.kind.to_string(),
            entry.description.clone(),
            context.money(entry.amount),
            notes.join(", "),
        ]);
    }
    Ok(())
}

fn consolidate(context: &mut CliContext, id: Uuid, undo: bool) -> Result<(), AppError> {
    let today = context.today();
    let outcome = if undo {
        EntryService::unconsolidate(context.book_mut(), id)?
    } else {
        EntryService::consolidate(context.book_mut(), id, today)?
    };
    match outcome {
        ConsolidationOutcome::Consolidated => output::success("Entry consolidated"),
        ConsolidationOutcome::Unconsolidated => output::success("Entry consolidation reverted"),
        ConsolidationOutcome::AlreadyConsolidated => {
            output::info("Entry was already consolidated")
        }
        ConsolidationOutcome::NotConsolidated => output::info("Entry was not consolidated"),
    }
    if matches!(
        outcome,
        ConsolidationOutcome::Consolidated | ConsolidationOutcome::Unconsolidated
    ) {
        context.save()?;
    }
    Ok(())
}
