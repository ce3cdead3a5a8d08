use chrono::NaiveDate;
use clap::{Args, Subcommand};
use uuid::Uuid;

use billcycle_core::{BillQuery, BillService, PaymentOutcome};
use billcycle_domain::{Bill, BillStatus, YearMonth};

use crate::cli::{output, CliContext};
use crate::AppError;

#[derive(Debug, Subcommand)]
pub enum BillCommand {
    /// Register a bill
    Add(BillAddArgs),
    /// List bills, optionally for one month or status
    List(BillListArgs),
    /// Mark a bill paid
    Pay { id: Uuid },
    /// Delete a bill
    Delete { id: Uuid },
}

#[derive(Debug, Args)]
pub struct BillAddArgs {
    #[arg(long)]
    pub description: String,
    #[arg(long)]
    pub amount: f64,
    #[arg(long)]
    pub due: NaiveDate,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub barcode: Option<String>,
}

#[derive(Debug, Args)]
pub struct BillListArgs {
    /// Only bills due in this month.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    pub month: Option<u32>,
    /// Year of `--month`; defaults to the current year.
    #[arg(long, requires = "month")]
    pub year: Option<i32>,
    /// `paid`, `pending` or `overdue`.
    #[arg(long)]
    pub status: Option<BillStatus>,
}

pub fn run(context: &mut CliContext, command: BillCommand) -> Result<(), AppError> {
    match command {
        BillCommand::Add(args) => {
            let mut bill = Bill::new(args.description, args.amount, args.due);
            bill.category = args.category;
            bill.barcode = args.barcode;
            let id = BillService::add(context.book_mut(), bill)?;
            context.save()?;
            output::success(format!("Added bill {}", id));
            Ok(())
        }
        BillCommand::List(args) => list(context, args),
        BillCommand::Pay { id } => {
            let (book, clock) = context.book_and_clock();
            let outcome = BillService::pay(book, id, clock)?;
            if outcome == PaymentOutcome::AlreadyPaid {
                output::info(format!("Bill {} was already paid", id));
            } else {
                context.save()?;
                output::success(format!("Bill {} paid", id));
            }
            Ok(())
        }
        BillCommand::Delete { id } => {
            BillService::remove(context.book_mut(), id)?;
            context.save()?;
            output::success(format!("Bill {} deleted", id));
            Ok(())
        }
    }
}

fn list(context: &mut CliContext, args: BillListArgs) -> Result<(), AppError> {
    let today = context.today();
    let month = match args.month {
        Some(month) => Some(
            YearMonth::new(args.year.unwrap_or(YearMonth::of(today).year()), month)
                .map_err(|err| AppError::Input(err.to_string()))?,
        ),
        None => None,
    };
    let query = BillQuery {
        month,
        status: args.status,
    };
    let bills = BillService::list(context.book(), query, today);

    output::section("Bills");
    if bills.is_empty() {
        output::info("No bills found.");
        return Ok(());
    }
    for bill in bills {
        output::row(&[
            bill.id.to_string(),
            format!("due {}", bill.due_date),
            bill.description.clone(),
            context.money(bill.amount),
            output::bill_status(bill.status(today)).to_string(),
        ]);
    }
    Ok(())
}
