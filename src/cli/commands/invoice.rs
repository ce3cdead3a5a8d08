use clap::{Args, Subcommand};
use uuid::Uuid;

use billcycle_core::{InvoiceService, PaymentOutcome};

use crate::cli::{output, CliContext, PeriodArgs};
use crate::AppError;

#[derive(Debug, Subcommand)]
pub enum InvoiceCommand {
    /// Statements of every active card for a month
    List {
        #[command(flatten)]
        period: PeriodArgs,
        /// Also list the installments on each statement.
        #[arg(long)]
        detailed: bool,
    },
    /// Pay a statement and all its installments
    Pay(InvoiceTarget),
    /// Revert a statement payment
    Unpay(InvoiceTarget),
    /// Totals from six months back to five months ahead
    Timeline,
}

/// Either an invoice id or a card plus statement month.
#[derive(Debug, Args)]
pub struct InvoiceTarget {
    #[arg(long, conflicts_with = "card", required_unless_present = "card")]
    pub invoice: Option<Uuid>,
    #[arg(long)]
    pub card: Option<Uuid>,
    #[command(flatten)]
    pub period: PeriodArgs,
}

pub fn run(context: &mut CliContext, command: InvoiceCommand) -> Result<(), AppError> {
    match command {
        InvoiceCommand::List { period, detailed } => list(context, period, detailed),
        InvoiceCommand::Pay(target) => settle(context, target, true),
        InvoiceCommand::Unpay(target) => settle(context, target, false),
        InvoiceCommand::Timeline => timeline(context),
    }
}

fn list(context: &mut CliContext, period: PeriodArgs, detailed: bool) -> Result<(), AppError> {
    let today = context.today();
    let statement = period.resolve(today)?;
    let revision = context.revision();
    let views = InvoiceService::invoices_for_month(context.book_mut(), statement, today)?;
    context.save_if_touched(revision)?;

    output::section(format!("Invoices {}", statement));
    if views.is_empty() {
        output::info("Nothing billed this month.");
        return Ok(());
    }
    let mut total = 0.0;
    for view in &views {
        total += view.amount;
        output::row(&[
            view.card_name.clone(),
            context.money(view.amount),
            format!("closes {}", view.closing_date),
            format!("due {}", view.due_date),
            output::invoice_status(view.status).to_string(),
        ]);
        if detailed {
            for installment in &view.installments {
                output::row(&[
                    format!("  {}", installment.id),
                    installment.to_string(),
                    context.money(installment.amount),
                ]);
            }
        }
    }
    output::info(format!("Total: {}", context.money(total)));
    Ok(())
}

fn settle(context: &mut CliContext, target: InvoiceTarget, pay: bool) -> Result<(), AppError> {
    let today = context.today();
    let (book, clock) = context.book_and_clock();
    let outcome = match (target.invoice, target.card) {
        (Some(id), _) if pay => InvoiceService::pay(book, id, clock)?,
        (Some(id), _) => InvoiceService::unpay(book, id, clock)?,
        (None, Some(card)) => {
            let statement = target.period.resolve(today)?;
            if pay {
                InvoiceService::pay_statement(book, card, statement, clock)?
            } else {
                InvoiceService::unpay_statement(book, card, statement, clock)?
            }
        }
        (None, None) => {
            return Err(AppError::Input("pass --invoice or --card".into()));
        }
    };

    match outcome {
        PaymentOutcome::Paid => output::success("Invoice paid"),
        PaymentOutcome::Unpaid => output::success("Invoice payment reverted"),
        PaymentOutcome::AlreadyPaid => output::info("Invoice was already paid"),
        PaymentOutcome::NotPaid => output::info("Invoice was not paid"),
    }
    if outcome.changed() {
        context.save()?;
    }
    Ok(())
}

fn timeline(context: &mut CliContext) -> Result<(), AppError> {
    let entries = InvoiceService::timeline(context.book(), context.today());
    output::section("Invoice timeline");
    for entry in entries {
        let marker = if entry.is_current { ">" } else { " " };
        let state = if entry.is_paid {
            "paid"
        } else if entry.is_past {
            "past"
        } else {
            ""
        };
        output::row(&[
            format!("{} {}", marker, entry.statement),
            context.money(entry.amount),
            state.to_string(),
        ]);
    }
    Ok(())
}
