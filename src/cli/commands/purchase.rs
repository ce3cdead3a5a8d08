use chrono::NaiveDate;
use clap::{Args, Subcommand};
use uuid::Uuid;

use billcycle_core::{AnticipationService, InstallmentService, PaymentOutcome, PurchaseRequest};

use super::short_id;
use crate::cli::{output, CliContext};
use crate::AppError;

#[derive(Debug, Subcommand)]
pub enum PurchaseCommand {
    /// Register a purchase split into installments
    Add(PurchaseAddArgs),
    /// List a card's purchases and their installments
    List {
        #[arg(long)]
        card: Uuid,
    },
    /// Delete a purchase and its installments
    Delete { id: Uuid },
    /// Move unpaid installments onto the card's open statement
    Anticipate {
        purchase: Uuid,
        /// Installment ids to move; repeat the flag for several.
        #[arg(long = "installment", required = true)]
        installments: Vec<Uuid>,
    },
    /// Mark one installment paid
    PayInstallment { id: Uuid },
    /// Assign statements to installments stored without one
    Backfill,
}

#[derive(Debug, Args)]
pub struct PurchaseAddArgs {
    #[arg(long)]
    pub card: Uuid,
    #[arg(long)]
    pub description: String,
    /// Total amount, split evenly across installments.
    #[arg(long)]
    pub amount: f64,
    /// Purchase day; defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,
    #[arg(long, default_value_t = 1)]
    pub installments: u32,
    #[arg(long)]
    pub category: Option<String>,
}

pub fn run(context: &mut CliContext, command: PurchaseCommand) -> Result<(), AppError> {
    match command {
        PurchaseCommand::Add(args) => add(context, args),
        PurchaseCommand::List { card } => list(context, card),
        PurchaseCommand::Delete { id } => {
            InstallmentService::delete_purchase(context.book_mut(), id)?;
            context.save()?;
            output::success(format!("Purchase {} deleted", id));
            Ok(())
        }
        PurchaseCommand::Anticipate {
            purchase,
            installments,
        } => anticipate(context, purchase, &installments),
        PurchaseCommand::PayInstallment { id } => {
            let (book, clock) = context.book_and_clock();
            let outcome = InstallmentService::pay_installment(book, id, clock)?;
            match outcome {
                PaymentOutcome::AlreadyPaid => {
                    output::info(format!("Installment {} was already paid", id))
                }
                _ => {
                    context.save()?;
                    output::success(format!("Installment {} paid", id));
                }
            }
            Ok(())
        }
        PurchaseCommand::Backfill => {
            let updated = InstallmentService::backfill_statements(context.book_mut())?;
            if updated > 0 {
                context.save()?;
            }
            output::success(format!("{} installment(s) updated", updated));
            Ok(())
        }
    }
}

fn add(context: &mut CliContext, args: PurchaseAddArgs) -> Result<(), AppError> {
    let date = args.date.unwrap_or_else(|| context.today());
    let mut request =
        PurchaseRequest::new(args.card, args.description, args.amount, date, args.installments);
    if let Some(category) = args.category {
        request = request.with_category(category);
    }
    let id = InstallmentService::register_purchase(context.book_mut(), request)?;
    context.save()?;
    output::success(format!(
        "Added purchase in {} installment(s) {}",
        args.installments, id
    ));
    Ok(())
}

fn list(context: &mut CliContext, card_id: Uuid) -> Result<(), AppError> {
    let book = context.book();
    let purchases = InstallmentService::list_purchases(book, card_id)?;
    output::section("Purchases");
    if purchases.is_empty() {
        output::info("No purchases on this card.");
        return Ok(());
    }
    for purchase in purchases {
        output::row(&[
            purchase.id.to_string(),
            purchase.date.to_string(),
            purchase.description.clone(),
            context.money(purchase.amount),
        ]);
        for installment in InstallmentService::installments_of(book, purchase.id)? {
            let statement = installment
                .statement
                .map(|month| month.to_string())
                .unwrap_or_else(|| "unassigned".into());
            let mut notes = Vec::new();
            if installment.paid {
                notes.push("paid".to_string());
            }
            if let Some(from) = installment.anticipated_from {
                notes.push(format!("anticipated from {}", from));
            }
            output::row(&[
                format!("  {}", installment.id),
                installment.to_string(),
                format!("statement {}", statement),
                format!("due {}", installment.due_date),
                context.money(installment.amount),
                notes.join(", "),
            ]);
        }
    }
    Ok(())
}

fn anticipate(
    context: &mut CliContext,
    purchase_id: Uuid,
    installment_ids: &[Uuid],
) -> Result<(), AppError> {
    let (book, clock) = context.book_and_clock();
    let report = AnticipationService::anticipate(book, purchase_id, installment_ids, clock)?;
    if report.moved == 0 {
        output::warning(format!(
            "No installment moved to the {} statement {} ({} skipped)",
            report.target.kind.label(),
            report.target.statement,
            report.skipped
        ));
        return Ok(());
    }
    context.save()?;
    output::success(format!(
        "Moved {} installment(s) of {} to the {} statement {} ({} skipped)",
        report.moved,
        short_id(purchase_id),
        report.target.kind.label(),
        report.target.statement,
        report.skipped
    ));
    Ok(())
}
