use clap::{Args, Subcommand};
use uuid::Uuid;

use billcycle_core::{CardChanges, CardService};
use billcycle_domain::CreditCard;

use crate::cli::{output, CliContext};
use crate::AppError;

#[derive(Debug, Subcommand)]
pub enum CardCommand {
    /// Register a card
    Add(CardAddArgs),
    /// List cards with their limit usage
    List,
    /// Change card fields
    Update(CardUpdateArgs),
    /// Stop offering a card for new purchases
    Deactivate { id: Uuid },
    /// Delete a card with its purchases and invoices
    Delete { id: Uuid },
}

#[derive(Debug, Args)]
pub struct CardAddArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub limit: f64,
    #[arg(long)]
    pub closing_day: u32,
    /// Day the invoice is due; may exceed the month length to land in the next month.
    #[arg(long)]
    pub due_day: Option<u32>,
    #[arg(long)]
    pub brand: Option<String>,
    #[arg(long)]
    pub last_digits: Option<String>,
}

#[derive(Debug, Args)]
pub struct CardUpdateArgs {
    pub id: Uuid,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub limit: Option<f64>,
    #[arg(long)]
    pub closing_day: Option<u32>,
    #[arg(long)]
    pub due_day: Option<u32>,
    /// Fall back to the closing day plus seven.
    #[arg(long, conflicts_with = "due_day")]
    pub clear_due_day: bool,
}

pub fn run(context: &mut CliContext, command: CardCommand) -> Result<(), AppError> {
    match command {
        CardCommand::Add(args) => add(context, args),
        CardCommand::List => list(context),
        CardCommand::Update(args) => update(context, args),
        CardCommand::Deactivate { id } => {
            if CardService::deactivate(context.book_mut(), id)? {
                context.save()?;
                output::success(format!("Card {} deactivated", id));
            } else {
                output::info(format!("Card {} was already inactive", id));
            }
            Ok(())
        }
        CardCommand::Delete { id } => {
            CardService::remove(context.book_mut(), id)?;
            context.save()?;
            output::success(format!("Card {} deleted", id));
            Ok(())
        }
    }
}

fn add(context: &mut CliContext, args: CardAddArgs) -> Result<(), AppError> {
    let mut card = CreditCard::new(args.name, args.limit, args.closing_day, args.due_day);
    card.brand = args.brand;
    card.last_digits = args.last_digits;
    let name = card.name.clone();
    let id = CardService::add(context.book_mut(), card)?;
    context.save()?;
    output::success(format!("Added card {} {}", name, id));
    Ok(())
}

fn update(context: &mut CliContext, args: CardUpdateArgs) -> Result<(), AppError> {
    let due_day = if args.clear_due_day {
        Some(None)
    } else {
        args.due_day.map(Some)
    };
    let changes = CardChanges {
        name: args.name,
        credit_limit: args.limit,
        closing_day: args.closing_day,
        due_day,
        ..CardChanges::default()
    };
    CardService::update(context.book_mut(), args.id, changes)?;
    context.save()?;
    output::success(format!("Card {} updated", args.id));
    Ok(())
}

fn list(context: &mut CliContext) -> Result<(), AppError> {
    let book = context.book();
    let cards = CardService::list(book);
    output::section("Cards");
    if cards.is_empty() {
        output::info("No cards registered.");
        return Ok(());
    }
    for card in cards {
        let usage = CardService::usage(book, card.id)?;
        let state = if card.active { "" } else { " (inactive)" };
        output::row(&[
            card.id.to_string(),
            format!("{}{}", card.name, state),
            format!("closes {:>2}", card.closing_day),
            format!("due {:>2}", card.effective_due_day()),
            format!("limit {}", context.money(usage.limit)),
            format!("used {}", context.money(usage.used)),
            format!("available {}", context.money(usage.available)),
            format!("{:.1}%", usage.percent()),
        ]);
    }
    Ok(())
}
