use chrono::NaiveDate;
use clap::Args;

use billcycle_core::{AlertService, CalendarService, DashboardService};
use billcycle_domain::YearMonth;

use crate::cli::{output, CliContext, PeriodArgs};
use crate::AppError;

#[derive(Debug, Args)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub period: PeriodArgs,
    /// Also show expenses grouped by category.
    #[arg(long)]
    pub categories: bool,
    /// Also show this many preceding months.
    #[arg(long, value_name = "MONTHS")]
    pub trend: Option<u32>,
}

#[derive(Debug, Args)]
pub struct CalendarArgs {
    /// First day; defaults to the first day of the current month.
    #[arg(long)]
    pub from: Option<NaiveDate>,
    /// Last day, inclusive; defaults to the end of the month of `--from`.
    #[arg(long)]
    pub to: Option<NaiveDate>,
}

pub fn summary(context: &mut CliContext, args: SummaryArgs) -> Result<(), AppError> {
    let today = context.today();
    let month = args.period.resolve(today)?;
    let revision = context.revision();
    let summary = DashboardService::summary(context.book_mut(), month, today)?;
    let categories = if args.categories {
        DashboardService::expenses_by_category(context.book_mut(), month)?
    } else {
        Vec::new()
    };
    let trend = match args.trend {
        Some(months) => DashboardService::monthly_trend(context.book_mut(), month, months)?,
        None => Vec::new(),
    };
    context.save_if_touched(revision)?;

    output::section(format!("Summary {}", summary.month));
    let cards = summary.cards;
    output::row(&[
        "Cards".into(),
        format!("limit {}", context.money(cards.limit)),
        format!("used {}", context.money(cards.used)),
        format!("available {}", context.money(cards.available)),
        format!("{:.1}%", cards.usage_percent),
    ]);
    let bills = summary.bills;
    output::row(&[
        "Bills".into(),
        format!(
            "{} pending ({})",
            bills.pending_count,
            context.money(bills.pending_amount)
        ),
        format!(
            "{} overdue ({})",
            bills.overdue_count,
            context.money(bills.overdue_amount)
        ),
    ]);
    let monthly = summary.monthly;
    output::row(&["Income".into(), context.money(monthly.income)]);
    output::row(&[
        "Expenses".into(),
        context.money(monthly.expenses),
        format!("cards {}", context.money(monthly.card_expenses)),
    ]);
    output::row(&["Balance".into(), context.money(monthly.balance)]);

    if args.categories {
        output::section("Expenses by category");
        for row in categories {
            output::row(&[row.category, context.money(row.amount)]);
        }
    }
    if !trend.is_empty() {
        output::section("Trend");
        for point in trend {
            output::row(&[
                point.month.to_string(),
                format!("in {}", context.money(point.totals.income)),
                format!("out {}", context.money(point.totals.expenses)),
                format!("balance {}", context.money(point.totals.balance)),
            ]);
        }
    }
    Ok(())
}

pub fn calendar(context: &mut CliContext, args: CalendarArgs) -> Result<(), AppError> {
    let today = context.today();
    let start = args
        .from
        .unwrap_or_else(|| YearMonth::of(today).first_day());
    let end = args.to.unwrap_or_else(|| YearMonth::of(start).last_day());
    let revision = context.revision();
    let events = CalendarService::events(context.book_mut(), start, end, today)?;
    context.save_if_touched(revision)?;

    output::section(format!("Calendar {} to {}", start, end));
    if events.is_empty() {
        output::info("Nothing scheduled.");
        return Ok(());
    }
    for event in events {
        output::row(&[
            event.date.to_string(),
            format!("{:<7}", event.kind.to_string()),
            event.title,
            context.money(event.amount),
            event.status,
        ]);
    }
    Ok(())
}

pub fn alerts(context: &mut CliContext) -> Result<(), AppError> {
    let today = context.today();
    let thresholds = context.alert_thresholds();
    let revision = context.revision();
    let alerts = AlertService::alerts(context.book_mut(), today, thresholds)?;
    context.save_if_touched(revision)?;

    output::section("Alerts");
    if alerts.is_empty() {
        output::info("Nothing needs attention.");
        return Ok(());
    }
    for alert in alerts {
        output::row(&[output::priority(alert.priority).to_string(), alert.message]);
    }
    Ok(())
}
