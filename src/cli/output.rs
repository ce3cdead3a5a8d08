use colored::{ColoredString, Colorize};
use std::fmt;

use billcycle_core::AlertPriority;
use billcycle_domain::{BillStatus, InvoiceStatus};

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
    Section,
}

/// Turns colors off for the rest of the process.
pub fn disable_colors() {
    colored::control::set_override(false);
}

fn build_label(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::Info => "[i]",
        MessageKind::Success => "[ok]",
        MessageKind::Warning => "[!]",
        MessageKind::Error => "[x]",
        MessageKind::Section => "",
    }
}

fn apply_style(kind: MessageKind, message: impl fmt::Display) -> String {
    let text = message.to_string();
    let formatted = match kind {
        MessageKind::Section => format!("=== {} ===", text.trim()),
        _ => format!("{} {}", build_label(kind), text),
    };

    match kind {
        MessageKind::Success => formatted.bright_green().to_string(),
        MessageKind::Warning => formatted.bright_yellow().to_string(),
        MessageKind::Error => formatted.bright_red().to_string(),
        MessageKind::Section => formatted.bold().to_string(),
        MessageKind::Info => formatted,
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    let formatted = apply_style(kind, message);
    match kind {
        MessageKind::Error => eprintln!("{}", formatted),
        MessageKind::Section => println!("\n{}", formatted),
        _ => println!("{}", formatted),
    }
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
}

pub fn success(message: impl fmt::Display) {
    print(MessageKind::Success, message);
}

pub fn warning(message: impl fmt::Display) {
    print(MessageKind::Warning, message);
}

pub fn error(message: impl fmt::Display) {
    print(MessageKind::Error, message);
}

pub fn section(title: impl fmt::Display) {
    print(MessageKind::Section, title);
}

/// A plain table row; callers pass already formatted cells.
pub fn row(cells: &[String]) {
    println!("  {}", cells.join("  "));
}

/// Languages that write decimals with a comma, matched on the locale's
/// language subtag.
const DECIMAL_COMMA_LANGUAGES: &[&str] = &[
    "cs", "da", "de", "es", "fi", "fr", "it", "nb", "nl", "pl", "pt", "ru", "sv", "tr",
];

fn uses_decimal_comma(locale: &str) -> bool {
    let language = locale
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    DECIMAL_COMMA_LANGUAGES.contains(&language.as_str())
}

pub fn money(amount: f64, currency: &str, locale: &str) -> String {
    let digits = format!("{:.2}", amount);
    if uses_decimal_comma(locale) {
        format!("{} {}", digits.replace('.', ","), currency)
    } else {
        format!("{} {}", digits, currency)
    }
}

pub fn invoice_status(status: InvoiceStatus) -> ColoredString {
    let label = status.to_string();
    match status {
        InvoiceStatus::Paid => label.green(),
        InvoiceStatus::Closed => label.yellow(),
        InvoiceStatus::Open => label.cyan(),
    }
}

pub fn bill_status(status: BillStatus) -> ColoredString {
    let label = status.to_string();
    match status {
        BillStatus::Paid => label.green(),
        BillStatus::Overdue => label.red().bold(),
        BillStatus::Pending => label.yellow(),
    }
}

pub fn priority(priority: AlertPriority) -> ColoredString {
    match priority {
        AlertPriority::Urgent => "URGENT".red().bold(),
        AlertPriority::High => "HIGH".yellow(),
        AlertPriority::Normal => "NORMAL".normal(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_uses_two_decimals() {
        assert_eq!(money(1234.5, "USD", "en-US"), "1234.50 USD");
    }

    #[test]
    fn money_follows_the_locale_decimal_separator() {
        assert_eq!(money(1234.5, "BRL", "pt-BR"), "1234,50 BRL");
        assert_eq!(money(-8.0, "EUR", "de_DE"), "-8,00 EUR");
        assert_eq!(money(0.25, "GBP", "en-GB"), "0.25 GBP");
        assert_eq!(money(3.0, "USD", ""), "3.00 USD");
    }

    #[test]
    fn styled_messages_carry_labels() {
        disable_colors();
        assert_eq!(apply_style(MessageKind::Warning, "late"), "[!] late");
        assert_eq!(apply_style(MessageKind::Section, " Cards "), "=== Cards ===");
    }
}
