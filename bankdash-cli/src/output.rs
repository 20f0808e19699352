//! Output formatting utilities

use std::time::Duration;

use bankdash_core::domain::ValidationErrors;
use bankdash_core::Receipt;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressStyle};
use rust_decimal::Decimal;

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Format a money amount with thousands separators, e.g. "12,345.67 USD"
pub fn format_money(amount: Decimal, currency: &str) -> String {
    let rendered = amount.abs().to_string();
    let (whole, fraction) = match rendered.split_once('.') {
        Some((w, f)) => (w.to_string(), Some(f.to_string())),
        None => (rendered, None),
    };

    let mut grouped = String::new();
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if amount.is_sign_negative() && !amount.is_zero() { "-" } else { "" };
    match fraction {
        Some(f) => format!("{}{}.{} {}", sign, grouped, f, currency),
        None => format!("{}{} {}", sign, grouped, currency),
    }
}

/// Print validation failures one field per line
pub fn validation(errors: &ValidationErrors) {
    eprintln!("{}", "Please fix the following:".red().bold());
    for e in errors.iter() {
        eprintln!("  {} {}", format!("{}:", e.path).bold(), e.message);
    }
}

/// Spinner shown while a submission is in flight
///
/// Hidden when stdout is not a terminal so piped output stays clean.
pub fn spinner(msg: &str) -> ProgressBar {
    if atty::isnt(atty::Stream::Stdout) {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Print a transaction receipt
pub fn receipt(receipt: &Receipt) {
    success("Transaction submitted");
    println!("  Reference: {}", receipt.short_reference().bold());
    println!("  Type: {}", receipt.kind.as_str());
    println!("  Amount: {}", format_money(receipt.amount, &receipt.currency));
    println!("  Details: {}", receipt.summary);
    println!(
        "  Completed: {}",
        receipt.completed_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
}

/// Format bytes as human-readable size
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_money_groups_thousands() {
        assert_eq!(format_money(Decimal::new(1234567, 2), "USD"), "12,345.67 USD");
        assert_eq!(format_money(Decimal::new(999, 0), "EUR"), "999 EUR");
        assert_eq!(format_money(Decimal::new(-100000, 2), "USD"), "-1,000.00 USD");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 bytes");
        assert_eq!(format_size(2048), "2.0 KB");
    }
}
