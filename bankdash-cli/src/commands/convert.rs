//! Convert command - run an amount through one of the rate tables

use anyhow::{anyhow, Result};
use bankdash_core::adapters::demo;
use bankdash_core::domain::RateSource;
use bankdash_core::services::conversion;
use colored::Colorize;

pub fn run(amount: &str, from: &str, to: &str, table: &str, round_trip: bool, json: bool) -> Result<()> {
    let source = RateSource::parse(table)
        .ok_or_else(|| anyhow!("Unknown rate table '{}'. Use swap, transfer or international", table))?;
    let rates = demo::rate_table(source);

    let quote = conversion::quote(amount, from, to, &rates);
    let back = if round_trip {
        conversion::round_trip(amount, from, to, &rates)
    } else {
        None
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "table": source.as_str(),
                "quote": quote,
                "round_trip": back,
            }))?
        );
        return Ok(());
    }

    // Invalid amounts and unknown pairs show no result, like an empty field
    let Some(quote) = quote else {
        println!("{} {} -> {}: {}", amount.trim(), from.trim().to_uppercase(), to.trim().to_uppercase(), "--".dimmed());
        return Ok(());
    };

    println!(
        "{} {} = {} {}",
        quote.amount,
        quote.from,
        quote.converted.to_string().bold(),
        quote.to
    );
    println!("  Rate: 1 {} = {} {} ({} table)", quote.from, quote.rate, quote.to, source.as_str());

    if let Some(back) = back {
        let drift = back - quote.amount;
        println!("  Back again: {} {} (difference {})", back, quote.from, drift);
    }

    Ok(())
}
