//! Transfer commands - domestic and international transfers

use anyhow::{anyhow, Result};
use bankdash_core::domain::{FeePaymentOption, FieldKind, InternationalTransferForm, TransferForm};
use bankdash_core::services::{DomesticQuote, InternationalQuote};
use bankdash_core::{BankdashContext, LogEvent};
use clap::Args;
use colored::Colorize;
use dialoguer::Input;

use super::{confirm, get_context, get_logger, log_event, pin_or_prompt, report, submit_with_spinner};
use crate::output::{self, format_money};

#[derive(Args)]
pub struct TransferArgs {
    /// Source account (name or id)
    #[arg(long)]
    from: String,
    /// Destination account (name or id)
    #[arg(long)]
    to: String,
    /// Amount in the source account's currency
    #[arg(long)]
    amount: String,
    /// Optional note, up to 140 characters
    #[arg(long)]
    description: Option<String>,
    /// Transaction PIN (prompted when omitted)
    #[arg(long)]
    pin: Option<String>,
    /// Only show the quote
    #[arg(long)]
    dry_run: bool,
    /// Skip confirmation prompt
    #[arg(long, short)]
    yes: bool,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
pub struct InternationalArgs {
    /// Source account (name or id)
    #[arg(long)]
    from: String,
    /// Saved beneficiary (name or id) to fill the recipient from
    #[arg(long)]
    beneficiary: Option<String>,
    /// Destination country code
    #[arg(long)]
    country: Option<String>,
    /// Recipient name
    #[arg(long)]
    recipient: Option<String>,
    /// Recipient bank name
    #[arg(long)]
    bank: Option<String>,
    /// Recipient account number
    #[arg(long)]
    account_number: Option<String>,
    /// Amount in the source account's currency
    #[arg(long)]
    amount: String,
    /// Currency the recipient receives (defaults to the country's currency)
    #[arg(long)]
    currency: Option<String>,
    /// Who pays the fee: sender, recipient or shared
    #[arg(long, default_value = "sender")]
    fee: String,
    /// Purpose of the payment
    #[arg(long)]
    purpose: String,
    /// Bank identifier as field=value, e.g. iban=DE89... (repeatable)
    #[arg(long = "field", value_name = "FIELD=VALUE")]
    fields: Vec<String>,
    /// Transaction PIN (prompted when omitted)
    #[arg(long)]
    pin: Option<String>,
    /// Only show the quote
    #[arg(long)]
    dry_run: bool,
    /// Skip confirmation prompt
    #[arg(long, short)]
    yes: bool,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Check the PIN before anything is submitted
fn authorize(ctx: &BankdashContext, pin: Option<String>, json: bool) -> Result<()> {
    let pin = pin_or_prompt(pin)?;
    ctx.auth_service.verify_pin(&pin).map_err(|e| report(e, json))
}

pub fn run_domestic(args: TransferArgs) -> Result<()> {
    let logger = get_logger();
    let ctx = get_context()?;
    let form = TransferForm {
        from_account: args.from,
        to_account: args.to,
        amount: args.amount,
        description: args.description,
    };

    let quote = ctx
        .transfer_service
        .quote_domestic(&form)
        .map_err(|e| report(e, args.json))?;

    if args.json && args.dry_run {
        println!("{}", serde_json::to_string_pretty(&quote)?);
        return Ok(());
    }
    if !args.json {
        print_domestic_quote(&quote);
    }
    if args.dry_run {
        return Ok(());
    }
    if !confirm("Submit this transfer?", args.yes, args.json)? {
        println!("Cancelled.");
        return Ok(());
    }
    authorize(&ctx, args.pin, args.json)?;

    log_event(&logger, LogEvent::new("transfer_started").with_command("transfer"));
    let receipt = submit_with_spinner(
        "Processing transfer...",
        ctx.transfer_service.submit_domestic(&form),
    );
    let receipt = match receipt {
        Ok(r) => r,
        Err(e) => {
            log_event(
                &logger,
                LogEvent::new("transfer_failed").with_command("transfer").with_error(e.to_string()),
            );
            return Err(report(e, args.json));
        }
    };
    log_event(&logger, LogEvent::new("transfer_completed").with_command("transfer"));

    if args.json {
        println!("{}", serde_json::to_string_pretty(&receipt)?);
    } else {
        output::receipt(&receipt);
    }
    Ok(())
}

fn print_domestic_quote(quote: &DomesticQuote) {
    println!("{}", "Transfer".bold());
    println!("  From: {}", quote.from_account);
    println!("  To: {}", quote.to_account);
    println!("  Amount: {}", format_money(quote.amount, &quote.currency));
    if let Some(converted) = &quote.converted {
        println!(
            "  Arrives as: {} (1 {} = {} {})",
            format_money(converted.converted, &converted.to),
            converted.from,
            converted.rate,
            converted.to
        );
    }
}

/// Parse repeated `field=value` flags into identifiers
fn parse_fields(form: &mut InternationalTransferForm, fields: &[String]) -> Result<()> {
    for raw in fields {
        let (name, value) = raw
            .split_once('=')
            .ok_or_else(|| anyhow!("Expected FIELD=VALUE, got '{}'", raw))?;
        let kind = FieldKind::from_field_name(name.trim())
            .ok_or_else(|| anyhow!("Unknown bank field '{}'", name.trim()))?;
        form.set_identifier(kind, value.trim());
    }
    Ok(())
}

fn build_international_form(ctx: &BankdashContext, args: &InternationalArgs) -> Result<InternationalTransferForm> {
    let transfers = &ctx.transfer_service;
    let mut form = InternationalTransferForm {
        from_account: args.from.clone(),
        amount: args.amount.clone(),
        fee_payment_option: Some(args.fee.clone()),
        purpose: args.purpose.clone(),
        ..Default::default()
    };

    if let Some(beneficiary) = &args.beneficiary {
        transfers
            .apply_beneficiary(&mut form, beneficiary)
            .map_err(|e| report(e, args.json))?;
    }

    // Explicit flags win over the beneficiary's details
    if let Some(country) = &args.country {
        ctx.resolver.select_country(&mut form, country);
    }
    if let Some(recipient) = &args.recipient {
        form.recipient_name = recipient.clone();
    }
    if let Some(bank) = &args.bank {
        form.bank_name = bank.clone();
    }
    if let Some(number) = &args.account_number {
        form.account_number = number.clone();
    }
    form.currency = match &args.currency {
        Some(c) => c.clone(),
        None => ctx
            .resolver
            .find(&form.recipient_country)
            .map(|c| c.currency.clone())
            .unwrap_or_default(),
    };

    parse_fields(&mut form, &args.fields)?;

    // Prompt for identifiers the destination needs and the flags left out
    if !args.json && atty::is(atty::Stream::Stdin) {
        for kind in ctx.resolver.resolve(&form.recipient_country) {
            if form.identifier(kind).map_or(true, |v| v.trim().is_empty()) {
                let value: String = Input::new().with_prompt(kind.label()).interact_text()?;
                form.set_identifier(kind, value);
            }
        }
    }

    Ok(form)
}

pub fn run_international(args: InternationalArgs) -> Result<()> {
    let logger = get_logger();
    let ctx = get_context()?;
    let form = build_international_form(&ctx, &args)?;

    let quote = ctx
        .transfer_service
        .quote_international(&form)
        .map_err(|e| report(e, args.json))?;

    if args.json && args.dry_run {
        println!("{}", serde_json::to_string_pretty(&quote)?);
        return Ok(());
    }
    if !args.json {
        print_international_quote(&quote);
    }
    if args.dry_run {
        return Ok(());
    }
    if !confirm("Send this international transfer?", args.yes, args.json)? {
        println!("Cancelled.");
        return Ok(());
    }
    authorize(&ctx, args.pin.clone(), args.json)?;

    log_event(&logger, LogEvent::new("international_transfer_started").with_command("international"));
    let receipt = submit_with_spinner(
        "Sending international transfer...",
        ctx.transfer_service.submit_international(&form),
    );
    let receipt = match receipt {
        Ok(r) => r,
        Err(e) => {
            log_event(
                &logger,
                LogEvent::new("international_transfer_failed")
                    .with_command("international")
                    .with_error(e.to_string()),
            );
            return Err(report(e, args.json));
        }
    };
    log_event(&logger, LogEvent::new("international_transfer_completed").with_command("international"));

    if args.json {
        println!("{}", serde_json::to_string_pretty(&receipt)?);
    } else {
        output::receipt(&receipt);
    }
    Ok(())
}

fn print_international_quote(quote: &InternationalQuote) {
    println!("{}", "International transfer".bold());
    println!("  From: {}", quote.from_account);
    println!("  Destination: {}", quote.recipient_country);
    println!("  Amount: {}", format_money(quote.amount, &quote.source_currency));
    println!(
        "  Fee: {} (paid by {})",
        format_money(quote.fee, &quote.source_currency),
        match quote.fee_option {
            FeePaymentOption::Sender => "sender",
            FeePaymentOption::Recipient => "recipient",
            FeePaymentOption::Shared => "both parties",
        }
    );
    println!("  Total debit: {}", format_money(quote.total_debit, &quote.source_currency).bold());
    println!(
        "  Recipient gets: {} (1 {} = {} {})",
        format_money(quote.recipient_amount, &quote.target_currency).bold(),
        quote.source_currency,
        quote.rate,
        quote.target_currency
    );
    let fields: Vec<&str> = quote.required_fields.iter().map(|k| k.label()).collect();
    if !fields.is_empty() {
        println!("  Bank details: {}", fields.join(", "));
    }
}
