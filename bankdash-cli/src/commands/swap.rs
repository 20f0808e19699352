//! Swap command - exchange one crypto asset for another

use anyhow::Result;
use bankdash_core::domain::SwapForm;
use bankdash_core::LogEvent;
use colored::Colorize;

use super::{confirm, get_context, get_logger, log_event, pin_or_prompt, report, submit_with_spinner};
use crate::output;

pub fn run(
    from: &str,
    to: &str,
    amount: &str,
    pin: Option<String>,
    dry_run: bool,
    yes: bool,
    json: bool,
) -> Result<()> {
    let logger = get_logger();
    let ctx = get_context()?;
    let form = SwapForm {
        from_asset: from.to_string(),
        to_asset: to.to_string(),
        amount: amount.to_string(),
    };

    let quote = ctx.swap_service.quote(&form).map_err(|e| report(e, json))?;

    if json && dry_run {
        println!("{}", serde_json::to_string_pretty(&quote)?);
        return Ok(());
    }
    if !json {
        println!("{}", "Swap".bold());
        println!("  Sell: {} {}", quote.amount, quote.from);
        println!("  Receive: {} {}", quote.converted.to_string().bold(), quote.to);
        println!("  Rate: 1 {} = {} {}", quote.from, quote.rate, quote.to);
    }
    if dry_run {
        return Ok(());
    }
    if !confirm("Confirm swap?", yes, json)? {
        println!("Cancelled.");
        return Ok(());
    }
    let pin = pin_or_prompt(pin)?;
    ctx.auth_service.verify_pin(&pin).map_err(|e| report(e, json))?;

    log_event(&logger, LogEvent::new("swap_started").with_command("swap"));
    let receipt = match submit_with_spinner("Swapping...", ctx.swap_service.submit(&form)) {
        Ok(r) => r,
        Err(e) => {
            log_event(
                &logger,
                LogEvent::new("swap_failed").with_command("swap").with_error(e.to_string()),
            );
            return Err(report(e, json));
        }
    };
    log_event(&logger, LogEvent::new("swap_completed").with_command("swap"));

    if json {
        println!("{}", serde_json::to_string_pretty(&receipt)?);
    } else {
        output::receipt(&receipt);
    }
    Ok(())
}
