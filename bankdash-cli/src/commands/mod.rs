//! CLI command implementations

pub mod accounts;
pub mod auth;
pub mod convert;
pub mod countries;
pub mod loan;
pub mod logs;
pub mod state;
pub mod swap;
pub mod transfer;
pub mod wallet;

use std::future::Future;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use bankdash_core::{BankdashContext, EntryPoint, LogEvent, LoggingService, OperationResult};
use dialoguer::{Confirm, Password};

use crate::output;

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "BANKDASH_DIR";

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<LoggingService> {
    let data_dir = get_data_dir().ok()?;
    std::fs::create_dir_all(&data_dir).ok()?;
    LoggingService::new(&data_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Get the bankdash directory from environment or default
pub fn get_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".bankdash"))
        .ok_or_else(|| anyhow!("Could not find home directory; set {}", DATA_DIR_ENV))
}

/// Get or create bankdash context
pub fn get_context() -> Result<BankdashContext> {
    let data_dir = get_data_dir()?;
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create bankdash directory: {:?}", data_dir))?;

    BankdashContext::new(&data_dir).context("Failed to initialize bankdash context")
}

/// Run a submission future to completion behind a spinner
pub fn submit_with_spinner<F, T>(message: &str, future: F) -> Result<T, bankdash_core::Error>
where
    F: Future<Output = Result<T, bankdash_core::Error>>,
{
    let runtime = tokio::runtime::Runtime::new()?;
    let pb = output::spinner(message);
    let result = runtime.block_on(future);
    pb.finish_and_clear();
    result
}

/// Report a core error and turn it into the error returned from `run`
///
/// Validation failures are listed field by field, or as JSON when asked.
pub fn report(err: bankdash_core::Error, json: bool) -> anyhow::Error {
    if json {
        let message = err.to_string();
        println!("{}", failure_json(err));
        return anyhow!("{}", message);
    }

    match err.validation_errors() {
        Some(errors) => {
            output::validation(errors);
            anyhow!("Validation failed")
        }
        None => anyhow!("{}", err),
    }
}

/// JSON body for a failed operation; validation messages land in `context`
fn failure_json(err: bankdash_core::Error) -> serde_json::Value {
    let result = OperationResult::from(Err::<(), _>(err));
    serde_json::to_value(result).unwrap_or_default()
}

/// PIN from the flag or an interactive prompt
pub fn pin_or_prompt(pin: Option<String>) -> Result<String> {
    if let Some(p) = pin {
        return Ok(p);
    }
    let p = Password::new()
        .with_prompt("Transaction PIN")
        .interact()?;
    Ok(p)
}

/// Ask before submitting, unless `--yes` was given or output is JSON
pub fn confirm(prompt: &str, yes: bool, json: bool) -> Result<bool> {
    if yes || json {
        return Ok(true);
    }
    Ok(Confirm::new().with_prompt(prompt).default(true).interact()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bankdash_core::domain::ValidationErrors;
    use bankdash_core::Error;

    #[test]
    fn test_failure_json_lists_invalid_fields() {
        let mut errors = ValidationErrors::default();
        errors.push("amount", "Amount must be greater than 0");
        errors.push("amount", "Amount is required");
        errors.push("toAccount", "Please select a destination account");

        let body = failure_json(Error::Validation(errors));

        assert_eq!(body["success"], false);
        assert_eq!(body["context"]["amount"], "Amount must be greater than 0");
        assert_eq!(body["context"]["toAccount"], "Please select a destination account");
    }

    #[test]
    fn test_failure_json_plain_error_has_no_context() {
        let body = failure_json(Error::InvalidPin);

        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Invalid PIN");
        assert!(body["context"].is_null());
    }
}
