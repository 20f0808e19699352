//! State commands - persisted dashboard flags

use std::time::Duration;

use anyhow::{anyhow, Result};
use bankdash_core::config::{Config, OTP_LENGTH_RANGE, SETTINGS_FILE};
use bankdash_core::domain::AccountMode;
use bankdash_core::LogEvent;
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;

use super::{get_context, get_data_dir, get_logger, log_event};
use crate::output::{self, create_table};

#[derive(Subcommand)]
pub enum StateCommands {
    /// Show the persisted state and active settings
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Switch between banking and crypto mode
    Mode {
        /// banking or crypto
        mode: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change settings.json values; with no flags, prints the saved settings
    Config {
        /// Simulated submission delay in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,
        /// Length of issued one-time codes (4 to 10)
        #[arg(long)]
        otp_length: Option<usize>,
        /// Store changed PINs as Argon2id hashes
        #[arg(long)]
        hash_pins: Option<bool>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Restore every flag to its default, including the PIN
    Reset {
        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: StateCommands) -> Result<()> {
    match command {
        StateCommands::Show { json } => run_show(json),
        StateCommands::Mode { mode, json } => run_mode(&mode, json),
        StateCommands::Config {
            delay_ms,
            otp_length,
            hash_pins,
            json,
        } => run_config(delay_ms, otp_length, hash_pins, json),
        StateCommands::Reset { force, json } => run_reset(force, json),
    }
}

fn run_show(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let state = ctx.auth_service.state()?;
    let config = &ctx.config;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "account_mode": state.account_mode,
                "is_logged_in": state.is_logged_in,
                "user_email": state.user_email,
                "pin_hashed": state.pin_hash.is_some(),
                "data_dir": ctx.data_dir.to_string_lossy(),
                "simulated_delay_ms": config.simulated_delay.as_millis() as u64,
                "otp_length": config.otp_length,
                "gateway": ctx.transfer_service.domestic_submission().gateway_name(),
            }))?
        );
        return Ok(());
    }

    println!("{}", "Dashboard State".bold());
    let mut table = create_table();
    table.add_row(vec!["Mode", state.account_mode.as_str()]);
    table.add_row(vec!["Signed in", if state.is_logged_in { "yes" } else { "no" }]);
    table.add_row(vec!["Email", state.user_email.as_deref().unwrap_or("-")]);
    table.add_row(vec!["PIN storage", if state.pin_hash.is_some() { "argon2id" } else { "plain" }]);
    println!("{}", table);

    println!();
    println!("{}", "Settings".bold());
    println!("  Data directory: {}", ctx.data_dir.display());
    println!("  Simulated delay: {} ms", config.simulated_delay.as_millis());
    println!("  OTP length: {}", config.otp_length);
    Ok(())
}

fn run_mode(mode: &str, json: bool) -> Result<()> {
    let mode = AccountMode::parse(mode)
        .ok_or_else(|| anyhow!("Unknown mode '{}'. Use banking or crypto", mode))?;
    let ctx = get_context()?;
    let state = ctx.auth_service.set_mode(mode)?;
    log_event(&get_logger(), LogEvent::new("mode_changed").with_command("state mode"));

    if json {
        println!("{}", serde_json::json!({ "account_mode": state.account_mode }));
    } else {
        output::success(&format!("Switched to {} mode", state.account_mode.as_str()));
    }
    Ok(())
}

fn run_config(
    delay_ms: Option<u64>,
    otp_length: Option<usize>,
    hash_pins: Option<bool>,
    json: bool,
) -> Result<()> {
    let data_dir = get_data_dir()?;
    let mut config = Config::load_saved(&data_dir)?;
    let changed = apply_settings(&mut config, delay_ms, otp_length, hash_pins)?;

    if changed {
        config.save(&data_dir)?;
        log_event(&get_logger(), LogEvent::new("settings_changed").with_command("state config"));
    }

    if json {
        println!(
            "{}",
            serde_json::json!({
                "changed": changed,
                "simulated_delay_ms": config.simulated_delay.as_millis() as u64,
                "otp_length": config.otp_length,
                "hash_pins": config.hash_pins,
            })
        );
        return Ok(());
    }

    if changed {
        output::success(&format!("Saved {}", data_dir.join(SETTINGS_FILE).display()));
    }
    println!("  Simulated delay: {} ms", config.simulated_delay.as_millis());
    println!("  OTP length: {}", config.otp_length);
    println!("  Hash PINs: {}", if config.hash_pins { "yes" } else { "no" });
    Ok(())
}

/// Apply the given flags to `config`; returns whether anything was set
fn apply_settings(
    config: &mut Config,
    delay_ms: Option<u64>,
    otp_length: Option<usize>,
    hash_pins: Option<bool>,
) -> Result<bool> {
    if let Some(len) = otp_length {
        if !OTP_LENGTH_RANGE.contains(&len) {
            return Err(anyhow!(
                "OTP length must be between {} and {}",
                OTP_LENGTH_RANGE.start(),
                OTP_LENGTH_RANGE.end()
            ));
        }
        config.otp_length = len;
    }
    if let Some(ms) = delay_ms {
        config.simulated_delay = Duration::from_millis(ms);
    }
    if let Some(hash) = hash_pins {
        config.hash_pins = hash;
    }
    Ok(delay_ms.is_some() || otp_length.is_some() || hash_pins.is_some())
}

fn run_reset(force: bool, json: bool) -> Result<()> {
    if !force && !json {
        if !Confirm::new()
            .with_prompt("Reset the dashboard state? This signs you out and restores the default PIN.")
            .default(false)
            .interact()?
        {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let ctx = get_context()?;
    ctx.auth_service.reset()?;
    log_event(&get_logger(), LogEvent::new("state_reset").with_command("state reset"));

    if json {
        println!("{}", serde_json::json!({ "success": true }));
    } else {
        output::success("Dashboard state reset");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_settings_sets_only_given_values() {
        let mut config = Config::default();
        let changed = apply_settings(&mut config, None, Some(8), Some(true)).unwrap();

        assert!(changed);
        assert_eq!(config.otp_length, 8);
        assert!(config.hash_pins);
        assert_eq!(config.simulated_delay, Config::default().simulated_delay);
    }

    #[test]
    fn test_apply_settings_without_flags_changes_nothing() {
        let mut config = Config::default();
        assert!(!apply_settings(&mut config, None, None, None).unwrap());
    }

    #[test]
    fn test_apply_settings_rejects_out_of_range_otp_length() {
        let mut config = Config::default();
        let err = apply_settings(&mut config, Some(0), Some(12), None).unwrap_err();

        assert!(err.to_string().contains("between 4 and 10"));
        assert_eq!(config.otp_length, 6);
        assert_eq!(config.simulated_delay, Config::default().simulated_delay);
    }
}
