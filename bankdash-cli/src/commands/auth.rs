//! Auth commands - login, logout, PIN, one-time codes and two-factor

use std::io::{self, BufRead};

use anyhow::{anyhow, Result};
use bankdash_core::domain::{ChangePinForm, LoginForm};
use bankdash_core::services::OtpChallenge;
use bankdash_core::LogEvent;
use clap::Subcommand;
use dialoguer::{Input, Password};

use super::{get_context, get_logger, log_event, pin_or_prompt, report};
use crate::output;

/// Interactive OTP attempts before giving up
const OTP_PROMPT_ATTEMPTS: u32 = 3;

#[derive(Subcommand)]
pub enum PinCommands {
    /// Check a PIN against the stored one
    Verify {
        /// PIN to check (prompted when omitted)
        #[arg(long)]
        pin: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change the transaction PIN
    Change {
        /// Current PIN (prompted when omitted)
        #[arg(long)]
        current: Option<String>,
        /// New PIN (prompted with confirmation when omitted)
        #[arg(long)]
        new: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run_login(email: Option<String>, password: Option<String>, json: bool) -> Result<()> {
    let email = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Email").interact_text()?,
    };
    let password = match password {
        Some(p) => p,
        None => Password::new().with_prompt("Password").interact()?,
    };

    let logger = get_logger();
    let ctx = get_context()?;
    let form = LoginForm { email, password };

    let state = match ctx.auth_service.login(&form) {
        Ok(state) => state,
        Err(e) => {
            log_event(
                &logger,
                LogEvent::new("login_failed").with_command("login").with_error(e.to_string()),
            );
            return Err(report(e, json));
        }
    };
    log_event(&logger, LogEvent::new("login_completed").with_command("login"));

    if json {
        println!("{}", serde_json::json!({ "success": true, "email": state.user_email }));
    } else {
        output::success(&format!(
            "Signed in as {}",
            state.user_email.as_deref().unwrap_or_default()
        ));
    }
    Ok(())
}

pub fn run_logout(json: bool) -> Result<()> {
    let ctx = get_context()?;
    ctx.auth_service.logout()?;
    log_event(&get_logger(), LogEvent::new("logout_completed").with_command("logout"));

    if json {
        println!("{}", serde_json::json!({ "success": true }));
    } else {
        output::success("Signed out");
    }
    Ok(())
}

pub fn run_pin(command: PinCommands) -> Result<()> {
    match command {
        PinCommands::Verify { pin, json } => run_pin_verify(pin, json),
        PinCommands::Change { current, new, json } => run_pin_change(current, new, json),
    }
}

fn run_pin_verify(pin: Option<String>, json: bool) -> Result<()> {
    let pin = pin_or_prompt(pin)?;
    let ctx = get_context()?;

    match ctx.auth_service.verify_pin(&pin) {
        Ok(()) => {
            if json {
                println!("{}", serde_json::json!({ "valid": true }));
            } else {
                output::success("PIN verified");
            }
            Ok(())
        }
        Err(e) => {
            log_event(
                &get_logger(),
                LogEvent::new("pin_verify_failed").with_command("pin verify").with_error(e.to_string()),
            );
            Err(report(e, json))
        }
    }
}

fn run_pin_change(current: Option<String>, new: Option<String>, json: bool) -> Result<()> {
    let current_pin = match current {
        Some(p) => p,
        None => Password::new().with_prompt("Current PIN").interact()?,
    };
    let (new_pin, confirm_pin) = match new {
        Some(p) => (p.clone(), p),
        None => {
            let p1 = Password::new().with_prompt("New PIN").interact()?;
            let p2 = Password::new().with_prompt("Confirm new PIN").interact()?;
            (p1, p2)
        }
    };

    let logger = get_logger();
    log_event(&logger, LogEvent::new("pin_change_started").with_command("pin change"));

    let ctx = get_context()?;
    let form = ChangePinForm {
        current_pin,
        new_pin,
        confirm_pin,
    };

    if let Err(e) = ctx.auth_service.change_pin(&form) {
        log_event(
            &logger,
            LogEvent::new("pin_change_failed").with_command("pin change").with_error(e.to_string()),
        );
        return Err(report(e, json));
    }
    log_event(&logger, LogEvent::new("pin_change_completed").with_command("pin change"));

    if json {
        println!("{}", serde_json::json!({ "success": true }));
    } else {
        output::success("PIN changed");
    }
    Ok(())
}

pub fn run_otp(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let mut challenge = ctx.auth_service.start_otp();

    // Nothing is actually sent, so the code is shown before it is asked for
    if json {
        println!(
            "{}",
            serde_json::json!({ "code": challenge.code(), "digits": challenge.digits() })
        );
    } else {
        output::info(&format!("Demo one-time code: {}", challenge.code()));
    }

    let digits = challenge.digits();
    let stdin = io::stdin();
    let next_input = || -> Result<Option<String>> {
        if json {
            let mut line = String::new();
            if stdin.lock().read_line(&mut line)? == 0 {
                return Ok(None);
            }
            Ok(Some(line))
        } else {
            Ok(Some(
                Input::<String>::new()
                    .with_prompt(format!("Enter the {}-digit code", digits))
                    .interact_text()?,
            ))
        }
    };
    let verified = verify_otp(&mut challenge, OTP_PROMPT_ATTEMPTS, next_input, |message| {
        if !json {
            output::warning(message);
        }
    })?;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "state": challenge.state(),
                "attempts": challenge.attempts(),
                "error": challenge.error(),
            })
        );
    }

    if verified {
        if !json {
            output::success("Code verified");
        }
        Ok(())
    } else {
        log_event(
            &get_logger(),
            LogEvent::new("otp_failed")
                .with_command("otp")
                .with_error(challenge.error().unwrap_or_default()),
        );
        Err(anyhow!("Verification failed"))
    }
}

/// Feed inputs to `challenge` until it verifies, `attempts` run out or the
/// input ends. Returns whether the code was verified.
fn verify_otp(
    challenge: &mut OtpChallenge,
    attempts: u32,
    mut next_input: impl FnMut() -> Result<Option<String>>,
    mut on_mismatch: impl FnMut(&str),
) -> Result<bool> {
    for _ in 0..attempts {
        let Some(input) = next_input()? else {
            break;
        };
        if challenge.submit(&input).is_ok() {
            return Ok(true);
        }
        on_mismatch(challenge.error().unwrap_or("Invalid verification code"));
    }
    Ok(challenge.is_verified())
}

pub fn run_two_factor(code: Option<String>, json: bool) -> Result<()> {
    let code = match code {
        Some(c) => c,
        None => Input::<String>::new()
            .with_prompt("Authentication code")
            .interact_text()?,
    };

    let ctx = get_context()?;
    match ctx.auth_service.verify_two_factor(&code) {
        Ok(()) => {
            if json {
                println!("{}", serde_json::json!({ "valid": true }));
            } else {
                output::success("Two-factor code accepted");
            }
            Ok(())
        }
        Err(e) => {
            log_event(
                &get_logger(),
                LogEvent::new("two_factor_failed").with_command("two-factor").with_error(e.to_string()),
            );
            Err(report(e, json))
        }
    }
}
