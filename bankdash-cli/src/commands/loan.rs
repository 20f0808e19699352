//! Loan commands - products, payment estimates and the application wizard

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use bankdash_core::domain::{LoanApplicationForm, LoanStep};
use bankdash_core::services::validation::schemas::EMPLOYMENT_STATUSES;
use bankdash_core::services::{LoanApplication, LoanService};
use bankdash_core::LogEvent;
use clap::Subcommand;
use colored::Colorize;
use dialoguer::{Confirm, Input, Select};
use rust_decimal::Decimal;

use super::{get_context, get_logger, log_event, report, submit_with_spinner};
use crate::output::{self, create_table, format_money};

#[derive(Subcommand)]
pub enum LoanCommands {
    /// List loan products
    Types {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Estimate the monthly payment for a loan
    Estimate {
        /// Loan type id, e.g. personal
        loan_type: String,
        /// Amount to borrow
        amount: String,
        /// Term in months
        term: u32,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Apply for a loan, step by step
    Apply {
        /// Read the whole application from a JSON file instead of prompting
        #[arg(long)]
        file: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: LoanCommands) -> Result<()> {
    match command {
        LoanCommands::Types { json } => run_types(json),
        LoanCommands::Estimate { loan_type, amount, term, json } => {
            run_estimate(&loan_type, &amount, term, json)
        }
        LoanCommands::Apply { file, json } => run_apply(file, json),
    }
}

fn run_types(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let types = ctx.loan_service.loan_types();

    if json {
        println!("{}", serde_json::to_string_pretty(types)?);
        return Ok(());
    }

    let mut table = create_table();
    table.set_header(vec!["Id", "Name", "APR", "Amounts", "Terms (months)"]);
    for loan in types {
        let terms: Vec<String> = loan.terms.iter().map(|t| t.to_string()).collect();
        table.add_row(vec![
            loan.id.clone(),
            loan.name.clone(),
            format!("{}%", loan.apr),
            format!(
                "{} - {}",
                format_money(loan.min_amount, "USD"),
                format_money(loan.max_amount, "USD")
            ),
            terms.join(", "),
        ]);
    }
    println!("{}", table);
    Ok(())
}

fn run_estimate(loan_type: &str, amount: &str, term: u32, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let estimate = ctx
        .loan_service
        .estimate(loan_type, amount, term)
        .map_err(|e| report(e, json))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&estimate)?);
        return Ok(());
    }

    println!("{}", "Loan estimate".bold());
    println!("  Principal: {}", format_money(estimate.principal, "USD"));
    println!("  APR: {}%", estimate.apr);
    println!("  Term: {} months", estimate.term_months);
    println!("  Monthly payment: {}", format_money(estimate.monthly_payment, "USD").bold());
    println!("  Total repaid: {}", format_money(estimate.total_payment, "USD"));
    println!("  Total interest: {}", format_money(estimate.total_interest, "USD"));
    Ok(())
}

fn run_apply(file: Option<PathBuf>, json: bool) -> Result<()> {
    let logger = get_logger();
    let ctx = get_context()?;
    let mut app = ctx.loan_service.start_application();

    match file {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            app.form = serde_json::from_str::<LoanApplicationForm>(&content)
                .context("Application file is not a valid loan application")?;
            // Walk the steps so errors are reported against the first bad step
            while app.step() != LoanStep::Review {
                app.advance().map_err(|e| report(e, json))?;
            }
        }
        None => {
            if !atty::is(atty::Stream::Stdin) {
                return Err(anyhow!("Interactive application needs a terminal; use --file"));
            }
            run_wizard(&mut app, &ctx.loan_service)?;
        }
    }

    log_event(&logger, LogEvent::new("loan_application_started").with_command("loan apply"));
    let receipt = match submit_with_spinner("Submitting application...", app.submit()) {
        Ok(r) => r,
        Err(e) => {
            log_event(
                &logger,
                LogEvent::new("loan_application_failed")
                    .with_command("loan apply")
                    .with_error(e.to_string()),
            );
            return Err(report(e, json));
        }
    };
    log_event(&logger, LogEvent::new("loan_application_completed").with_command("loan apply"));

    if json {
        println!("{}", serde_json::to_string_pretty(&receipt)?);
    } else {
        output::receipt(&receipt);
        output::info("A loan officer will contact you within 2 business days.");
    }
    Ok(())
}

fn ask(prompt: &str, current: &str) -> Result<String> {
    let value = Input::<String>::new()
        .with_prompt(prompt)
        .with_initial_text(current)
        .allow_empty(true)
        .interact_text()?;
    Ok(value)
}

/// Prompt step by step; a failing step is shown and asked again
fn run_wizard(app: &mut LoanApplication, loans: &LoanService) -> Result<()> {
    loop {
        let step = app.step();
        let (n, total) = app.progress();
        println!();
        println!("{}", format!("Step {} of {}: {}", n, total, step.title()).bold());

        match step {
            LoanStep::Personal => prompt_personal(&mut app.form)?,
            LoanStep::Employment => prompt_employment(&mut app.form)?,
            LoanStep::LoanDetails => prompt_loan_details(&mut app.form, loans)?,
            LoanStep::Review => {
                print_review(&app.form, loans);
                app.form.agree_to_terms = Confirm::new()
                    .with_prompt("I agree to the terms and conditions")
                    .default(false)
                    .interact()?;
            }
        }

        match app.advance() {
            Ok(_) if step == LoanStep::Review => return Ok(()),
            Ok(_) => {}
            Err(e) => match e.validation_errors() {
                Some(errors) => output::validation(errors),
                None => return Err(e.into()),
            },
        }
    }
}

fn prompt_personal(form: &mut LoanApplicationForm) -> Result<()> {
    form.full_name = ask("Full name", &form.full_name)?;
    form.email = ask("Email", &form.email)?;
    form.phone = ask("Phone", &form.phone)?;
    form.date_of_birth = ask("Date of birth (YYYY-MM-DD)", &form.date_of_birth)?;
    form.address = ask("Address", &form.address)?;
    Ok(())
}

fn prompt_employment(form: &mut LoanApplicationForm) -> Result<()> {
    let current = EMPLOYMENT_STATUSES
        .iter()
        .position(|s| *s == form.employment_status)
        .unwrap_or(0);
    let index = Select::new()
        .with_prompt("Employment status")
        .items(&EMPLOYMENT_STATUSES)
        .default(current)
        .interact()?;
    form.employment_status = EMPLOYMENT_STATUSES[index].to_string();

    if matches!(form.employment_status.as_str(), "employed" | "self-employed") {
        let employer = ask("Employer name", form.employer_name.as_deref().unwrap_or_default())?;
        form.employer_name = Some(employer);
    } else {
        form.employer_name = None;
    }
    form.annual_income = ask("Annual income", &form.annual_income)?;
    Ok(())
}

fn prompt_loan_details(form: &mut LoanApplicationForm, loans: &LoanService) -> Result<()> {
    let types = loans.loan_types();
    let names: Vec<String> = types
        .iter()
        .map(|t| format!("{} ({}% APR)", t.name, t.apr))
        .collect();
    let current = types.iter().position(|t| t.id == form.loan_type).unwrap_or(0);
    let index = Select::new()
        .with_prompt("Loan type")
        .items(&names)
        .default(current)
        .interact()?;
    let loan = &types[index];
    form.loan_type = loan.id.clone();

    form.loan_amount = ask(
        &format!("Amount ({} - {})", loan.min_amount, loan.max_amount),
        &form.loan_amount,
    )?;

    let terms: Vec<String> = loan.terms.iter().map(|t| format!("{} months", t)).collect();
    let current_term = loan
        .terms
        .iter()
        .position(|t| t.to_string() == form.loan_term.trim())
        .unwrap_or(0);
    let term_index = Select::new()
        .with_prompt("Term")
        .items(&terms)
        .default(current_term)
        .interact()?;
    form.loan_term = loan.terms[term_index].to_string();

    form.purpose = ask("Purpose of the loan", &form.purpose)?;
    form.existing_customer = Confirm::new()
        .with_prompt("Are you an existing customer?")
        .default(form.existing_customer)
        .interact()?;
    form.account_number = if form.existing_customer {
        Some(ask("Account number", form.account_number.as_deref().unwrap_or_default())?)
    } else {
        None
    };
    Ok(())
}

fn print_review(form: &LoanApplicationForm, loans: &LoanService) {
    let mut table = create_table();
    table.add_row(vec!["Name", &form.full_name]);
    table.add_row(vec!["Email", &form.email]);
    table.add_row(vec!["Employment", &form.employment_status]);
    table.add_row(vec!["Annual income", &form.annual_income]);
    table.add_row(vec!["Loan type", &form.loan_type]);
    table.add_row(vec!["Amount", &form.loan_amount]);
    table.add_row(vec!["Term (months)", &form.loan_term]);
    println!("{}", table);

    let term = form.loan_term.trim().parse::<u32>().unwrap_or(0);
    if let Ok(estimate) = loans.estimate(&form.loan_type, &form.loan_amount, term) {
        println!(
            "Estimated monthly payment: {}",
            format_money(estimate.monthly_payment, "USD").bold()
        );
    } else if form.loan_amount.trim().parse::<Decimal>().is_err() {
        output::warning("Loan amount is not a number");
    }
}
