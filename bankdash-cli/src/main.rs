//! Bankdash CLI - a mock banking and crypto dashboard in your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{accounts, auth, convert, countries, loan, logs, state, swap, transfer, wallet};

/// Bankdash - mock banking dashboard in your terminal
#[derive(Parser)]
#[command(name = "bd", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List bank accounts and saved beneficiaries
    Accounts {
        /// Also list saved beneficiaries
        #[arg(long)]
        beneficiaries: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Crypto wallet holdings and backups
    Wallet {
        #[command(subcommand)]
        command: wallet::WalletCommands,
    },

    /// Convert an amount with one of the dashboard rate tables
    Convert {
        /// Amount to convert
        amount: String,
        /// Source currency or asset
        from: String,
        /// Target currency or asset
        to: String,
        /// Rate table: swap, transfer or international
        #[arg(long, default_value = "transfer")]
        table: String,
        /// Also convert the result back and show the difference
        #[arg(long)]
        round_trip: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List supported destination countries
    Countries {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show which bank identifiers a country requires
    Requirements {
        /// ISO country code, e.g. DE
        country: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Sign in to the dashboard
    Login {
        /// Account email
        #[arg(long)]
        email: Option<String>,
        /// Password (prompted when omitted)
        #[arg(long, env = "BANKDASH_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Sign out
    Logout {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Verify or change the transaction PIN
    Pin {
        #[command(subcommand)]
        command: auth::PinCommands,
    },

    /// Run a one-time passcode challenge
    Otp {
        /// Output as JSON; the issued code is printed first and attempts are read from stdin
        #[arg(long)]
        json: bool,
    },

    /// Check a two-factor authentication code
    TwoFactor {
        /// Code to check (prompted when omitted)
        code: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Transfer between your own accounts
    Transfer {
        #[command(flatten)]
        args: transfer::TransferArgs,
    },

    /// Send money abroad
    International {
        #[command(flatten)]
        args: transfer::InternationalArgs,
    },

    /// Swap one crypto asset for another
    Swap {
        /// Asset to sell
        from: String,
        /// Asset to buy
        to: String,
        /// Amount of the asset to sell
        amount: String,
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
    },

    /// Loan products, estimates and applications
    Loan {
        #[command(subcommand)]
        command: loan::LoanCommands,
    },

    /// Inspect or change persisted dashboard state
    State {
        #[command(subcommand)]
        command: state::StateCommands,
    },

    /// View and manage application logs
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = run(cli);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Accounts { beneficiaries, json } => accounts::run(beneficiaries, json),
        Commands::Wallet { command } => wallet::run(command),
        Commands::Convert { amount, from, to, table, round_trip, json } => {
            convert::run(&amount, &from, &to, &table, round_trip, json)
        }
        Commands::Countries { json } => countries::run_list(json),
        Commands::Requirements { country, json } => countries::run_requirements(&country, json),
        Commands::Login { email, password, json } => auth::run_login(email, password, json),
        Commands::Logout { json } => auth::run_logout(json),
        Commands::Pin { command } => auth::run_pin(command),
        Commands::Otp { json } => auth::run_otp(json),
        Commands::TwoFactor { code, json } => auth::run_two_factor(code, json),
        Commands::Transfer { args } => transfer::run_domestic(args),
        Commands::International { args } => transfer::run_international(args),
        Commands::Swap { from, to, amount, pin, dry_run, yes, json } => {
            swap::run(&from, &to, &amount, pin, dry_run, yes, json)
        }
        Commands::Loan { command } => loan::run(command),
        Commands::State { command } => state::run(command),
        Commands::Logs { command } => logs::run(command),
    }
}
