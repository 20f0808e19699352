//! Wallet commands - holdings and backup export

use std::path::PathBuf;

use anyhow::Result;
use bankdash_core::services::WalletService;
use bankdash_core::LogEvent;
use clap::Subcommand;
use colored::Colorize;

use super::{get_context, get_logger, log_event};
use crate::output::{self, create_table, format_money, format_size};

#[derive(Subcommand)]
pub enum WalletCommands {
    /// List crypto holdings
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Export a wallet backup file
    Backup {
        /// Destination file (defaults to the backups directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List exported backups
    Backups {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check a backup file's checksum
    Verify {
        /// Backup file to check
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: WalletCommands) -> Result<()> {
    match command {
        WalletCommands::List { json } => run_list(json),
        WalletCommands::Backup { output, json } => run_backup(output, json),
        WalletCommands::Backups { json } => run_backups(json),
        WalletCommands::Verify { file, json } => run_verify(file, json),
    }
}

fn run_list(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let wallet = &ctx.wallet_service;

    if json {
        let value = serde_json::json!({
            "assets": wallet.assets(),
            "total_usd": wallet.total_usd(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let mut table = create_table();
    table.set_header(vec!["Asset", "Symbol", "Balance", "Value", "Address"]);
    for asset in wallet.assets() {
        table.add_row(vec![
            asset.name.clone(),
            asset.symbol.clone(),
            asset.balance.to_string(),
            format_money(asset.usd_value, "USD"),
            asset.short_address(),
        ]);
    }
    println!("{}", table);
    println!("Total: {}", format_money(wallet.total_usd(), "USD").bold());
    Ok(())
}

fn run_backup(output_path: Option<PathBuf>, json: bool) -> Result<()> {
    let logger = get_logger();
    log_event(&logger, LogEvent::new("wallet_backup_started").with_command("wallet backup"));

    let ctx = get_context()?;
    let result = match &output_path {
        Some(path) => ctx
            .wallet_service
            .export_backup_to(path)
            .map(|_| path.clone()),
        None => ctx.wallet_service.export_backup().map(|file| file.path),
    };

    let path = match result {
        Ok(path) => path,
        Err(e) => {
            log_event(
                &logger,
                LogEvent::new("wallet_backup_failed")
                    .with_command("wallet backup")
                    .with_error(e.to_string()),
            );
            return Err(e);
        }
    };
    log_event(&logger, LogEvent::new("wallet_backup_completed").with_command("wallet backup"));

    if json {
        println!("{}", serde_json::json!({ "path": path.to_string_lossy() }));
    } else {
        output::success(&format!("Wallet backup written to {}", path.display()));
        output::warning("Backups contain placeholder keys only; they cannot restore a real wallet.");
    }
    Ok(())
}

fn run_backups(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let backups = ctx.wallet_service.list_backups()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&backups)?);
        return Ok(());
    }

    if backups.is_empty() {
        println!("No backups found.");
        return Ok(());
    }

    let mut table = create_table();
    table.set_header(vec!["Name", "Size"]);
    for backup in &backups {
        table.add_row(vec![backup.name.clone(), format_size(backup.size_bytes)]);
    }
    println!("{}", table);
    Ok(())
}

fn run_verify(file: PathBuf, json: bool) -> Result<()> {
    let backup = WalletService::read_backup(&file)?;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "valid": true,
                "created_at": backup.created_at,
                "assets": backup.assets.len(),
            })
        );
    } else {
        output::success(&format!(
            "Backup is intact ({} assets, created {})",
            backup.assets.len(),
            backup.created_at.format("%Y-%m-%d %H:%M")
        ));
    }
    Ok(())
}
