//! Accounts command - list bank accounts and beneficiaries

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use super::get_context;
use crate::output::{create_table, format_money};

#[derive(Serialize)]
struct AccountView {
    id: String,
    name: String,
    kind: &'static str,
    number: String,
    balance: String,
    currency: String,
}

#[derive(Serialize)]
struct BeneficiaryView {
    id: String,
    name: String,
    bank: String,
    number: String,
    country: String,
}

pub fn run(beneficiaries: bool, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let transfers = &ctx.transfer_service;

    // Full account numbers never leave the core; only masked ones are shown
    let accounts: Vec<AccountView> = transfers
        .accounts()
        .iter()
        .map(|a| AccountView {
            id: a.id.to_string(),
            name: a.name.clone(),
            kind: a.kind.as_str(),
            number: a.masked_number(),
            balance: a.balance.to_string(),
            currency: a.currency.clone(),
        })
        .collect();

    let saved: Vec<BeneficiaryView> = if beneficiaries {
        transfers
            .beneficiaries()
            .iter()
            .map(|b| BeneficiaryView {
                id: b.id.to_string(),
                name: b.name.clone(),
                bank: b.bank_name.clone(),
                number: b.masked_number(),
                country: b.country.clone(),
            })
            .collect()
    } else {
        Vec::new()
    };

    if json {
        let mut value = serde_json::json!({ "accounts": accounts });
        if beneficiaries {
            value["beneficiaries"] = serde_json::to_value(&saved)?;
        }
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{}", "Accounts".bold());
    let mut table = create_table();
    table.set_header(vec!["Name", "Type", "Number", "Balance"]);
    for account in transfers.accounts() {
        table.add_row(vec![
            account.name.clone(),
            account.kind.as_str().to_string(),
            account.masked_number(),
            format_money(account.balance, &account.currency),
        ]);
    }
    println!("{}", table);

    if beneficiaries {
        println!();
        println!("{}", "Beneficiaries".bold());
        let mut table = create_table();
        table.set_header(vec!["Name", "Bank", "Number", "Country"]);
        for b in &saved {
            table.add_row(vec![&b.name, &b.bank, &b.number, &b.country]);
        }
        println!("{}", table);
    }

    Ok(())
}
