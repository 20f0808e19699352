//! Country commands - destination countries and their bank identifiers

use anyhow::Result;
use bankdash_core::domain::FieldKind;
use colored::Colorize;

use super::get_context;
use crate::output::{self, create_table};

fn labels(kinds: &[FieldKind]) -> String {
    kinds.iter().map(|k| k.label()).collect::<Vec<_>>().join(", ")
}

pub fn run_list(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let countries = ctx.resolver.countries();

    if json {
        println!("{}", serde_json::to_string_pretty(countries)?);
        return Ok(());
    }

    let mut table = create_table();
    table.set_header(vec!["Code", "Country", "Currency", "Required", "Banks"]);
    for country in countries {
        table.add_row(vec![
            country.code.clone(),
            country.name.clone(),
            country.currency.clone(),
            labels(&country.requirements),
            country.banks.len().to_string(),
        ]);
    }
    println!("{}", table);
    Ok(())
}

pub fn run_requirements(code: &str, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let resolver = &ctx.resolver;
    let visible = resolver.resolve(code);
    let hidden = resolver.hidden(code);
    let country = resolver.find(code);

    if json {
        let fields: Vec<_> = visible
            .iter()
            .map(|k| serde_json::json!({ "field": k.field_name(), "label": k.label() }))
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "country": code.trim().to_uppercase(),
                "known": country.is_some(),
                "required": fields,
                "hidden": hidden.iter().map(|k| k.field_name()).collect::<Vec<_>>(),
            }))?
        );
        return Ok(());
    }

    let Some(country) = country else {
        output::warning(&format!(
            "No requirements known for '{}'; no identifier fields are shown.",
            code.trim()
        ));
        return Ok(());
    };

    println!("{} ({}, {})", country.name.bold(), country.code, country.currency);
    let mut table = create_table();
    table.set_header(vec!["Field", "Label"]);
    for kind in &visible {
        table.add_row(vec![kind.field_name(), kind.label()]);
    }
    println!("{}", table);

    if !country.banks.is_empty() {
        println!("Banks:");
        for bank in &country.banks {
            println!("  {} ({})", bank.name, bank.code);
        }
    }
    if !hidden.is_empty() {
        println!("{} {}", "Not shown:".dimmed(), labels(&hidden).dimmed());
    }
    Ok(())
}
