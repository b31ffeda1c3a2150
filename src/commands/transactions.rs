// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::CategoryLookup;
use crate::models::TxKind;
use crate::session::SessionContext;
use crate::store::{self, NewTransaction, TransactionPatch};
use crate::utils::{fmt_money, get_currency_symbol, maybe_print_json, parse_date, parse_decimal, pretty_table};
use crate::validation::{validate_transaction_form, TransactionForm};
use anyhow::Result;
use chrono::Utc;
use rusqlite::Connection;
use serde::Serialize;
use tracing::info;

pub fn handle(conn: &Connection, ctx: &SessionContext, m: &clap::ArgMatches) -> Result<()> {
    let user_id = ctx.user_id()?;
    match m.subcommand() {
        Some(("add", sub)) => {
            add(conn, user_id, sub)?;
        }
        Some(("list", sub)) => list(conn, user_id, sub)?,
        Some(("edit", sub)) => edit(conn, user_id, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            store::delete_transaction(conn, user_id, id)?;
            println!("Removed transaction {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn arg(sub: &clap::ArgMatches, name: &str) -> Option<String> {
    sub.get_one::<String>(name).cloned()
}

/// Validates the form and writes the transaction. Returns the new id.
pub fn add(conn: &Connection, user_id: i64, sub: &clap::ArgMatches) -> Result<i64> {
    let kind: TxKind = sub.get_one::<String>("type").unwrap().parse()?;
    let form = TransactionForm {
        amount: arg(sub, "amount"),
        category: arg(sub, "category"),
        source: arg(sub, "source"),
        description: arg(sub, "description"),
    };
    validate_transaction_form(&form, kind).into_result()?;

    let amount = parse_decimal(form.amount.as_deref().unwrap_or_default())?;
    let category_id = match form.category_ref() {
        Some(name) => Some(store::category_id_by_name(conn, user_id, name, kind)?),
        None => None,
    };
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => Utc::now().date_naive(),
    };
    let description = form.description.unwrap_or_default();
    let id = store::insert_transaction(
        conn,
        user_id,
        &NewTransaction {
            kind,
            amount,
            category_id,
            description: description.clone(),
            date,
        },
    )?;
    info!(id, %kind, "transaction recorded");
    let symbol = get_currency_symbol(conn)?;
    println!(
        "Recorded {} {} on {}: {}",
        kind,
        fmt_money(&amount, &symbol),
        date,
        description.trim()
    );
    Ok(id)
}

fn edit(conn: &Connection, user_id: i64, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let existing = store::find_transaction(conn, user_id, id)?;
    let category = arg(sub, "category");
    let form = TransactionForm {
        amount: arg(sub, "amount").or_else(|| Some(existing.amount.to_string())),
        category: category
            .clone()
            .or_else(|| existing.category_id.map(|c| c.to_string())),
        source: None,
        description: arg(sub, "description").or_else(|| Some(existing.description.clone())),
    };
    validate_transaction_form(&form, existing.kind).into_result()?;

    let patch = TransactionPatch {
        amount: arg(sub, "amount").map(|a| parse_decimal(&a)).transpose()?,
        category_id: category
            .map(|name| store::category_id_by_name(conn, user_id, &name, existing.kind))
            .transpose()?,
        description: arg(sub, "description"),
    };
    store::update_transaction(conn, user_id, id, &patch)?;
    println!("Updated transaction {}", id);
    Ok(())
}

fn list(conn: &Connection, user_id: i64, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, user_id, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let symbol = get_currency_symbol(conn)?;
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.kind.clone(),
                    fmt_money(&parse_decimal(&r.amount).unwrap_or_default(), &symbol),
                    r.category.clone(),
                    r.description.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Date", "Type", "Amount", "Category", "Description"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: String,
    pub category: String,
    pub description: String,
}

/// Newest first, with `--type`, `--category` and `--limit` applied.
pub fn query_rows(conn: &Connection, user_id: i64, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let kind = sub
        .get_one::<String>("type")
        .map(|s| s.parse::<TxKind>())
        .transpose()?;
    let category = sub.get_one::<String>("category").map(|s| s.trim());
    let limit = sub.get_one::<usize>("limit").copied().unwrap_or(usize::MAX);

    let transactions = store::list_transactions(conn, user_id)?;
    let categories = store::list_categories(conn, user_id)?;
    let lookup = CategoryLookup::new(&categories);

    let data = transactions
        .iter()
        .filter(|t| kind.is_none_or(|k| t.kind == k))
        .filter(|t| category.is_none_or(|c| lookup.name_for(t.category_id) == c))
        .take(limit)
        .map(|t| TransactionRow {
            id: t.id,
            date: t
                .date
                .map(|d| d.to_string())
                .unwrap_or_else(|| t.created_at.date_naive().to_string()),
            kind: t.kind.to_string(),
            amount: t.amount.to_string(),
            category: lookup.name_for(t.category_id).to_string(),
            description: t.description.clone(),
        })
        .collect();
    Ok(data)
}
