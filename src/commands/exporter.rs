// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::CategoryLookup;
use crate::session::SessionContext;
use crate::store;
use anyhow::{bail, Result};
use rusqlite::Connection;
use serde_json::json;
use tracing::info;

pub fn handle(conn: &Connection, ctx: &SessionContext, m: &clap::ArgMatches) -> Result<()> {
    let user_id = ctx.user_id()?;
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, user_id, sub),
        _ => Ok(()),
    }
}

pub fn export_transactions(conn: &Connection, user_id: i64, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let mut transactions = store::list_transactions(conn, user_id)?;
    // oldest first in exports
    transactions.reverse();
    let categories = store::list_categories(conn, user_id)?;
    let lookup = CategoryLookup::new(&categories);

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(["date", "type", "amount", "category", "description"])?;
            for t in &transactions {
                wtr.write_record([
                    t.date.map(|d| d.to_string()).unwrap_or_default(),
                    t.kind.to_string(),
                    t.amount.to_string(),
                    lookup.name_for(t.category_id).to_string(),
                    t.description.clone(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<_> = transactions
                .iter()
                .map(|t| {
                    json!({
                        "date": t.date, "type": t.kind, "amount": t.amount.to_string(),
                        "category": lookup.name_for(t.category_id), "description": t.description
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    info!(count = transactions.len(), out = %out, "exported transactions");
    println!("Exported {} transactions to {}", transactions.len(), out);
    Ok(())
}
