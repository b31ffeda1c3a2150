// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::TxKind;
use crate::session::SessionContext;
use crate::store;
use crate::utils::pretty_table;
use crate::validation::validate_category_form;
use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn handle(conn: &Connection, ctx: &SessionContext, m: &clap::ArgMatches) -> Result<()> {
    let user_id = ctx.user_id()?;
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").map(String::as_str);
            let kind: TxKind = sub.get_one::<String>("type").unwrap().parse()?;
            validate_category_form(name).into_result()?;
            let name = name.unwrap_or_default().trim();
            let id = store::insert_category(conn, user_id, name, kind)?;
            info!(id, "category added");
            println!("Added {} '{}'", kind.category_label().to_lowercase(), name);
        }
        Some(("list", sub)) => {
            let filter = sub
                .get_one::<String>("type")
                .map(|s| s.parse::<TxKind>())
                .transpose()?;
            let data: Vec<Vec<String>> = store::list_categories(conn, user_id)?
                .into_iter()
                .filter(|c| filter.is_none_or(|k| c.kind == k))
                .map(|c| vec![c.id.to_string(), c.name, c.kind.to_string()])
                .collect();
            println!("{}", pretty_table(&["Id", "Name", "Type"], data));
        }
        Some(("rename", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let name = sub.get_one::<String>("name").map(String::as_str);
            validate_category_form(name).into_result()?;
            store::rename_category(conn, user_id, id, name.unwrap_or_default())?;
            println!("Renamed category {}", id);
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            store::delete_category(conn, user_id, id)?;
            println!("Removed category {}", id);
        }
        _ => {}
    }
    Ok(())
}
