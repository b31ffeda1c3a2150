// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{GoalKind, TxKind};
use crate::progress::{evaluate_goal, GoalStatus};
use crate::session::SessionContext;
use crate::store::{self, GoalPatch, NewGoal};
use crate::utils::{fmt_money, fmt_percent, get_currency_symbol, maybe_print_json, parse_decimal, pretty_table};
use crate::validation::{validate_goal_form, GoalForm};
use anyhow::{bail, Result};
use rusqlite::Connection;
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
            store::delete_goal(conn, user_id, id)?;
            println!("Removed goal {}", id);
        }
        _ => {}
    }
    Ok(())
}

/// Spending goals must name an expense category; saving goals must not.
fn spending_category(
    conn: &Connection,
    user_id: i64,
    goal_type: GoalKind,
    category: Option<&String>,
) -> Result<Option<i64>> {
    match (goal_type, category) {
        (GoalKind::Spending, Some(name)) => Ok(Some(store::category_id_by_name(
            conn,
            user_id,
            name,
            TxKind::Expense,
        )?)),
        (GoalKind::Spending, None) => bail!("Spending goals need --category"),
        (GoalKind::Saving, Some(_)) => bail!("--category only applies to spending goals"),
        (GoalKind::Saving, None) => Ok(None),
    }
}

pub fn add(conn: &Connection, user_id: i64, sub: &clap::ArgMatches) -> Result<i64> {
    let form = GoalForm {
        name: sub.get_one::<String>("name").cloned(),
        amount: sub.get_one::<String>("amount").cloned(),
    };
    validate_goal_form(&form).into_result()?;
    let goal_type: GoalKind = sub.get_one::<String>("type").unwrap().parse()?;
    let category_id = spending_category(conn, user_id, goal_type, sub.get_one::<String>("category"))?;
    let name = form.name.unwrap_or_default();
    let target_amount = parse_decimal(form.amount.as_deref().unwrap_or_default())?;
    let id = store::insert_goal(
        conn,
        user_id,
        &NewGoal {
            name: name.clone(),
            goal_type,
            period: sub.get_one::<String>("period").map(|p| p.trim().to_string()),
            target_amount,
            category_id,
        },
    )?;
    info!(id, %goal_type, "goal created");
    println!(
        "Created {} goal '{}' targeting {}",
        goal_type,
        name.trim(),
        fmt_money(&target_amount, &get_currency_symbol(conn)?)
    );
    Ok(id)
}

fn edit(conn: &Connection, user_id: i64, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let goals = store::list_goals(conn, user_id)?;
    let Some(existing) = goals.iter().find(|g| g.id == id) else {
        return Err(store::StoreError::NotFound { entity: "Goal", id }.into());
    };
    let form = GoalForm {
        name: sub
            .get_one::<String>("name")
            .cloned()
            .or_else(|| Some(existing.name.clone())),
        amount: sub
            .get_one::<String>("amount")
            .cloned()
            .or_else(|| Some(existing.target_amount.to_string())),
    };
    validate_goal_form(&form).into_result()?;
    let goal_type = sub
        .get_one::<String>("type")
        .map(|t| t.parse::<GoalKind>())
        .transpose()?;
    let resulting_type = goal_type.unwrap_or(existing.goal_type);
    let category = sub.get_one::<String>("category");
    let keeps_category = resulting_type == GoalKind::Spending
        && existing.goal_type == GoalKind::Spending
        && existing.category_id.is_some();
    let category_id = if category.is_none() && keeps_category {
        None
    } else {
        let resolved = spending_category(conn, user_id, resulting_type, category)?;
        (resolved != existing.category_id).then_some(resolved)
    };
    let patch = GoalPatch {
        name: sub.get_one::<String>("name").cloned(),
        goal_type,
        target_amount: sub
            .get_one::<String>("amount")
            .map(|a| parse_decimal(a))
            .transpose()?,
        category_id,
    };
    store::update_goal(conn, user_id, id, &patch)?;
    println!("Updated goal {}", id);
    Ok(())
}

/// Current progress of every goal for the user, re-fetched from the store.
pub fn statuses(conn: &Connection, user_id: i64) -> Result<Vec<GoalStatus>> {
    let transactions = store::list_transactions(conn, user_id)?;
    Ok(store::list_goals(conn, user_id)?
        .iter()
        .map(|g| evaluate_goal(g, &transactions))
        .collect())
}

fn list(conn: &Connection, user_id: i64, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = statuses(conn, user_id)?;
    if maybe_print_json(json_flag, jsonl_flag, &data)? {
        return Ok(());
    }
    if data.is_empty() {
        println!("No goals yet. Add one with `budgetbuddy goal add`.");
        return Ok(());
    }
    let symbol = get_currency_symbol(conn)?;
    let rows: Vec<Vec<String>> = data
        .iter()
        .map(|s| {
            vec![
                s.goal_id.to_string(),
                s.name.clone(),
                s.goal_type.to_string(),
                format!(
                    "{} of {}",
                    fmt_money(&s.current, &symbol),
                    fmt_money(&s.target, &symbol)
                ),
                if s.is_complete() {
                    format!("{} ✓", fmt_percent(&s.progress))
                } else {
                    fmt_percent(&s.progress)
                },
                fmt_money(&s.remaining, &symbol),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Id", "Goal", "Type", "Current", "Progress", "Remaining"],
            rows
        )
    );
    Ok(())
}
