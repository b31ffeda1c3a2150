// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::{category_spending, summarize_at, Summary};
use crate::session::SessionContext;
use crate::store;
use crate::utils::{fmt_money, get_currency_symbol, maybe_print_json, pretty_table};
use anyhow::Result;
use chrono::Utc;
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &Connection, ctx: &SessionContext, m: &clap::ArgMatches) -> Result<()> {
    let user_id = ctx.user_id()?;
    match m.subcommand() {
        Some(("summary", sub)) => summary(conn, user_id, sub)?,
        Some(("categories", sub)) => categories(conn, user_id, sub)?,
        _ => {}
    }
    Ok(())
}

pub fn build_summary(conn: &Connection, user_id: i64, days: u32) -> Result<Summary> {
    let transactions = store::list_transactions(conn, user_id)?;
    let categories = store::list_categories(conn, user_id)?;
    Ok(summarize_at(&transactions, &categories, days, Utc::now()))
}

fn summary(conn: &Connection, user_id: i64, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let days = *sub.get_one::<u32>("days").unwrap_or(&30);
    let s = build_summary(conn, user_id, days)?;
    if maybe_print_json(json_flag, jsonl_flag, &s)? {
        return Ok(());
    }
    let sym = get_currency_symbol(conn)?;
    let top = match &s.top_category {
        Some((name, amt)) => format!("{} ({})", name, fmt_money(amt, &sym)),
        None => "-".to_string(),
    };
    let outlook = if s.balance >= rust_decimal::Decimal::ZERO {
        format!("Saving {}", fmt_money(&s.balance, &sym))
    } else {
        format!("Over budget by {}", fmt_money(&s.balance.abs(), &sym))
    };
    let data = vec![
        vec!["Balance".into(), fmt_money(&s.balance, &sym)],
        vec!["Total income".into(), fmt_money(&s.total_income, &sym)],
        vec!["Total expenses".into(), fmt_money(&s.total_expenses, &sym)],
        vec!["Last 7 days".into(), fmt_money(&s.weekly_spending, &sym)],
        vec!["Last 30 days".into(), fmt_money(&s.monthly_spending, &sym)],
        vec![
            format!("Daily average (/{} days)", s.average_days),
            fmt_money(&s.daily_average, &sym),
        ],
        vec!["Projected monthly".into(), fmt_money(&s.projected_monthly, &sym)],
        vec!["Top category".into(), top],
        vec!["Outlook".into(), outlook],
    ];
    println!("{}", pretty_table(&["Metric", "Value"], data));
    Ok(())
}

#[derive(Serialize)]
pub struct CategoryRow {
    pub category: String,
    pub spent: String,
    pub share: String,
}

/// Spend per expense category with its share of the categorized total.
pub fn category_rows(conn: &Connection, user_id: i64) -> Result<Vec<CategoryRow>> {
    let transactions = store::list_transactions(conn, user_id)?;
    let categories = store::list_categories(conn, user_id)?;
    let spending = category_spending(&transactions, &categories);
    let rows = spending
        .iter()
        .zip(spending.percentages())
        .map(|((name, amt), (_, pct))| CategoryRow {
            category: name.to_string(),
            spent: format!("{:.2}", amt),
            share: format!("{:.1}", pct),
        })
        .collect();
    Ok(rows)
}

fn categories(conn: &Connection, user_id: i64, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = category_rows(conn, user_id)?;
    if maybe_print_json(json_flag, jsonl_flag, &data)? {
        return Ok(());
    }
    if data.is_empty() {
        println!("No expense data yet. Add expenses to see analytics.");
        return Ok(());
    }
    let sym = get_currency_symbol(conn)?;
    let rows = data
        .into_iter()
        .map(|r| {
            vec![
                r.category,
                format!("{}{}", sym, r.spent),
                format!("{}%", r.share),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Category", "Spent", "Share"], rows));
    Ok(())
}
