// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::CategoryLookup;
use crate::models::{Category, Goal, GoalKind, Transaction, TxKind};
use crate::session::SessionContext;
use crate::store;
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, ctx: &SessionContext) -> Result<()> {
    let user_id = ctx.user_id()?;
    let transactions = store::list_transactions(conn, user_id)?;
    let categories = store::list_categories(conn, user_id)?;
    let goals = store::list_goals(conn, user_id)?;
    let rows = find_issues(&transactions, &categories, &goals);

    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

pub fn find_issues(
    transactions: &[Transaction],
    categories: &[Category],
    goals: &[Goal],
) -> Vec<Vec<String>> {
    let lookup = CategoryLookup::new(categories);
    let mut rows = Vec::new();

    // 1) Transactions pointing at deleted categories
    for t in transactions {
        if lookup.is_dangling(t.category_id) {
            rows.push(vec![
                "txn_missing_category".into(),
                format!("tx {} -> category {}", t.id, t.category_id.unwrap_or_default()),
            ]);
        } else if let Some(c) = lookup.get(t.category_id) {
            // 2) Expense filed under an income source or the reverse
            if c.kind != t.kind {
                rows.push(vec![
                    "txn_category_type_mismatch".into(),
                    format!("tx {} is {} but '{}' is {}", t.id, t.kind, c.name, c.kind),
                ]);
            }
        }
    }

    // 3) Goals with dangling categories or unusable targets
    for g in goals {
        if g.goal_type == GoalKind::Spending {
            if lookup.is_dangling(g.category_id) {
                rows.push(vec![
                    "goal_missing_category".into(),
                    format!("goal {} -> category {}", g.id, g.category_id.unwrap_or_default()),
                ]);
            } else if lookup.get(g.category_id).is_some_and(|c| c.kind != TxKind::Expense) {
                rows.push(vec![
                    "goal_category_not_expense".into(),
                    format!("goal {}", g.id),
                ]);
            }
        }
        if g.target_amount <= Decimal::ZERO {
            rows.push(vec![
                "goal_nonpositive_target".into(),
                format!("goal {} target {}", g.id, g.target_amount),
            ]);
        }
    }
    rows
}
