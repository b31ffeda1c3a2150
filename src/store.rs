// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! User-scoped CRUD over categories, transactions and goals.
//!
//! Every statement filters on `user_id`; mutations additionally filter on
//! `id` and fail with [`StoreError::NotFound`] when no row matched. Callers
//! re-fetch lists after mutating instead of patching local copies.

use crate::models::{Category, Goal, GoalKind, Transaction, TxKind};
use crate::utils::{parse_date, parse_decimal, parse_timestamp};
use anyhow::{Context, Result};
use chrono::{NaiveDate, SecondsFormat, Utc};
use rusqlite::{params, Connection, Row};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },
}

fn expect_one(changed: usize, entity: &'static str, id: i64) -> Result<()> {
    if changed == 0 {
        return Err(StoreError::NotFound { entity, id }.into());
    }
    Ok(())
}

// Categories

pub fn list_categories(conn: &Connection, user_id: i64) -> Result<Vec<Category>> {
    let mut stmt =
        conn.prepare("SELECT id, user_id, name, type FROM categories WHERE user_id=?1 ORDER BY id")?;
    let mut rows = stmt.query(params![user_id])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let kind: String = r.get(3)?;
        out.push(Category {
            id: r.get(0)?,
            user_id: r.get(1)?,
            name: r.get(2)?,
            kind: kind.parse()?,
        });
    }
    debug!(user_id, count = out.len(), "fetched categories");
    Ok(out)
}

pub fn insert_category(conn: &Connection, user_id: i64, name: &str, kind: TxKind) -> Result<i64> {
    conn.execute(
        "INSERT INTO categories(user_id, name, type) VALUES (?1, ?2, ?3)",
        params![user_id, name.trim(), kind.as_str()],
    )?;
    let id = conn.last_insert_rowid();
    debug!(user_id, id, "inserted category");
    Ok(id)
}

pub fn rename_category(conn: &Connection, user_id: i64, id: i64, name: &str) -> Result<()> {
    let n = conn.execute(
        "UPDATE categories SET name=?1 WHERE id=?2 AND user_id=?3",
        params![name.trim(), id, user_id],
    )?;
    expect_one(n, "Category", id)
}

/// Removes the category only; transactions and goals keep their dangling id.
pub fn delete_category(conn: &Connection, user_id: i64, id: i64) -> Result<()> {
    let n = conn.execute(
        "DELETE FROM categories WHERE id=?1 AND user_id=?2",
        params![id, user_id],
    )?;
    expect_one(n, "Category", id)
}

/// Resolves a category name for `kind` among the user's categories.
pub fn category_id_by_name(conn: &Connection, user_id: i64, name: &str, kind: TxKind) -> Result<i64> {
    let mut stmt = conn.prepare(
        "SELECT id FROM categories WHERE user_id=?1 AND name=?2 AND type=?3 ORDER BY id LIMIT 1",
    )?;
    let id: i64 = stmt
        .query_row(params![user_id, name.trim(), kind.as_str()], |r| r.get(0))
        .with_context(|| format!("{} '{}' not found", kind.category_label(), name.trim()))?;
    Ok(id)
}

// Transactions

fn transaction_from_row(r: &Row<'_>) -> Result<Transaction> {
    let kind: String = r.get(2)?;
    let amount: String = r.get(3)?;
    let date: Option<String> = r.get(6)?;
    let created_at: String = r.get(7)?;
    Ok(Transaction {
        id: r.get(0)?,
        user_id: r.get(1)?,
        kind: kind.parse()?,
        amount: parse_decimal(&amount)
            .with_context(|| format!("Invalid amount '{}' in transactions", amount))?,
        category_id: r.get(4)?,
        description: r.get(5)?,
        date: date.as_deref().map(parse_date).transpose()?,
        created_at: parse_timestamp(&created_at)?,
    })
}

/// Newest first, by creation time.
pub fn list_transactions(conn: &Connection, user_id: i64) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, type, amount, category_id, description, date, created_at
         FROM transactions WHERE user_id=?1 ORDER BY created_at DESC, id DESC",
    )?;
    let mut rows = stmt.query(params![user_id])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        out.push(transaction_from_row(r)?);
    }
    debug!(user_id, count = out.len(), "fetched transactions");
    Ok(out)
}

#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub kind: TxKind,
    pub amount: Decimal,
    pub category_id: Option<i64>,
    pub description: String,
    pub date: NaiveDate,
}

pub fn insert_transaction(conn: &Connection, user_id: i64, tx: &NewTransaction) -> Result<i64> {
    conn.execute(
        "INSERT INTO transactions(user_id, type, amount, category_id, description, date, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            user_id,
            tx.kind.as_str(),
            tx.amount.to_string(),
            tx.category_id,
            tx.description.trim(),
            tx.date.to_string(),
            Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
        ],
    )?;
    let id = conn.last_insert_rowid();
    debug!(user_id, id, kind = %tx.kind, "inserted transaction");
    Ok(id)
}

/// Fields left `None` keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct TransactionPatch {
    pub amount: Option<Decimal>,
    pub category_id: Option<i64>,
    pub description: Option<String>,
}

pub fn update_transaction(
    conn: &Connection,
    user_id: i64,
    id: i64,
    patch: &TransactionPatch,
) -> Result<()> {
    let n = conn.execute(
        "UPDATE transactions SET
            amount=COALESCE(?1, amount),
            category_id=COALESCE(?2, category_id),
            description=COALESCE(?3, description)
         WHERE id=?4 AND user_id=?5",
        params![
            patch.amount.map(|a| a.to_string()),
            patch.category_id,
            patch.description.as_deref().map(str::trim),
            id,
            user_id
        ],
    )?;
    expect_one(n, "Transaction", id)
}

pub fn delete_transaction(conn: &Connection, user_id: i64, id: i64) -> Result<()> {
    let n = conn.execute(
        "DELETE FROM transactions WHERE id=?1 AND user_id=?2",
        params![id, user_id],
    )?;
    expect_one(n, "Transaction", id)
}

pub fn find_transaction(conn: &Connection, user_id: i64, id: i64) -> Result<Transaction> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, type, amount, category_id, description, date, created_at
         FROM transactions WHERE id=?1 AND user_id=?2",
    )?;
    let mut rows = stmt.query(params![id, user_id])?;
    match rows.next()? {
        Some(r) => transaction_from_row(r),
        None => Err(StoreError::NotFound {
            entity: "Transaction",
            id,
        }
        .into()),
    }
}

// Goals

pub fn list_goals(conn: &Connection, user_id: i64) -> Result<Vec<Goal>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, name, goal_type, period, target_amount, current_amount, category_id
         FROM goals WHERE user_id=?1 ORDER BY id",
    )?;
    let mut rows = stmt.query(params![user_id])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let goal_type: String = r.get(3)?;
        let target: String = r.get(5)?;
        let current: String = r.get(6)?;
        out.push(Goal {
            id: r.get(0)?,
            user_id: r.get(1)?,
            name: r.get(2)?,
            goal_type: goal_type.parse()?,
            period: r.get(4)?,
            target_amount: parse_decimal(&target)?,
            current_amount: parse_decimal(&current)?,
            category_id: r.get(7)?,
        });
    }
    debug!(user_id, count = out.len(), "fetched goals");
    Ok(out)
}

#[derive(Debug, Clone)]
pub struct NewGoal {
    pub name: String,
    pub goal_type: GoalKind,
    pub period: Option<String>,
    pub target_amount: Decimal,
    pub category_id: Option<i64>,
}

/// New goals start with a zero `current_amount`.
pub fn insert_goal(conn: &Connection, user_id: i64, goal: &NewGoal) -> Result<i64> {
    conn.execute(
        "INSERT INTO goals(user_id, name, goal_type, period, target_amount, current_amount, category_id)
         VALUES (?1, ?2, ?3, ?4, ?5, '0', ?6)",
        params![
            user_id,
            goal.name.trim(),
            goal.goal_type.as_str(),
            goal.period,
            goal.target_amount.to_string(),
            goal.category_id,
        ],
    )?;
    let id = conn.last_insert_rowid();
    debug!(user_id, id, "inserted goal");
    Ok(id)
}

/// `None` keeps the stored value. `category_id: Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct GoalPatch {
    pub name: Option<String>,
    pub goal_type: Option<GoalKind>,
    pub target_amount: Option<Decimal>,
    pub category_id: Option<Option<i64>>,
}

pub fn update_goal(conn: &Connection, user_id: i64, id: i64, patch: &GoalPatch) -> Result<()> {
    let n = conn.execute(
        "UPDATE goals SET
            name=COALESCE(?1, name),
            goal_type=COALESCE(?2, goal_type),
            target_amount=COALESCE(?3, target_amount),
            category_id=CASE WHEN ?4 THEN ?5 ELSE category_id END
         WHERE id=?6 AND user_id=?7",
        params![
            patch.name.as_deref().map(str::trim),
            patch.goal_type.map(|g| g.as_str()),
            patch.target_amount.map(|a| a.to_string()),
            patch.category_id.is_some(),
            patch.category_id.flatten(),
            id,
            user_id
        ],
    )?;
    expect_one(n, "Goal", id)
}

pub fn delete_goal(conn: &Connection, user_id: i64, id: i64) -> Result<()> {
    let n = conn.execute(
        "DELETE FROM goals WHERE id=?1 AND user_id=?2",
        params![id, user_id],
    )?;
    expect_one(n, "Goal", id)
}
