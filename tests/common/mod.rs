// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

#![allow(dead_code)]

use budgetbuddy::models::{Category, Transaction, TxKind};
use budgetbuddy::session::{self, SessionContext};
use budgetbuddy::{cli, db};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

pub fn created() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
}

pub fn tx(id: i64, kind: TxKind, amount: &str, category_id: Option<i64>) -> Transaction {
    Transaction {
        id,
        user_id: 1,
        kind,
        amount: dec(amount),
        category_id,
        description: format!("tx {}", id),
        date: None,
        created_at: created(),
    }
}

pub fn expense(amount: &str) -> Transaction {
    tx(0, TxKind::Expense, amount, None)
}

pub fn income(amount: &str) -> Transaction {
    tx(0, TxKind::Income, amount, None)
}

pub fn dated(mut t: Transaction, date: NaiveDate) -> Transaction {
    t.date = Some(date);
    t
}

pub fn category(id: i64, name: &str, kind: TxKind) -> Category {
    Category {
        id,
        user_id: 1,
        name: name.to_string(),
        kind,
    }
}

/// In-memory database with the real schema and one signed-in user.
pub fn signed_in() -> (Connection, SessionContext) {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    session::sign_up(&conn, "student@fiu.edu", "panther123").unwrap();
    let mut ctx = SessionContext::initialize(&conn).unwrap();
    session::sign_in(&mut ctx, &conn, "student@fiu.edu", "panther123").unwrap();
    (conn, ctx)
}

/// Parses `args` and returns the matches of the two-level subcommand.
pub fn sub_matches(args: &[&str]) -> clap::ArgMatches {
    let mut full = vec!["budgetbuddy"];
    full.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(full);
    let (_, m) = matches.subcommand().expect("missing subcommand");
    m.clone()
}

/// Matches of the innermost subcommand, e.g. `tx add` -> the `add` matches.
pub fn leaf_matches(args: &[&str]) -> clap::ArgMatches {
    let m = sub_matches(args);
    let (_, leaf) = m.subcommand().expect("missing nested subcommand");
    leaf.clone()
}
