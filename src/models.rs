// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which side of the ledger a transaction or category sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxKind {
    Expense,
    Income,
}

impl TxKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxKind::Expense => "expense",
            TxKind::Income => "income",
        }
    }

    /// Form field that names the category for this kind ("source" for income).
    pub fn category_field(&self) -> &'static str {
        match self {
            TxKind::Expense => "category",
            TxKind::Income => "source",
        }
    }

    pub fn category_label(&self) -> &'static str {
        match self {
            TxKind::Expense => "Category",
            TxKind::Income => "Source",
        }
    }
}

impl fmt::Display for TxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "expense" => Ok(TxKind::Expense),
            "income" => Ok(TxKind::Income),
            other => Err(anyhow::anyhow!(
                "Invalid type '{}', expected expense|income",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalKind {
    Saving,
    Spending,
}

impl GoalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalKind::Saving => "saving",
            GoalKind::Spending => "spending",
        }
    }
}

impl fmt::Display for GoalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GoalKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "saving" => Ok(GoalKind::Saving),
            "spending" => Ok(GoalKind::Spending),
            other => Err(anyhow::anyhow!(
                "Invalid goal type '{}', expected saving|spending",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TxKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    #[serde(rename = "type")]
    pub kind: TxKind,
    pub amount: Decimal,
    pub category_id: Option<i64>,
    pub description: String,
    pub date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn is_expense(&self) -> bool {
        self.kind == TxKind::Expense
    }

    pub fn is_income(&self) -> bool {
        self.kind == TxKind::Income
    }

    /// Instant used for period windows: the booking date at midnight UTC,
    /// or the creation time when no date was recorded.
    pub fn effective_at(&self) -> DateTime<Utc> {
        match self.date {
            Some(d) => d.and_time(NaiveTime::MIN).and_utc(),
            None => self.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub goal_type: GoalKind,
    pub period: Option<String>,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    pub category_id: Option<i64>, // spending goals only
}
