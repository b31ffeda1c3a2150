// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Pure aggregations over a transaction snapshot.
//!
//! Nothing here touches the database; callers load a user's rows through
//! [`crate::store`] and pass slices in. Every function is total: sums
//! saturate at `Decimal::MAX` instead of overflowing.

use crate::models::{Category, Transaction, TxKind};
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

pub const DEFAULT_AVERAGE_DAYS: u32 = 30;
pub const WEEK_DAYS: u32 = 7;
pub const MONTH_DAYS: u32 = 30;
pub const UNCATEGORIZED: &str = "Uncategorized";

pub(crate) fn saturating_sum(amounts: impl IntoIterator<Item = Decimal>) -> Decimal {
    amounts
        .into_iter()
        .fold(Decimal::ZERO, |acc, a| acc.saturating_add(a))
}

fn sum_kind(transactions: &[Transaction], kind: TxKind) -> Decimal {
    saturating_sum(
        transactions
            .iter()
            .filter(|t| t.kind == kind)
            .map(|t| t.amount),
    )
}

pub fn total_expenses(transactions: &[Transaction]) -> Decimal {
    sum_kind(transactions, TxKind::Expense)
}

pub fn total_income(transactions: &[Transaction]) -> Decimal {
    sum_kind(transactions, TxKind::Income)
}

/// Income minus expenses. Negative when the user is over budget.
pub fn balance(transactions: &[Transaction]) -> Decimal {
    total_income(transactions).saturating_sub(total_expenses(transactions))
}

/// Lifetime expense total divided by `days`.
///
/// This is not a trailing-window average: transactions of any age count.
/// Use [`period_spending`] for a real window. `days == 0` yields zero.
pub fn daily_average(transactions: &[Transaction], days: u32) -> Decimal {
    if days == 0 {
        return Decimal::ZERO;
    }
    total_expenses(transactions)
        .checked_div(Decimal::from(days))
        .unwrap_or(Decimal::ZERO)
}

pub fn projected_monthly_spending(transactions: &[Transaction], days: u32) -> Decimal {
    daily_average(transactions, days).saturating_mul(Decimal::from(MONTH_DAYS))
}

/// Expense total for transactions dated within the last `days` days of `now`.
pub fn period_spending_at(transactions: &[Transaction], days: u32, now: DateTime<Utc>) -> Decimal {
    let cutoff = now
        .checked_sub_signed(Duration::days(i64::from(days)))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    saturating_sum(
        transactions
            .iter()
            .filter(|t| t.is_expense() && t.effective_at() >= cutoff)
            .map(|t| t.amount),
    )
}

pub fn period_spending(transactions: &[Transaction], days: u32) -> Decimal {
    period_spending_at(transactions, days, Utc::now())
}

pub fn weekly_spending(transactions: &[Transaction]) -> Decimal {
    period_spending(transactions, WEEK_DAYS)
}

pub fn monthly_spending(transactions: &[Transaction]) -> Decimal {
    period_spending(transactions, MONTH_DAYS)
}

/// Expense totals keyed by category name, in category order.
///
/// Categories with nothing spent are absent rather than zero. Two categories
/// sharing a name collapse onto the first one's slot, last total wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategorySpending {
    entries: Vec<(String, Decimal)>,
}

impl CategorySpending {
    fn insert(&mut self, name: &str, amount: Decimal) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = amount,
            None => self.entries.push((name.to_string(), amount)),
        }
    }

    pub fn get(&self, name: &str) -> Option<Decimal> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, a)| *a)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.entries.iter().map(|(n, a)| (n.as_str(), *a))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> Decimal {
        saturating_sum(self.entries.iter().map(|(_, a)| *a))
    }

    /// Share of each entry in the categorized total, as a percentage.
    pub fn percentages(&self) -> Vec<(&str, Decimal)> {
        let total = self.total();
        self.iter()
            .map(|(n, a)| {
                let pct = a
                    .checked_div(total)
                    .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
                    .unwrap_or(Decimal::ZERO);
                (n, pct)
            })
            .collect()
    }
}

pub fn category_spending(
    transactions: &[Transaction],
    categories: &[Category],
) -> CategorySpending {
    let mut out = CategorySpending::default();
    for category in categories.iter().filter(|c| c.kind == TxKind::Expense) {
        let total = saturating_sum(
            transactions
                .iter()
                .filter(|t| t.is_expense() && t.category_id == Some(category.id))
                .map(|t| t.amount),
        );
        if total > Decimal::ZERO {
            out.insert(&category.name, total);
        }
    }
    out
}

/// Highest-spend entry. Ties go to the category listed first.
pub fn top_category(spending: &CategorySpending) -> Option<(&str, Decimal)> {
    let mut items: Vec<(&str, Decimal)> = spending.iter().collect();
    // sort_by is stable, so equal amounts keep insertion order
    items.sort_by(|a, b| b.1.cmp(&a.1));
    items.into_iter().next()
}

/// Id -> category table for resolving the weak `category_id` references
/// carried by transactions and goals.
pub struct CategoryLookup<'a> {
    by_id: HashMap<i64, &'a Category>,
}

impl<'a> CategoryLookup<'a> {
    pub fn new(categories: &'a [Category]) -> Self {
        Self {
            by_id: categories.iter().map(|c| (c.id, c)).collect(),
        }
    }

    pub fn get(&self, id: Option<i64>) -> Option<&'a Category> {
        id.and_then(|id| self.by_id.get(&id).copied())
    }

    /// Display name, with dangling or missing ids shown as "Uncategorized".
    pub fn name_for(&self, id: Option<i64>) -> &'a str {
        self.get(id).map(|c| c.name.as_str()).unwrap_or(UNCATEGORIZED)
    }

    pub fn is_dangling(&self, id: Option<i64>) -> bool {
        matches!(id, Some(id) if !self.by_id.contains_key(&id))
    }
}

/// Everything the summary report prints, computed from one snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub balance: Decimal,
    pub daily_average: Decimal,
    pub average_days: u32,
    pub weekly_spending: Decimal,
    pub monthly_spending: Decimal,
    pub projected_monthly: Decimal,
    pub top_category: Option<(String, Decimal)>,
}

pub fn summarize_at(
    transactions: &[Transaction],
    categories: &[Category],
    days: u32,
    now: DateTime<Utc>,
) -> Summary {
    let spending = category_spending(transactions, categories);
    Summary {
        total_income: total_income(transactions),
        total_expenses: total_expenses(transactions),
        balance: balance(transactions),
        daily_average: daily_average(transactions, days),
        average_days: days,
        weekly_spending: period_spending_at(transactions, WEEK_DAYS, now),
        monthly_spending: period_spending_at(transactions, MONTH_DAYS, now),
        projected_monthly: projected_monthly_spending(transactions, days),
        top_category: top_category(&spending).map(|(n, a)| (n.to_string(), a)),
    }
}
