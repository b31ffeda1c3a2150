// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::{balance, saturating_sum};
use crate::models::{Goal, GoalKind, Transaction};
use rust_decimal::Decimal;
use serde::Serialize;

/// Percentage of `target` reached by `current`, clamped to `[0, 100]`.
///
/// Kept at full precision; rounding happens only when rendered. A ratio too
/// large to represent is already past either bound.
pub fn goal_progress(current: Decimal, target: Decimal) -> Decimal {
    if target <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    match current
        .checked_div(target)
        .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
    {
        Some(pct) => pct.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED),
        None if current.is_sign_positive() => Decimal::ONE_HUNDRED,
        None => Decimal::ZERO,
    }
}

pub fn remaining_amount(current: Decimal, target: Decimal) -> Decimal {
    target.saturating_sub(current).max(Decimal::ZERO)
}

/// A savings goal tracks the overall balance, not the goal's own stored amount.
pub fn savings_progress(transactions: &[Transaction]) -> Decimal {
    balance(transactions)
}

/// Lifetime expense total in one category, ignoring the goal's period.
pub fn spending_limit_progress(transactions: &[Transaction], category_id: Option<i64>) -> Decimal {
    saturating_sum(
        transactions
            .iter()
            .filter(|t| t.is_expense() && t.category_id == category_id)
            .map(|t| t.amount),
    )
}

/// How a goal's current figure is derived, chosen by its `goal_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStrategy {
    Savings,
    SpendingLimit { category_id: Option<i64> },
}

impl ProgressStrategy {
    pub fn for_goal(goal: &Goal) -> Self {
        match goal.goal_type {
            GoalKind::Saving => ProgressStrategy::Savings,
            GoalKind::Spending => ProgressStrategy::SpendingLimit {
                category_id: goal.category_id,
            },
        }
    }

    pub fn current(&self, transactions: &[Transaction]) -> Decimal {
        match self {
            ProgressStrategy::Savings => savings_progress(transactions),
            ProgressStrategy::SpendingLimit { category_id } => {
                spending_limit_progress(transactions, *category_id)
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GoalStatus {
    pub goal_id: i64,
    pub name: String,
    pub goal_type: GoalKind,
    pub target: Decimal,
    pub current: Decimal,
    pub progress: Decimal,
    pub remaining: Decimal,
}

impl GoalStatus {
    pub fn is_complete(&self) -> bool {
        self.progress >= Decimal::ONE_HUNDRED
    }
}

pub fn evaluate_goal(goal: &Goal, transactions: &[Transaction]) -> GoalStatus {
    let current = ProgressStrategy::for_goal(goal).current(transactions);
    GoalStatus {
        goal_id: goal.id,
        name: goal.name.clone(),
        goal_type: goal.goal_type,
        target: goal.target_amount,
        current,
        progress: goal_progress(current, goal.target_amount),
        remaining: remaining_amount(current, goal.target_amount),
    }
}
