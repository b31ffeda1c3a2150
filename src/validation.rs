// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::TxKind;
use crate::utils::parse_decimal;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fmt;

pub const MAX_CATEGORY_NAME: usize = 50;
/// Largest accepted amount; keeps every aggregate well inside `Decimal`'s range.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000;

/// Field name -> message. Empty means the form is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    fn set(&mut self, field: &'static str, msg: impl Into<String>) {
        self.0.insert(field, msg.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// `Ok(())` when empty, otherwise an error listing every field.
    pub fn into_result(self) -> anyhow::Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(anyhow::anyhow!("Invalid input: {}", self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
        f.write_str(&parts.join("; "))
    }
}

fn is_blank(s: Option<&str>) -> bool {
    s.is_none_or(|s| s.trim().is_empty())
}

enum AmountProblem {
    NotPositive,
    TooLarge,
}

fn check_amount(s: Option<&str>) -> Option<AmountProblem> {
    match s.and_then(|s| parse_decimal(s).ok()) {
        Some(d) if d > Decimal::from(MAX_AMOUNT) => Some(AmountProblem::TooLarge),
        Some(d) if d > Decimal::ZERO => None,
        _ => Some(AmountProblem::NotPositive),
    }
}

/// Raw transaction form input. Expense forms fill `category`, income forms `source`.
#[derive(Debug, Clone, Default)]
pub struct TransactionForm {
    pub amount: Option<String>,
    pub category: Option<String>,
    pub source: Option<String>,
    pub description: Option<String>,
}

impl TransactionForm {
    /// The category/source value, whichever was supplied.
    pub fn category_ref(&self) -> Option<&str> {
        [self.category.as_deref(), self.source.as_deref()]
            .into_iter()
            .flatten()
            .find(|s| !s.trim().is_empty())
    }
}

pub fn validate_transaction_form(form: &TransactionForm, kind: TxKind) -> FieldErrors {
    let mut errors = FieldErrors::default();
    match check_amount(form.amount.as_deref()) {
        Some(AmountProblem::NotPositive) => errors.set("amount", "Amount must be greater than 0"),
        Some(AmountProblem::TooLarge) => {
            errors.set("amount", format!("Amount must not exceed {}", MAX_AMOUNT))
        }
        None => {}
    }
    if form.category_ref().is_none() {
        errors.set("category", format!("{} is required", kind.category_label()));
    }
    if is_blank(form.description.as_deref()) {
        errors.set("description", "Description is required");
    }
    errors
}

pub fn validate_category_form(name: Option<&str>) -> FieldErrors {
    let mut errors = FieldErrors::default();
    if is_blank(name) {
        errors.set("name", "Category name is required");
    }
    // length check runs second and replaces the blank message
    if name.is_some_and(|n| n.chars().count() > MAX_CATEGORY_NAME) {
        errors.set("name", "Category name must be less than 50 characters");
    }
    errors
}

#[derive(Debug, Clone, Default)]
pub struct GoalForm {
    pub name: Option<String>,
    pub amount: Option<String>,
}

pub fn validate_goal_form(form: &GoalForm) -> FieldErrors {
    let mut errors = FieldErrors::default();
    if is_blank(form.name.as_deref()) {
        errors.set("name", "Goal name is required");
    }
    match check_amount(form.amount.as_deref()) {
        Some(AmountProblem::NotPositive) => {
            errors.set("amount", "Target amount must be greater than 0")
        }
        Some(AmountProblem::TooLarge) => {
            errors.set("amount", format!("Target amount must not exceed {}", MAX_AMOUNT))
        }
        None => {}
    }
    errors
}
