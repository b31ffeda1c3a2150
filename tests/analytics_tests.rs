// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use budgetbuddy::analytics::*;
use budgetbuddy::models::{Transaction, TxKind};
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use common::{category, dated, dec, expense, income, tx};
use rust_decimal::Decimal;

#[test]
fn empty_input_sums_to_zero() {
    let none: Vec<Transaction> = Vec::new();
    assert_eq!(total_expenses(&none), Decimal::ZERO);
    assert_eq!(total_income(&none), Decimal::ZERO);
    assert_eq!(balance(&none), Decimal::ZERO);
    assert_eq!(daily_average(&none, DEFAULT_AVERAGE_DAYS), Decimal::ZERO);
}

#[test]
fn expenses_sum_decimal_amounts_and_ignore_income() {
    let txs = vec![expense("10.50"), expense("25.00"), income("100"), expense("8.75")];
    assert_eq!(total_expenses(&txs), dec("44.25"));
    assert_eq!(total_income(&txs), dec("100"));
    assert_eq!(daily_average(&txs, 30), dec("1.475"));
}

#[test]
fn string_amounts_sum_exactly() {
    let txs = vec![expense("15.99"), expense("24.01")];
    assert_eq!(total_expenses(&txs), dec("40"));
    let txs = vec![expense("12.50"), expense("8.99")];
    assert_eq!(total_expenses(&txs), dec("21.49"));
}

#[test]
fn balance_is_income_minus_expenses() {
    let txs = vec![income("2450"), expense("1890")];
    assert_eq!(total_income(&txs), dec("2450"));
    assert_eq!(total_expenses(&txs), dec("1890"));
    assert_eq!(balance(&txs), dec("560"));

    let mixed = vec![income("1500"), expense("300"), income("500"), expense("2200.25")];
    assert_eq!(balance(&mixed), total_income(&mixed) - total_expenses(&mixed));
    assert_eq!(balance(&mixed), dec("-500.25"));
}

#[test]
fn daily_average_divides_lifetime_total() {
    assert_eq!(daily_average(&[expense("300")], 30), dec("10"));
    assert_eq!(daily_average(&[expense("700")], 7), dec("100"));
    assert_eq!(daily_average(&[expense("100")], 1), dec("100"));
    assert_eq!(daily_average(&[expense("100")], 0), Decimal::ZERO);
    assert_eq!(projected_monthly_spending(&[expense("700")], 7), dec("3000"));
}

#[test]
fn period_spending_only_counts_recent_expenses() {
    let now = Utc.with_ymd_and_hms(2025, 3, 15, 9, 30, 0).unwrap();
    let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
    let txs = vec![
        dated(expense("20"), d(2025, 3, 14)),
        dated(expense("15"), d(2025, 3, 9)),
        dated(expense("40"), d(2025, 3, 1)),
        dated(expense("99"), d(2024, 12, 1)),
        dated(income("500"), d(2025, 3, 14)),
    ];
    assert_eq!(period_spending_at(&txs, 7, now), dec("35"));
    assert_eq!(period_spending_at(&txs, 30, now), dec("75"));
    // lifetime average is unaffected by the window
    assert_eq!(daily_average(&txs, 30), dec("174") / Decimal::from(30));
}

#[test]
fn period_spending_falls_back_to_created_at() {
    let now = Utc::now();
    let mut recent = expense("12");
    recent.created_at = now - Duration::days(2);
    let mut old = expense("30");
    old.created_at = now - Duration::days(40);
    let txs = vec![recent, old];
    assert_eq!(period_spending_at(&txs, 7, now), dec("12"));
    assert_eq!(weekly_spending(&txs), dec("12"));
    assert_eq!(monthly_spending(&txs), dec("12"));
}

#[test]
fn category_spending_omits_zero_and_income_categories() {
    let categories = vec![
        category(1, "Food", TxKind::Expense),
        category(2, "Bills", TxKind::Expense),
        category(3, "Fun", TxKind::Expense),
        category(4, "Salary", TxKind::Income),
    ];
    let txs = vec![
        tx(1, TxKind::Expense, "12.50", Some(1)),
        tx(2, TxKind::Expense, "30", Some(2)),
        tx(3, TxKind::Expense, "7.50", Some(1)),
        tx(4, TxKind::Income, "900", Some(4)),
        tx(5, TxKind::Expense, "5", None),
    ];
    let spending = category_spending(&txs, &categories);
    assert_eq!(spending.len(), 2);
    assert_eq!(spending.get("Food"), Some(dec("20")));
    assert_eq!(spending.get("Bills"), Some(dec("30")));
    assert_eq!(spending.get("Fun"), None);
    assert_eq!(spending.get("Salary"), None);
    let names: Vec<&str> = spending.iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["Food", "Bills"]);
    // categorized total excludes the uncategorized expense
    assert_eq!(spending.total(), total_expenses(&txs) - dec("5"));
}

#[test]
fn category_breakdown_percentages_sum_to_hundred() {
    let categories = vec![
        category(1, "Food", TxKind::Expense),
        category(2, "Bills", TxKind::Expense),
        category(3, "Entertainment", TxKind::Expense),
    ];
    let txs = vec![
        tx(1, TxKind::Expense, "50", Some(1)),
        tx(2, TxKind::Expense, "100", Some(2)),
        tx(3, TxKind::Expense, "50", Some(3)),
    ];
    let spending = category_spending(&txs, &categories);
    let pct = spending.percentages();
    assert_eq!(pct[0], ("Food", dec("25")));
    assert_eq!(pct[1], ("Bills", dec("50")));
    assert_eq!(pct[2], ("Entertainment", dec("25")));
    let sum: Decimal = pct.iter().map(|(_, p)| *p).sum();
    assert_eq!(sum, dec("100"));
}

#[test]
fn top_category_picks_highest_then_first_listed() {
    let categories = vec![
        category(1, "A", TxKind::Expense),
        category(2, "B", TxKind::Expense),
        category(3, "C", TxKind::Expense),
    ];
    let txs = vec![
        tx(1, TxKind::Expense, "50", Some(1)),
        tx(2, TxKind::Expense, "100", Some(2)),
        tx(3, TxKind::Expense, "50", Some(3)),
    ];
    let spending = category_spending(&txs, &categories);
    assert_eq!(top_category(&spending), Some(("B", dec("100"))));

    let tied = vec![
        tx(1, TxKind::Expense, "75", Some(1)),
        tx(2, TxKind::Expense, "75", Some(2)),
    ];
    let spending = category_spending(&tied, &categories);
    assert_eq!(top_category(&spending), Some(("A", dec("75"))));

    assert_eq!(top_category(&CategorySpending::default()), None);
}

#[test]
fn lookup_renders_dangling_ids_as_uncategorized() {
    let categories = vec![category(1, "Food", TxKind::Expense)];
    let lookup = CategoryLookup::new(&categories);
    assert_eq!(lookup.name_for(Some(1)), "Food");
    assert_eq!(lookup.name_for(Some(42)), UNCATEGORIZED);
    assert_eq!(lookup.name_for(None), UNCATEGORIZED);
    assert!(lookup.is_dangling(Some(42)));
    assert!(!lookup.is_dangling(None));
}

#[test]
fn transactions_deserialize_numeric_string_amounts() {
    let raw = r#"[
        {"id":1,"user_id":7,"type":"expense","amount":"10.50","category_id":null,
         "description":"coffee","date":"2025-02-01","created_at":"2025-02-01T10:00:00Z"},
        {"id":2,"user_id":7,"type":"income","amount":2450,"category_id":3,
         "description":"paycheck","created_at":"2025-02-02T10:00:00Z"}
    ]"#;
    let txs: Vec<Transaction> = serde_json::from_str(raw).unwrap();
    assert_eq!(total_expenses(&txs), dec("10.50"));
    assert_eq!(total_income(&txs), dec("2450"));
    assert_eq!(txs[1].date, None);
}

#[test]
fn summary_collects_all_figures() {
    let now = Utc.with_ymd_and_hms(2025, 3, 15, 0, 0, 0).unwrap();
    let categories = vec![category(1, "Food", TxKind::Expense)];
    let d = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
    let txs = vec![
        dated(tx(1, TxKind::Expense, "60", Some(1)), d),
        dated(tx(2, TxKind::Income, "100", None), d),
    ];
    let s = summarize_at(&txs, &categories, 30, now);
    assert_eq!(s.balance, dec("40"));
    assert_eq!(s.daily_average, dec("2"));
    assert_eq!(s.projected_monthly, dec("60"));
    assert_eq!(s.weekly_spending, dec("60"));
    assert_eq!(s.top_category, Some(("Food".to_string(), dec("60"))));
}

#[test]
fn sums_saturate_instead_of_overflowing() {
    let huge = "50000000000000000000000000000";
    let txs = vec![
        tx(1, TxKind::Expense, huge, Some(1)),
        tx(2, TxKind::Expense, huge, Some(2)),
    ];
    assert_eq!(total_expenses(&txs), Decimal::MAX);
    assert_eq!(balance(&txs), Decimal::MIN);

    let cats = vec![category(1, "Rent", TxKind::Expense), category(2, "Tuition", TxKind::Expense)];
    let spending = category_spending(&txs, &cats);
    assert_eq!(spending.total(), Decimal::MAX);
    for (_, pct) in spending.percentages() {
        assert!(pct > Decimal::ZERO && pct <= Decimal::ONE_HUNDRED);
    }

    let now = Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap();
    let s = summarize_at(&txs, &cats, 30, now);
    assert_eq!(s.total_expenses, Decimal::MAX);
    assert_eq!(s.monthly_spending, Decimal::MAX);
    assert!(s.projected_monthly > Decimal::ZERO);
}

#[test]
fn window_wider_than_calendar_counts_everything() {
    let now = Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap();
    let txs = vec![expense("4"), expense("6")];
    assert_eq!(period_spending_at(&txs, u32::MAX, now), dec("10"));
}
