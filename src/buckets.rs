// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Calendar and fiscal-year bucketing for reports.
//!
//! All functions are pure: they take already-fetched records and never drop
//! a period. Empty months come back as explicit zero buckets.

use chrono::Datelike;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::models::{
    Analytics, CalendarReport, FinancialRecord, FiscalReport, MonthSummary, MonthlyBucket,
    TypeReport, TypeTotal,
};

/// The 12 `(month, year)` slots of a fiscal year starting in April of `year`.
pub fn fiscal_months(year: i32) -> [(u32, i32); 12] {
    let mut out = [(0, 0); 12];
    for (i, slot) in out.iter_mut().enumerate() {
        let m = (i as u32 + 3) % 12 + 1;
        *slot = (m, if m >= 4 { year } else { year + 1 });
    }
    out
}

fn calendar_months(year: i32) -> [(u32, i32); 12] {
    let mut out = [(0, 0); 12];
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = (i as u32 + 1, year);
    }
    out
}

fn bucketize(records: &[FinancialRecord], slots: [(u32, i32); 12]) -> Vec<MonthlyBucket> {
    let mut sums: BTreeMap<(i32, u32), Decimal> = BTreeMap::new();
    for r in records {
        *sums.entry((r.date.year(), r.date.month())).or_insert(Decimal::ZERO) += r.money.amount;
    }
    slots
        .into_iter()
        .map(|(month, year)| MonthlyBucket {
            month,
            year,
            amount: sums.get(&(year, month)).copied().unwrap_or(Decimal::ZERO),
        })
        .collect()
}

/// Twelve buckets, January..December of `year`. Records outside `year` are ignored.
pub fn monthly_buckets_for_calendar_year(
    records: &[FinancialRecord],
    year: i32,
) -> Vec<MonthlyBucket> {
    bucketize(records, calendar_months(year))
}

/// Twelve buckets, April..December of `year` then January..March of `year + 1`.
pub fn fiscal_year_buckets(records: &[FinancialRecord], year: i32) -> Vec<MonthlyBucket> {
    bucketize(records, fiscal_months(year))
}

pub fn total(buckets: &[MonthlyBucket]) -> Decimal {
    buckets.iter().map(|b| b.amount).sum()
}

fn summarize(income: &[MonthlyBucket], expense: &[MonthlyBucket]) -> Vec<MonthSummary> {
    income
        .iter()
        .zip(expense)
        .map(|(i, e)| MonthSummary {
            month: i.month,
            year: i.year,
            income: i.amount,
            expense: e.amount,
            capital: i.amount - e.amount,
        })
        .collect()
}

pub fn fiscal_report(
    incomes: &[FinancialRecord],
    expenses: &[FinancialRecord],
    year: i32,
) -> FiscalReport {
    let income = fiscal_year_buckets(incomes, year);
    let expense = fiscal_year_buckets(expenses, year);
    let (total_income, total_expense) = (total(&income), total(&expense));
    FiscalReport {
        year: format!("{}-{}", year, year + 1),
        income: total_income,
        expense: total_expense,
        capital: total_income - total_expense,
        months: summarize(&income, &expense),
    }
}

pub fn calendar_report(
    incomes: &[FinancialRecord],
    expenses: &[FinancialRecord],
    year: i32,
) -> CalendarReport {
    let income = monthly_buckets_for_calendar_year(incomes, year);
    let expense = monthly_buckets_for_calendar_year(expenses, year);
    let (total_income, total_expense) = (total(&income), total(&expense));
    CalendarReport {
        year,
        income: total_income,
        expense: total_expense,
        capital: total_income - total_expense,
        months: summarize(&income, &expense),
    }
}

fn group_by_type(records: &[FinancialRecord]) -> (Vec<TypeTotal>, Decimal) {
    let mut sums: BTreeMap<&str, Decimal> = BTreeMap::new();
    for r in records {
        *sums.entry(r.r#type.as_str()).or_insert(Decimal::ZERO) += r.money.amount;
    }
    let grand = sums.values().copied().sum();
    let rows = sums
        .into_iter()
        .map(|(t, amount)| TypeTotal {
            r#type: t.to_string(),
            amount,
        })
        .collect();
    (rows, grand)
}

/// Per-category totals. Only observed categories appear; the caller has
/// already narrowed `incomes`/`expenses` to the reporting window.
pub fn type_report(
    incomes: &[FinancialRecord],
    expenses: &[FinancialRecord],
    year: i32,
) -> TypeReport {
    let (incomes, total_income) = group_by_type(incomes);
    let (expenses, total_expense) = group_by_type(expenses);
    TypeReport {
        year,
        total_income,
        total_expense,
        balance: total_income - total_expense,
        incomes,
        expenses,
    }
}

/// Calendar buckets of `year` for both sides, for the dashboard chart.
pub fn yearly_analytics(
    incomes: &[FinancialRecord],
    expenses: &[FinancialRecord],
    year: i32,
) -> Analytics {
    Analytics {
        income: monthly_buckets_for_calendar_year(incomes, year),
        expense: monthly_buckets_for_calendar_year(expenses, year),
    }
}
