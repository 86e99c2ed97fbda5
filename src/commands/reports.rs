// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::models::{MonthSummary, MonthlyBucket, TypeTotal};
use crate::reports::{self, MoneyReportQuery, Report, ReportKind};
use crate::utils::{current_year, maybe_print_json, pretty_table, write_csv};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let (kind, sub) = match m.subcommand() {
        Some(("analytics", sub)) => (ReportKind::Analytics(current_year()), sub),
        Some(("money", sub)) => {
            let q = MoneyReportQuery {
                year: sub.get_one::<String>("year").cloned(),
                month: sub.get_one::<String>("month").cloned(),
            };
            (ReportKind::money(&q)?, sub)
        }
        Some(("calendar", sub)) => (
            ReportKind::calendar(sub.get_one::<String>("year").map(String::as_str))?,
            sub,
        ),
        _ => return Ok(()),
    };
    let report = reports::run(conn, kind)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        return Ok(());
    }
    let (headers, data) = table(&report);
    if let Some(path) = sub.get_one::<String>("csv") {
        write_csv(path, &headers, &data)?;
    }
    println!("{}", pretty_table(&headers, data));
    print_totals(&report);
    Ok(())
}

fn month_rows(months: &[MonthSummary]) -> Vec<Vec<String>> {
    months
        .iter()
        .map(|m| {
            vec![
                format!("{}-{:02}", m.year, m.month),
                format!("{:.2}", m.income),
                format!("{:.2}", m.expense),
                format!("{:.2}", m.capital),
            ]
        })
        .collect()
}

fn type_rows(side: &str, totals: &[TypeTotal]) -> Vec<Vec<String>> {
    totals
        .iter()
        .map(|t| vec![side.to_string(), t.r#type.clone(), format!("{:.2}", t.amount)])
        .collect()
}

fn table(report: &Report) -> (Vec<&'static str>, Vec<Vec<String>>) {
    match report {
        Report::Analytics(a) => {
            let rows = a
                .income
                .iter()
                .zip(&a.expense)
                .map(|(i, e): (&MonthlyBucket, &MonthlyBucket)| {
                    vec![
                        format!("{}-{:02}", i.year, i.month),
                        format!("{:.2}", i.amount),
                        format!("{:.2}", e.amount),
                    ]
                })
                .collect();
            (vec!["Month", "Income", "Expense"], rows)
        }
        Report::Fiscal(f) => (vec!["Month", "Income", "Expense", "Capital"], month_rows(&f.months)),
        Report::Calendar(c) => (vec!["Month", "Income", "Expense", "Capital"], month_rows(&c.months)),
        Report::Types(t) => {
            let mut rows = type_rows("income", &t.incomes);
            rows.extend(type_rows("expense", &t.expenses));
            (vec!["Side", "Type", "Amount"], rows)
        }
    }
}

fn print_totals(report: &Report) {
    match report {
        Report::Fiscal(f) => println!(
            "FY {}: income {:.2}, expense {:.2}, capital {:.2}",
            f.year, f.income, f.expense, f.capital
        ),
        Report::Calendar(c) => println!(
            "{}: income {:.2}, expense {:.2}, capital {:.2}",
            c.year, c.income, c.expense, c.capital
        ),
        Report::Types(t) => println!(
            "{}: income {:.2}, expense {:.2}, balance {:.2}",
            t.year, t.total_income, t.total_expense, t.balance
        ),
        Report::Analytics(_) => {}
    }
}
