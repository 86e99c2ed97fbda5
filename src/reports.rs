// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDateTime;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::buckets;
use crate::error::{AppError, AppResult};
use crate::ledger;
use crate::models::{Analytics, CalendarReport, FinancialRecord, FiscalReport, Ledger, TypeReport};
use crate::utils::{calendar_year_range, current_year, fiscal_year_range, month_range};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    /// Current-year monthly chart
    Analytics(i32),
    /// April..March money report
    Fiscal(i32),
    /// Per-category totals of one month
    Month { year: i32, month: u32 },
    /// January..December money report
    Calendar(i32),
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Report {
    Analytics(Analytics),
    Fiscal(FiscalReport),
    Types(TypeReport),
    Calendar(CalendarReport),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MoneyReportQuery {
    pub year: Option<String>,
    pub month: Option<String>,
}

impl ReportKind {
    /// `year` defaults to the current year; a `month` switches to the type report.
    pub fn money(query: &MoneyReportQuery) -> AppResult<Self> {
        let year = parse_year(query.year.as_deref())?;
        match crate::utils::non_blank(query.month.as_deref()) {
            Some(m) => {
                let month: u32 = m
                    .parse()
                    .map_err(|_| AppError::invalid(format!("Invalid month '{}'", m)))?;
                Ok(ReportKind::Month { year, month })
            }
            None => Ok(ReportKind::Fiscal(year)),
        }
    }

    pub fn calendar(year: Option<&str>) -> AppResult<Self> {
        Ok(ReportKind::Calendar(parse_year(year)?))
    }

    /// Half-open fetch window covering everything the report needs.
    pub fn window(&self) -> AppResult<(NaiveDateTime, NaiveDateTime)> {
        match *self {
            ReportKind::Analytics(y) | ReportKind::Calendar(y) => calendar_year_range(y),
            ReportKind::Fiscal(y) => fiscal_year_range(y),
            ReportKind::Month { year, month } => month_range(year, month),
        }
    }

    pub fn build(&self, incomes: &[FinancialRecord], expenses: &[FinancialRecord]) -> Report {
        match *self {
            ReportKind::Analytics(y) => Report::Analytics(buckets::yearly_analytics(incomes, expenses, y)),
            ReportKind::Fiscal(y) => Report::Fiscal(buckets::fiscal_report(incomes, expenses, y)),
            ReportKind::Month { year, .. } => {
                Report::Types(buckets::type_report(incomes, expenses, year))
            }
            ReportKind::Calendar(y) => Report::Calendar(buckets::calendar_report(incomes, expenses, y)),
        }
    }
}

fn parse_year(year: Option<&str>) -> AppResult<i32> {
    match crate::utils::non_blank(year) {
        Some(y) => y
            .parse()
            .map_err(|_| AppError::invalid(format!("Invalid year '{}'", y))),
        None => Ok(current_year()),
    }
}

/// Fetches both ledgers for the report window on one connection and builds the report.
pub fn run(conn: &Connection, kind: ReportKind) -> AppResult<Report> {
    let (from, to) = kind.window()?;
    let incomes = ledger::in_range(conn, Ledger::Income, from, to)?;
    let expenses = ledger::in_range(conn, Ledger::Expense, from, to)?;
    Ok(kind.build(&incomes, &expenses))
}
