// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use super::state::AppState;
use crate::error::AppResult;
use crate::ledger;
use crate::models::Ledger;
use crate::reports::{MoneyReportQuery, Report, ReportKind};
use crate::utils::current_year;

#[derive(Debug, Default, Deserialize)]
struct YearQuery {
    year: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/analytics", get(analytics))
        .route("/money-report", get(money_report))
        .route("/money-report/calendar", get(calendar_report))
}

/// Loads both ledgers for the report window concurrently, then buckets them.
async fn fetch_and_build(state: &AppState, kind: ReportKind) -> AppResult<Report> {
    let (from, to) = kind.window()?;
    let (incomes, expenses) = tokio::try_join!(
        state.with_conn(move |c| ledger::in_range(c, Ledger::Income, from, to)),
        state.with_conn(move |c| ledger::in_range(c, Ledger::Expense, from, to)),
    )?;
    Ok(kind.build(&incomes, &expenses))
}

async fn analytics(State(state): State<AppState>) -> AppResult<Json<Report>> {
    let report = fetch_and_build(&state, ReportKind::Analytics(current_year())).await?;
    Ok(Json(report))
}

async fn money_report(
    State(state): State<AppState>,
    query: Result<Query<MoneyReportQuery>, QueryRejection>,
) -> AppResult<Json<Report>> {
    let Query(q) = query?;
    let kind = ReportKind::money(&q)?;
    Ok(Json(fetch_and_build(&state, kind).await?))
}

async fn calendar_report(
    State(state): State<AppState>,
    query: Result<Query<YearQuery>, QueryRejection>,
) -> AppResult<Json<Report>> {
    let Query(q) = query?;
    let kind = ReportKind::calendar(q.year.as_deref())?;
    Ok(Json(fetch_and_build(&state, kind).await?))
}
