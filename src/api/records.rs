// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Income and expense routes. The same router is mounted once per ledger.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::{Json, Router};

use super::state::AppState;
use crate::error::AppResult;
use crate::filter::{ReportFilter, ReportQuery};
use crate::ledger;
use crate::models::{FinancialRecord, Ledger, NewRecord, RecordPatch, UpdatedRecord};

pub fn router(kind: Ledger) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(move |state: State<AppState>, body: Result<Json<NewRecord>, JsonRejection>| {
                create(state, kind, body)
            }),
        )
        .route(
            "/report",
            get(
                move |state: State<AppState>, query: Result<Query<ReportQuery>, QueryRejection>| {
                    report(state, kind, query)
                },
            ),
        )
        .route(
            "/{id}",
            patch(
                move |state: State<AppState>,
                      id: Result<Path<i64>, PathRejection>,
                      body: Result<Json<RecordPatch>, JsonRejection>| {
                    update(state, kind, id, body)
                },
            )
            .delete(
                move |state: State<AppState>, id: Result<Path<i64>, PathRejection>| {
                    remove(state, kind, id)
                },
            ),
        )
}

async fn create(
    State(state): State<AppState>,
    kind: Ledger,
    body: Result<Json<NewRecord>, JsonRejection>,
) -> AppResult<(StatusCode, Json<FinancialRecord>)> {
    let Json(input) = body?;
    let rec = state
        .with_conn(move |c| ledger::insert(c, kind, &input))
        .await?;
    Ok((StatusCode::CREATED, Json(rec)))
}

async fn report(
    State(state): State<AppState>,
    kind: Ledger,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> AppResult<Json<Vec<FinancialRecord>>> {
    let Query(q) = query?;
    let filter = ReportFilter::try_from(q)?;
    let rows = state
        .with_conn(move |c| ledger::find(c, kind, &filter))
        .await?;
    Ok(Json(rows))
}

async fn update(
    State(state): State<AppState>,
    kind: Ledger,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<RecordPatch>, JsonRejection>,
) -> AppResult<Json<UpdatedRecord>> {
    let Path(id) = id?;
    let Json(patch) = body?;
    let updated = state
        .with_conn(move |c| ledger::update(c, kind, id, patch))
        .await?;
    Ok(Json(updated))
}

async fn remove(
    State(state): State<AppState>,
    kind: Ledger,
    id: Result<Path<i64>, PathRejection>,
) -> AppResult<Json<FinancialRecord>> {
    let Path(id) = id?;
    let deleted = state
        .with_conn(move |c| ledger::delete(c, kind, id))
        .await?;
    Ok(Json(deleted))
}
