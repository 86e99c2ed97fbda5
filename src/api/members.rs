// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::{Json, Router};

use super::state::AppState;
use crate::error::AppResult;
use crate::filter::{ReportFilter, ReportQuery};
use crate::members;
use crate::models::{Member, MemberPatch, NewMember};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create))
        .route("/report", get(report))
        .route("/{id}", patch(update).delete(remove))
}

async fn create(
    State(state): State<AppState>,
    body: Result<Json<NewMember>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Member>)> {
    let Json(input) = body?;
    let member = state.with_conn(move |c| members::insert(c, &input)).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

async fn report(
    State(state): State<AppState>,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> AppResult<Json<Vec<Member>>> {
    let Query(q) = query?;
    let filter = ReportFilter::try_from(q)?;
    let rows = state.with_conn(move |c| members::find(c, &filter)).await?;
    Ok(Json(rows))
}

async fn update(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<MemberPatch>, JsonRejection>,
) -> AppResult<Json<Member>> {
    let Path(id) = id?;
    let Json(changes) = body?;
    let member = state
        .with_conn(move |c| members::update(c, id, changes))
        .await?;
    Ok(Json(member))
}

async fn remove(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> AppResult<Json<Member>> {
    let Path(id) = id?;
    let member = state.with_conn(move |c| members::delete(c, id)).await?;
    Ok(Json(member))
}
