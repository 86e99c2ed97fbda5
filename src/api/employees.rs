// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Employee routes. Creation is multipart: a `data` part holding the
//! employee JSON and a `doc` part holding the image.

use axum::body::Bytes;
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use super::state::AppState;
use crate::employees;
use crate::error::{AppError, AppResult};
use crate::filter::{ReportFilter, ReportQuery};
use crate::models::{Employee, EmployeePatch, NewEmployee};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create))
        .route("/report", get(report))
        .route("/{id}", axum::routing::patch(update).delete(remove))
        .route("/{id}/doc", get(download))
}

async fn create(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<(StatusCode, Json<Employee>)> {
    let mut multipart = multipart?;
    let mut data: Option<NewEmployee> = None;
    let mut doc: Option<Bytes> = None;

    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("data") => {
                let raw = field.bytes().await?;
                data = Some(
                    serde_json::from_slice(&raw)
                        .map_err(|e| AppError::invalid(format!("Invalid employee data: {e}")))?,
                );
            }
            Some("doc") => doc = Some(field.bytes().await?),
            _ => {}
        }
    }

    let (Some(input), Some(doc)) = (data, doc) else {
        return Err(AppError::MissingRequiredInput);
    };
    let docs = state.docs.clone();
    let employee = state
        .with_conn(move |c| employees::create(c, &docs, &input, &doc))
        .await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

async fn report(
    State(state): State<AppState>,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> AppResult<Json<Vec<Employee>>> {
    let Query(q) = query?;
    let filter = ReportFilter::try_from(q)?;
    let rows = state
        .with_conn(move |c| employees::find(c, &filter))
        .await?;
    Ok(Json(rows))
}

async fn update(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<EmployeePatch>, JsonRejection>,
) -> AppResult<Json<Employee>> {
    let Path(id) = id?;
    let Json(changes) = body?;
    let employee = state
        .with_conn(move |c| employees::update(c, id, changes))
        .await?;
    Ok(Json(employee))
}

async fn remove(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> AppResult<Json<Employee>> {
    let Path(id) = id?;
    let docs = state.docs.clone();
    let employee = state
        .with_conn(move |c| employees::delete(c, &docs, id))
        .await?;
    Ok(Json(employee))
}

async fn download(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> AppResult<impl IntoResponse> {
    let Path(id) = id?;
    let docs = state.docs.clone();
    let content = state
        .with_conn(move |c| employees::download(c, &docs, id))
        .await?;
    Ok((
        [
            (header::CONTENT_TYPE, "image/png".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}.png\"", id),
            ),
        ],
        content,
    ))
}
