// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use super::Ack;
use super::state::AppState;
use crate::admin::{AdminService, InitInput, ResetPinInput, UpdateInfoInput};
use crate::error::AppResult;
use crate::models::PublicVariables;

#[derive(Debug, Default, Deserialize)]
struct VerifyPinInput {
    pin: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/variables", get(show).patch(update_info))
        .route("/variables/init", post(init))
        .route("/variables/otp", post(request_otp))
        .route("/variables/otp/{otp}", get(validate_otp))
        .route("/variables/reset-pin", post(reset_pin))
        .route("/variables/verify-pin", post(verify_pin))
}

/// Runs `f` against an [`AdminService`] on the blocking pool.
async fn with_admin<T, F>(state: &AppState, f: F) -> AppResult<T>
where
    F: FnOnce(&AdminService<'_>) -> AppResult<T> + Send + 'static,
    T: Send + 'static,
{
    let notifier = state.notifier.clone();
    let ttl = state.otp_ttl;
    state
        .with_conn(move |c| f(&AdminService::new(c, notifier.as_ref(), ttl)))
        .await
}

async fn init(
    State(state): State<AppState>,
    body: Result<Json<InitInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<PublicVariables>)> {
    let Json(input) = body?;
    let vars = with_admin(&state, move |svc| svc.init_variables(input)).await?;
    Ok((StatusCode::CREATED, Json(vars)))
}

async fn update_info(
    State(state): State<AppState>,
    body: Result<Json<UpdateInfoInput>, JsonRejection>,
) -> AppResult<Json<PublicVariables>> {
    let Json(input) = body?;
    let vars = with_admin(&state, move |svc| svc.update_trust_info(input)).await?;
    Ok(Json(vars))
}

async fn show(State(state): State<AppState>) -> AppResult<Json<PublicVariables>> {
    Ok(Json(with_admin(&state, |svc| svc.get_variables()).await?))
}

async fn request_otp(State(state): State<AppState>) -> AppResult<Json<Ack>> {
    with_admin(&state, |svc| svc.request_otp()).await?;
    Ok(Json(Ack::new("OTP sent")))
}

async fn validate_otp(
    State(state): State<AppState>,
    otp: Result<Path<String>, PathRejection>,
) -> AppResult<Json<Ack>> {
    let Path(otp) = otp?;
    with_admin(&state, move |svc| svc.validate_otp(&otp)).await?;
    Ok(Json(Ack::ok()))
}

async fn reset_pin(
    State(state): State<AppState>,
    body: Result<Json<ResetPinInput>, JsonRejection>,
) -> AppResult<Json<Ack>> {
    let Json(input) = body?;
    with_admin(&state, move |svc| svc.reset_pin(input)).await?;
    Ok(Json(Ack::ok()))
}

async fn verify_pin(
    State(state): State<AppState>,
    body: Result<Json<VerifyPinInput>, JsonRejection>,
) -> AppResult<Json<Ack>> {
    let Json(input) = body?;
    with_admin(&state, move |svc| svc.verify_pin(input.pin.as_deref())).await?;
    Ok(Json(Ack::ok()))
}
