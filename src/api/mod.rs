// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! HTTP API.

pub mod employees;
pub mod members;
pub mod records;
pub mod reports;
pub mod state;
pub mod variables;

use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::AppResult;
use crate::models::Ledger;
use crate::sms;
pub use state::AppState;

/// Employee documents are images; keep uploads bounded.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
pub struct Ack {
    pub message: String,
}

impl Ack {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn ok() -> Self {
        Self::new("ok")
    }
}

#[derive(Debug, Deserialize)]
struct SmsInput {
    phone: Option<String>,
    message: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/sms", post(send_sms))
        .nest("/income", records::router(Ledger::Income))
        .nest("/expense", records::router(Ledger::Expense))
        .nest("/employee", employees::router())
        .nest("/member", members::router())
        .merge(reports::router())
        .merge(variables::router())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    REQUEST_TIMEOUT,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

async fn health() -> Json<Ack> {
    Json(Ack::ok())
}

async fn send_sms(
    State(state): State<AppState>,
    body: Result<Json<SmsInput>, JsonRejection>,
) -> AppResult<Json<Ack>> {
    let Json(input) = body?;
    let notifier = state.notifier.clone();
    tokio::task::spawn_blocking(move || {
        sms::send_message(
            notifier.as_ref(),
            input.phone.as_deref().unwrap_or_default(),
            input.message.as_deref().unwrap_or_default(),
        )
    })
    .await??;
    Ok(Json(Ack::new("sent")))
}

/// Binds the configured port and serves until the process is stopped.
pub async fn serve(config: Config) -> Result<()> {
    crate::db::open_or_init(&config.db_path)?;
    let notifier: Arc<dyn sms::Notifier> = Arc::from(sms::notifier_from_config(config.sms.clone()));
    let state = AppState::new(&config, notifier);
    let app = router(state);

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Bind {}", addr))?;
    tracing::info!(db = %config.db_path.display(), "trustbook listening on {addr}");
    axum::serve(listener, app).await.context("HTTP server error")?;
    Ok(())
}
