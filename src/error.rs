// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Domain error type shared by the services, the HTTP layer and the CLI.
//!
//! Every variant maps to an HTTP status through [`AppError::status_code`];
//! anything without an explicit mapping answers `400 Bad Request`.

use axum::Json;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Required input not provided")]
    MissingRequiredInput,

    #[error("PIN not provided")]
    MissingPin,

    #[error("No record found with the given id")]
    NoRecordWithId,

    #[error("No OTP has been requested")]
    NoPendingOtpRequest,

    #[error("Invalid OTP")]
    OtpMismatch,

    #[error("Insufficient SMS balance")]
    InsufficientNotificationCredit,

    #[error("Image upload failed")]
    ImageUploadFailed,

    #[error("Phone number is not configured")]
    PhoneNotConfigured,

    #[error("{0}")]
    InvalidInput(String),

    #[error("Variables are already initialized")]
    AlreadyInitialized,

    #[error("Variables are not initialized")]
    NotInitialized,

    #[error("Invalid PIN")]
    PinMismatch,

    #[error("docs not found")]
    DocumentNotFound,

    #[error(transparent)]
    Database(#[from] rusqlite::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Transport(BoxError),

    #[error("{0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        AppError::InvalidInput(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingRequiredInput | AppError::MissingPin | AppError::InvalidInput(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NoRecordWithId | AppError::DocumentNotFound | AppError::NotInitialized => {
                StatusCode::NOT_FOUND
            }
            AppError::NoPendingOtpRequest | AppError::AlreadyInitialized => StatusCode::CONFLICT,
            AppError::OtpMismatch | AppError::PinMismatch => StatusCode::UNAUTHORIZED,
            AppError::InsufficientNotificationCredit => StatusCode::PAYMENT_REQUIRED,
            AppError::PhoneNotConfigured => StatusCode::PRECONDITION_FAILED,
            AppError::ImageUploadFailed => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            AppError::Database(_) | AppError::Io(_) | AppError::Transport(_) | AppError::Internal(_)
        )
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_infrastructure() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }
        let status = self.status_code();
        (
            status,
            Json(ErrorBody {
                message: self.to_string(),
            }),
        )
            .into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::InvalidInput(e.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(e: QueryRejection) -> Self {
        AppError::InvalidInput(e.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(e: PathRejection) -> Self {
        AppError::InvalidInput(e.body_text())
    }
}

impl From<MultipartRejection> for AppError {
    fn from(e: MultipartRejection) -> Self {
        AppError::InvalidInput(e.body_text())
    }
}

impl From<MultipartError> for AppError {
    fn from(e: MultipartError) -> Self {
        AppError::InvalidInput(format!("Multipart error: {e}"))
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(e: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("background task failed: {e}"))
    }
}
