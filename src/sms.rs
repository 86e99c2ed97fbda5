// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Outbound SMS. Sending is synchronous; the HTTP layer runs it on the
//! blocking pool.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::SmsConfig;
use crate::error::{AppError, AppResult, BoxError};
use crate::utils::http_client;

/// Gateway response code for an exhausted SMS balance.
pub const INSUFFICIENT_BALANCE_CODE: i64 = 3011;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    #[default]
    English,
    Unicode,
}

#[derive(Debug)]
pub enum Delivery {
    Delivered,
    InsufficientCredit,
    TransportError(BoxError),
}

impl Delivery {
    /// Maps a delivery outcome onto the domain error space.
    pub fn into_result(self) -> AppResult<()> {
        match self {
            Delivery::Delivered => Ok(()),
            Delivery::InsufficientCredit => Err(AppError::InsufficientNotificationCredit),
            Delivery::TransportError(e) => Err(AppError::Transport(e)),
        }
    }
}

pub trait Notifier: Send + Sync {
    fn send(&self, phone: &str, message: &str, content: ContentType) -> Delivery;
}

/// HTTP SMS gateway (bulk-SMS style JSON API keyed by `AUTH_KEY`).
#[derive(Debug, Clone)]
pub struct SmsGateway {
    config: SmsConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SendBody<'a> {
    sms_content: &'a str,
    route_id: &'a str,
    mobile_numbers: &'a str,
    sender_id: &'a str,
    signature: &'a str,
    sms_content_type: ContentType,
}

impl SmsGateway {
    pub fn new(config: SmsConfig) -> Self {
        Self { config }
    }

    fn post(&self, phone: &str, message: &str, content: ContentType) -> Result<Value, BoxError> {
        let body = SendBody {
            sms_content: message,
            route_id: &self.config.route_id,
            mobile_numbers: phone,
            sender_id: &self.config.sender_id,
            signature: &self.config.signature,
            sms_content_type: content,
        };
        let client = http_client()?;
        let resp = client
            .post(&self.config.url)
            .query(&[("AUTH_KEY", self.config.auth_key.as_str())])
            .header("Cache-Control", "no-cache")
            .json(&body)
            .send()?
            .error_for_status()?;
        Ok(resp.json()?)
    }
}

/// Reads `responseCode`, which gateways send either as a number or a string.
pub fn response_code(body: &Value) -> Option<i64> {
    match body.get("responseCode")? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl Notifier for SmsGateway {
    fn send(&self, phone: &str, message: &str, content: ContentType) -> Delivery {
        match self.post(phone, message, content) {
            Ok(body) if response_code(&body) == Some(INSUFFICIENT_BALANCE_CODE) => {
                tracing::warn!(phone, "sms rejected: insufficient balance");
                Delivery::InsufficientCredit
            }
            Ok(_) => {
                tracing::info!(phone, "sms sent");
                Delivery::Delivered
            }
            Err(e) => {
                tracing::error!(phone, error = %e, "sms transport failure");
                Delivery::TransportError(e)
            }
        }
    }
}

static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]{4,}").unwrap());

/// Masks every run of four or more digits, so codes never reach the logs.
pub fn redact(message: &str) -> String {
    DIGIT_RUN
        .replace_all(message, |c: &Captures| "*".repeat(c[0].len()))
        .into_owned()
}

/// Stand-in used when no gateway is configured: logs instead of sending.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn send(&self, phone: &str, message: &str, _content: ContentType) -> Delivery {
        let message = redact(message);
        tracing::warn!(phone, %message, "sms gateway not configured; message not sent");
        Delivery::Delivered
    }
}

pub fn notifier_from_config(sms: Option<SmsConfig>) -> Box<dyn Notifier> {
    match sms {
        Some(cfg) => Box::new(SmsGateway::new(cfg)),
        None => {
            tracing::warn!("SMS_URL/SMS_AUTH_KEY/SMS_SENDER_ID/SMS_ROUTE_ID not set; SMS disabled");
            Box::new(LogNotifier)
        }
    }
}

/// Free-form message to an arbitrary number (`POST /sms`).
pub fn send_message(notifier: &dyn Notifier, phone: &str, message: &str) -> AppResult<()> {
    let phone = phone.trim();
    let message = message.trim();
    if phone.is_empty() || message.is_empty() {
        return Err(AppError::MissingRequiredInput);
    }
    notifier.send(phone, message, ContentType::Unicode).into_result()
}
