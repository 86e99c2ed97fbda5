// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Runtime configuration, read from the environment (and `.env` when present).

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

use crate::db;

/// SMS gateway credentials. All of them must be present for the gateway to be used.
#[derive(Debug, Clone)]
pub struct SmsConfig {
    pub url: String,
    pub auth_key: String,
    pub sender_id: String,
    pub route_id: String,
    pub signature: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database file
    pub db_path: PathBuf,
    /// Directory holding employee documents (`<id>.png`)
    pub docs_dir: PathBuf,
    /// HTTP port for `serve`
    pub http_port: u16,
    /// How long an issued OTP stays valid
    pub otp_ttl: Duration,
    /// `None` selects the log-only notifier
    pub sms: Option<SmsConfig>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let db_path = match env_opt("TRUSTBOOK_DB") {
            Some(p) => PathBuf::from(p),
            None => db::default_db_path()?,
        };
        let docs_dir = match env_opt("DOCS_DIR") {
            Some(p) => PathBuf::from(p),
            None => db::data_dir()?.join("employee-docs"),
        };
        let http_port = match env_opt("HTTP_PORT") {
            Some(p) => p
                .parse()
                .with_context(|| format!("Invalid HTTP_PORT '{}'", p))?,
            None => 8080,
        };
        let otp_ttl_secs: u64 = match env_opt("OTP_TTL_SECS") {
            Some(s) => s
                .parse()
                .with_context(|| format!("Invalid OTP_TTL_SECS '{}'", s))?,
            None => 600,
        };

        Ok(Self {
            db_path,
            docs_dir,
            http_port,
            otp_ttl: Duration::from_secs(otp_ttl_secs),
            sms: SmsConfig::from_env(),
        })
    }
}

impl SmsConfig {
    fn from_env() -> Option<Self> {
        Some(Self {
            url: env_opt("SMS_URL")?,
            auth_key: env_opt("SMS_AUTH_KEY")?,
            sender_id: env_opt("SMS_SENDER_ID")?,
            route_id: env_opt("SMS_ROUTE_ID")?,
            signature: env_opt("SMS_SIGNATURE").unwrap_or_default(),
        })
    }
}

fn env_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
