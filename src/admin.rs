// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Administrative variables and the OTP-guarded PIN reset.
//!
//! The flow is `request_otp` -> `validate_otp` (optional, read-only) ->
//! `reset_pin`. At most one OTP is outstanding; issuing a new one replaces
//! it, and a reset consumes it. `reset_pin` re-checks the OTP itself, so it
//! never depends on an earlier `validate_otp` call.
//!
//! Concurrent requests are not serialized: if two OTP requests race, the
//! last write wins and the earlier code stops validating.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng};
use argon2::Argon2;
use chrono::{DateTime, Utc};
use rand::Rng;
use rusqlite::{Connection, OptionalExtension, params};
use serde::Deserialize;
use std::time::Duration;

use crate::error::{AppError, AppResult};
use crate::models::{IssuedOtp, PublicVariables, Variables};
use crate::sms::{ContentType, Notifier};
use crate::utils::{non_blank, parse_phone};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InitInput {
    pub name: Option<String>,
    pub pin: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateInfoInput {
    pub name: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResetPinInput {
    pub otp: Option<String>,
    pub pin: Option<String>,
}

/// Where the OTP flow currently stands, as derived from the stored record.
#[derive(Debug, Clone, PartialEq)]
pub enum OtpState {
    NoPendingOtp,
    Issued(IssuedOtp),
    Expired,
}

/// Access to the singleton `variables` row.
pub struct VariablesRepository<'c> {
    conn: &'c Connection,
}

impl<'c> VariablesRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn load(&self) -> AppResult<Option<Variables>> {
        let row = self
            .conn
            .query_row(
                "SELECT name, phone, pin_hash, otp, otp_issued_at FROM variables WHERE id=1",
                [],
                |r| {
                    let otp: Option<String> = r.get(3)?;
                    let issued: Option<DateTime<Utc>> = r.get(4)?;
                    Ok(Variables {
                        name: r.get(0)?,
                        phone: r.get(1)?,
                        pin_hash: r.get(2)?,
                        current_otp: otp.zip(issued).map(|(value, issued_at)| IssuedOtp {
                            value,
                            issued_at,
                        }),
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    pub fn insert(&self, name: Option<&str>, phone: &str, pin_hash: &str) -> AppResult<()> {
        self.conn.execute(
            "INSERT INTO variables(id, name, phone, pin_hash) VALUES (1, ?1, ?2, ?3)",
            params![name, phone, pin_hash],
        )?;
        Ok(())
    }

    pub fn update_info(&self, name: Option<&str>, phone: Option<&str>) -> AppResult<()> {
        self.conn.execute(
            "UPDATE variables SET name=COALESCE(?1, name), phone=COALESCE(?2, phone) WHERE id=1",
            params![name, phone],
        )?;
        Ok(())
    }

    pub fn store_otp(&self, otp: &IssuedOtp) -> AppResult<()> {
        self.conn.execute(
            "UPDATE variables SET otp=?1, otp_issued_at=?2 WHERE id=1",
            params![otp.value, otp.issued_at],
        )?;
        Ok(())
    }

    pub fn clear_otp(&self) -> AppResult<()> {
        self.conn.execute(
            "UPDATE variables SET otp=NULL, otp_issued_at=NULL WHERE id=1",
            [],
        )?;
        Ok(())
    }

    /// Replaces the PIN and consumes the OTP in one statement.
    pub fn set_pin_and_clear_otp(&self, pin_hash: &str) -> AppResult<()> {
        self.conn.execute(
            "UPDATE variables SET pin_hash=?1, otp=NULL, otp_issued_at=NULL WHERE id=1",
            params![pin_hash],
        )?;
        Ok(())
    }
}

pub fn hash_pin(pin: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(pin.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("PIN hashing failed: {e}")))
}

fn pin_matches(pin: &str, hash: &str) -> AppResult<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("Stored PIN hash unreadable: {e}")))?;
    Ok(Argon2::default()
        .verify_password(pin.as_bytes(), &parsed)
        .is_ok())
}

pub fn generate_otp() -> String {
    rand::thread_rng().gen_range(100_000..1_000_000).to_string()
}

pub struct AdminService<'a> {
    repo: VariablesRepository<'a>,
    notifier: &'a dyn Notifier,
    otp_ttl: Duration,
}

impl<'a> AdminService<'a> {
    pub fn new(conn: &'a Connection, notifier: &'a dyn Notifier, otp_ttl: Duration) -> Self {
        Self {
            repo: VariablesRepository::new(conn),
            notifier,
            otp_ttl,
        }
    }

    fn require(&self) -> AppResult<Variables> {
        self.repo.load()?.ok_or(AppError::NotInitialized)
    }

    pub fn init_variables(&self, input: InitInput) -> AppResult<PublicVariables> {
        let pin = non_blank(input.pin.as_deref()).ok_or(AppError::MissingPin)?;
        let phone = non_blank(input.phone.as_deref()).ok_or(AppError::MissingRequiredInput)?;
        let phone = parse_phone(phone)?;
        if self.repo.load()?.is_some() {
            return Err(AppError::AlreadyInitialized);
        }
        let name = non_blank(input.name.as_deref());
        self.repo.insert(name, &phone, &hash_pin(pin)?)?;
        tracing::info!("administrative variables initialized");
        self.get_variables()
    }

    pub fn update_trust_info(&self, input: UpdateInfoInput) -> AppResult<PublicVariables> {
        let name = non_blank(input.name.as_deref());
        let phone = non_blank(input.phone.as_deref()).map(parse_phone).transpose()?;
        if name.is_none() && phone.is_none() {
            return Err(AppError::MissingRequiredInput);
        }
        self.require()?;
        self.repo.update_info(name, phone.as_deref())?;
        self.get_variables()
    }

    pub fn get_variables(&self) -> AppResult<PublicVariables> {
        let vars = self.require()?;
        let mut public = PublicVariables::from(&vars);
        public.otp_pending = matches!(self.otp_state(&vars, Utc::now()), OtpState::Issued(_));
        Ok(public)
    }

    pub fn otp_state(&self, vars: &Variables, now: DateTime<Utc>) -> OtpState {
        match &vars.current_otp {
            None => OtpState::NoPendingOtp,
            Some(otp) => {
                let age = now.signed_duration_since(otp.issued_at);
                match chrono::Duration::from_std(self.otp_ttl) {
                    Ok(ttl) if age > ttl => OtpState::Expired,
                    _ => OtpState::Issued(otp.clone()),
                }
            }
        }
    }

    /// The outstanding, unexpired OTP. An expired one is cleared on the way.
    fn pending_otp(&self) -> AppResult<IssuedOtp> {
        let vars = self.require().map_err(|e| match e {
            AppError::NotInitialized => AppError::NoPendingOtpRequest,
            other => other,
        })?;
        match self.otp_state(&vars, Utc::now()) {
            OtpState::Issued(otp) => Ok(otp),
            OtpState::Expired => {
                self.repo.clear_otp()?;
                tracing::info!("expired OTP discarded");
                Err(AppError::NoPendingOtpRequest)
            }
            OtpState::NoPendingOtp => Err(AppError::NoPendingOtpRequest),
        }
    }

    /// Issues a fresh OTP and texts it to the configured phone. If the text
    /// cannot be delivered the OTP is withdrawn again.
    pub fn request_otp(&self) -> AppResult<()> {
        let vars = self.repo.load()?.ok_or(AppError::PhoneNotConfigured)?;
        let phone = non_blank(vars.phone.as_deref())
            .ok_or(AppError::PhoneNotConfigured)?
            .to_string();

        let otp = IssuedOtp {
            value: generate_otp(),
            issued_at: Utc::now(),
        };
        self.repo.store_otp(&otp)?;

        let message = format!("Your software PIN reset OTP is {}", otp.value);
        if let Err(e) = self
            .notifier
            .send(&phone, &message, ContentType::English)
            .into_result()
        {
            self.repo.clear_otp()?;
            tracing::warn!(error = %e, "OTP delivery failed; OTP withdrawn");
            return Err(e);
        }
        tracing::info!("PIN reset OTP issued");
        Ok(())
    }

    /// Checks `candidate` against the outstanding OTP without consuming it.
    pub fn validate_otp(&self, candidate: &str) -> AppResult<()> {
        let otp = self.pending_otp()?;
        if candidate.trim() != otp.value {
            return Err(AppError::OtpMismatch);
        }
        Ok(())
    }

    pub fn reset_pin(&self, input: ResetPinInput) -> AppResult<()> {
        let (Some(candidate), Some(pin)) =
            (non_blank(input.otp.as_deref()), non_blank(input.pin.as_deref()))
        else {
            return Err(AppError::MissingRequiredInput);
        };
        let otp = self.pending_otp()?;
        if candidate != otp.value {
            return Err(AppError::OtpMismatch);
        }
        self.repo.set_pin_and_clear_otp(&hash_pin(pin)?)?;
        tracing::info!("administrative PIN reset");
        Ok(())
    }

    pub fn verify_pin(&self, pin: Option<&str>) -> AppResult<()> {
        let pin = non_blank(pin).ok_or(AppError::MissingPin)?;
        let vars = self.require()?;
        if pin_matches(pin, &vars.pin_hash)? {
            Ok(())
        } else {
            Err(AppError::PinMismatch)
        }
    }
}
