// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which side of the books a financial record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ledger {
    Income,
    Expense,
}

impl Ledger {
    pub fn table(self) -> &'static str {
        match self {
            Ledger::Income => "incomes",
            Ledger::Expense => "expenses",
        }
    }
}

impl fmt::Display for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ledger::Income => f.write_str("income"),
            Ledger::Expense => f.write_str("expense"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoneyType {
    Cash,
    Cheque,
    Online,
}

impl MoneyType {
    pub fn as_str(self) -> &'static str {
        match self {
            MoneyType::Cash => "cash",
            MoneyType::Cheque => "cheque",
            MoneyType::Online => "online",
        }
    }
}

impl FromStr for MoneyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" => Ok(MoneyType::Cash),
            "cheque" | "check" => Ok(MoneyType::Cheque),
            "online" => Ok(MoneyType::Online),
            other => Err(format!(
                "Invalid money type '{}', expected cash, cheque or online",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Money {
    pub amount: Decimal,
    pub r#type: MoneyType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cheque_no: Option<String>,
}

/// An income or expense entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialRecord {
    pub id: i64,
    pub date: NaiveDateTime,
    pub money: Money,
    pub r#type: String,
    pub slip_no: Option<String>,
    pub position: Option<String>,
    pub tag: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewRecord {
    #[serde(deserialize_with = "crate::utils::de_datetime")]
    pub date: NaiveDateTime,
    pub money: Money,
    pub r#type: String,
    #[serde(default)]
    pub slip_no: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordPatch {
    #[serde(default, deserialize_with = "crate::utils::de_opt_datetime")]
    pub date: Option<NaiveDateTime>,
    pub money: Option<Money>,
    pub r#type: Option<String>,
    pub slip_no: Option<String>,
    pub position: Option<String>,
    pub tag: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedRecord {
    pub record: FinancialRecord,
    pub old_amount: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub date: NaiveDateTime,
    pub r#type: Option<String>,
    pub position: Option<String>,
    pub tag: Option<String>,
    pub money: Option<Money>,
    pub slip_no: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewEmployee {
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(deserialize_with = "crate::utils::de_datetime")]
    pub date: NaiveDateTime,
    #[serde(default)]
    pub r#type: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub money: Option<Money>,
    #[serde(default)]
    pub slip_no: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeePatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[serde(default, deserialize_with = "crate::utils::de_opt_datetime")]
    pub date: Option<NaiveDateTime>,
    pub r#type: Option<String>,
    pub position: Option<String>,
    pub tag: Option<String>,
    pub money: Option<Money>,
    pub slip_no: Option<String>,
}

/// A trust member. `money` is the membership contribution, when one was paid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: i64,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub date: NaiveDateTime,
    pub r#type: Option<String>,
    pub position: Option<String>,
    pub tag: Option<String>,
    pub money: Option<Money>,
    pub slip_no: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewMember {
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(deserialize_with = "crate::utils::de_datetime")]
    pub date: NaiveDateTime,
    #[serde(default)]
    pub r#type: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub money: Option<Money>,
    #[serde(default)]
    pub slip_no: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemberPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[serde(default, deserialize_with = "crate::utils::de_opt_datetime")]
    pub date: Option<NaiveDateTime>,
    pub r#type: Option<String>,
    pub position: Option<String>,
    pub tag: Option<String>,
    pub money: Option<Money>,
    pub slip_no: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBucket {
    pub month: u32,
    pub year: i32,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthSummary {
    pub month: u32,
    pub year: i32,
    pub income: Decimal,
    pub expense: Decimal,
    pub capital: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeTotal {
    pub r#type: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct FiscalReport {
    pub year: String,
    pub income: Decimal,
    pub expense: Decimal,
    pub capital: Decimal,
    pub months: Vec<MonthSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CalendarReport {
    pub year: i32,
    pub income: Decimal,
    pub expense: Decimal,
    pub capital: Decimal,
    pub months: Vec<MonthSummary>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeReport {
    pub year: i32,
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub balance: Decimal,
    pub incomes: Vec<TypeTotal>,
    pub expenses: Vec<TypeTotal>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Analytics {
    pub income: Vec<MonthlyBucket>,
    pub expense: Vec<MonthlyBucket>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IssuedOtp {
    pub value: String,
    pub issued_at: DateTime<Utc>,
}

/// The administrative singleton as stored. `pin_hash` never leaves the crate
/// through serialization; see [`PublicVariables`].
#[derive(Debug, Clone)]
pub struct Variables {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub pin_hash: String,
    pub current_otp: Option<IssuedOtp>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicVariables {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub initialized: bool,
    pub otp_pending: bool,
}

impl From<&Variables> for PublicVariables {
    fn from(v: &Variables) -> Self {
        PublicVariables {
            name: v.name.clone(),
            phone: v.phone.clone(),
            initialized: true,
            otp_pending: v.current_otp.is_some(),
        }
    }
}
