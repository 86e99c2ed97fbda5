// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Report filters: a typed set of optional constraints, turned into a
//! conjunctive list of predicates. Date and exact-match predicates become a
//! SQL `WHERE` clause; amount bounds are checked on the decoded `Decimal`
//! since amounts are stored as text and SQLite can only compare them as
//! floats.

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::Value;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::AppError;
use crate::models::MoneyType;
use crate::utils::{end_of_day, non_blank, parse_date, parse_decimal};

/// Raw filter parameters as they arrive on the query string or the command line.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub r#type: Option<String>,
    pub money_type: Option<String>,
    pub cheque_no: Option<String>,
    pub slip_no: Option<String>,
    pub amount_from: Option<String>,
    pub amount_to: Option<String>,
    pub position: Option<String>,
    pub tag: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportFilter {
    pub date_from: Option<NaiveDate>,
    /// Inclusive calendar day; matched up to `23:59:59` exclusive.
    pub date_to: Option<NaiveDate>,
    pub r#type: Option<String>,
    pub money_type: Option<MoneyType>,
    pub cheque_no: Option<String>,
    pub slip_no: Option<String>,
    pub amount_from: Option<Decimal>,
    pub amount_to: Option<Decimal>,
    pub position: Option<String>,
    pub tag: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Type,
    MoneyType,
    ChequeNo,
    SlipNo,
    Position,
    Tag,
}

impl Field {
    fn column(self) -> &'static str {
        match self {
            Field::Type => "type",
            Field::MoneyType => "money_type",
            Field::ChequeNo => "cheque_no",
            Field::SlipNo => "slip_no",
            Field::Position => "position",
            Field::Tag => "tag",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    DateFrom(NaiveDateTime),
    DateBefore(NaiveDateTime),
    Equals(Field, String),
    AmountFrom(Decimal),
    AmountBelow(Decimal),
}

impl Predicate {
    /// SQL fragment and parameter, or `None` for amount bounds.
    pub fn to_sql(&self) -> Option<(String, Value)> {
        match self {
            Predicate::DateFrom(dt) => Some(("date >= ?".into(), Value::Text(sql_datetime(dt)))),
            Predicate::DateBefore(dt) => Some(("date < ?".into(), Value::Text(sql_datetime(dt)))),
            Predicate::Equals(field, v) => {
                Some((format!("{} = ?", field.column()), Value::Text(v.clone())))
            }
            Predicate::AmountFrom(_) | Predicate::AmountBelow(_) => None,
        }
    }

    /// Exact check of an amount bound. Non-amount predicates accept everything.
    pub fn admits_amount(&self, amount: Decimal) -> bool {
        match self {
            Predicate::AmountFrom(from) => amount >= *from,
            Predicate::AmountBelow(to) => amount < *to,
            _ => true,
        }
    }

    fn is_amount(&self) -> bool {
        matches!(self, Predicate::AmountFrom(_) | Predicate::AmountBelow(_))
    }
}

/// Same text layout rusqlite uses when binding a `NaiveDateTime`.
fn sql_datetime(dt: &NaiveDateTime) -> String {
    dt.format("%F %T%.f").to_string()
}

impl ReportFilter {
    /// One predicate per supplied field; absent fields contribute nothing.
    pub fn predicates(&self) -> Vec<Predicate> {
        let mut out = Vec::new();
        if let Some(from) = self.date_from {
            out.push(Predicate::DateFrom(from.and_hms_opt(0, 0, 0).unwrap_or_default()));
        }
        if let Some(to) = self.date_to {
            out.push(Predicate::DateBefore(end_of_day(to)));
        }
        let exact = [
            (Field::Type, self.r#type.clone()),
            (Field::MoneyType, self.money_type.map(|m| m.as_str().to_string())),
            (Field::ChequeNo, self.cheque_no.clone()),
            (Field::SlipNo, self.slip_no.clone()),
            (Field::Position, self.position.clone()),
            (Field::Tag, self.tag.clone()),
        ];
        for (field, value) in exact {
            if let Some(v) = value {
                out.push(Predicate::Equals(field, v));
            }
        }
        if let Some(from) = self.amount_from {
            out.push(Predicate::AmountFrom(from));
        }
        if let Some(to) = self.amount_to {
            out.push(Predicate::AmountBelow(to));
        }
        out
    }

    /// `WHERE` body (without the keyword) and its positional parameters.
    /// Amount bounds are left to [`ReportFilter::admits_amount`].
    pub fn where_clause(&self) -> (String, Vec<Value>) {
        let (clauses, params): (Vec<String>, Vec<Value>) = self
            .predicates()
            .iter()
            .filter_map(Predicate::to_sql)
            .unzip();
        if clauses.is_empty() {
            return ("1=1".into(), Vec::new());
        }
        (clauses.join(" AND "), params)
    }

    /// Applies the amount bounds. A row without an amount only passes when
    /// no bound is set.
    pub fn admits_amount(&self, amount: Option<Decimal>) -> bool {
        let mut bounds = self.predicates().into_iter().filter(Predicate::is_amount).peekable();
        match amount {
            Some(a) => bounds.all(|p| p.admits_amount(a)),
            None => bounds.peek().is_none(),
        }
    }
}

impl TryFrom<ReportQuery> for ReportFilter {
    type Error = AppError;

    fn try_from(q: ReportQuery) -> Result<Self, Self::Error> {
        let text = |v: &Option<String>| non_blank(v.as_deref()).map(str::to_string);
        Ok(ReportFilter {
            date_from: non_blank(q.date_from.as_deref()).map(parse_date).transpose()?,
            date_to: non_blank(q.date_to.as_deref()).map(parse_date).transpose()?,
            r#type: text(&q.r#type),
            money_type: non_blank(q.money_type.as_deref())
                .map(|s| s.parse::<MoneyType>().map_err(AppError::InvalidInput))
                .transpose()?,
            cheque_no: text(&q.cheque_no),
            slip_no: text(&q.slip_no),
            amount_from: non_blank(q.amount_from.as_deref()).map(parse_decimal).transpose()?,
            amount_to: non_blank(q.amount_to.as_deref()).map(parse_decimal).transpose()?,
            position: text(&q.position),
            tag: text(&q.tag),
        })
    }
}
