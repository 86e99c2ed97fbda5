// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

use crate::error::AppError;

const UA: &str = concat!(
    "trustbook/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/alphavelocity/trustbook)"
);

static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+?[0-9]{10,15}$").unwrap());

pub fn http_client() -> Result<reqwest::blocking::Client, reqwest::Error> {
    reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(15))
        .user_agent(UA)
        .build()
}

pub fn parse_date(s: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::invalid(format!("Invalid date '{}', expected YYYY-MM-DD", s)))
}

/// Accepts `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS` and `YYYY-MM-DD HH:MM:SS`.
/// A bare date means midnight.
pub fn parse_datetime(s: &str) -> Result<NaiveDateTime, AppError> {
    let s = s.trim();
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_utc());
    }
    parse_date(s)
        .map(|d| d.and_time(NaiveTime::MIN))
        .map_err(|_| AppError::invalid(format!("Invalid date '{}'", s)))
}

pub fn parse_decimal(s: &str) -> Result<Decimal, AppError> {
    s.trim()
        .parse::<Decimal>()
        .map_err(|_| AppError::invalid(format!("Invalid decimal '{}'", s)))
}

pub fn parse_phone(s: &str) -> Result<String, AppError> {
    let cleaned: String = s.chars().filter(|c| !c.is_whitespace() && *c != '-').collect();
    if PHONE_RE.is_match(&cleaned) {
        Ok(cleaned)
    } else {
        Err(AppError::invalid(format!("Invalid phone number '{}'", s)))
    }
}

pub fn de_datetime<'de, D>(d: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(d)?;
    parse_datetime(&s).map_err(serde::de::Error::custom)
}

pub fn de_opt_datetime<'de, D>(d: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(d)? {
        Some(s) => parse_datetime(&s).map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// The inclusive-end adjustment used by report filters: `23:59:59` of `date`.
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(23, 59, 59)
        .unwrap_or_else(|| date.and_time(NaiveTime::MIN))
}

fn first_of(year: i32, month: u32) -> Result<NaiveDateTime, AppError> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.and_time(NaiveTime::MIN))
        .ok_or_else(|| AppError::invalid(format!("Invalid month {}-{:02}", year, month)))
}

/// `[Jan 1 year, Jan 1 year+1)`
pub fn calendar_year_range(year: i32) -> Result<(NaiveDateTime, NaiveDateTime), AppError> {
    Ok((first_of(year, 1)?, first_of(year + 1, 1)?))
}

/// `[Apr 1 year, Apr 1 year+1)`
pub fn fiscal_year_range(year: i32) -> Result<(NaiveDateTime, NaiveDateTime), AppError> {
    Ok((first_of(year, 4)?, first_of(year + 1, 4)?))
}

/// `[1st of month, 1st of the following month)`
pub fn month_range(year: i32, month: u32) -> Result<(NaiveDateTime, NaiveDateTime), AppError> {
    if !(1..=12).contains(&month) {
        return Err(AppError::invalid(format!("Invalid month number {}", month)));
    }
    let start = first_of(year, month)?;
    let end = if month == 12 {
        first_of(year + 1, 1)?
    } else {
        first_of(year, month + 1)?
    };
    Ok((start, end))
}

pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Empty and whitespace-only values count as absent.
pub fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|v| !v.is_empty())
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

pub fn write_csv(path: &str, headers: &[&str], rows: &[Vec<String>]) -> Result<()> {
    let mut wtr =
        csv::Writer::from_path(path).with_context(|| format!("Create CSV at {}", path))?;
    wtr.write_record(headers)?;
    for r in rows {
        wtr.write_record(r)?;
    }
    wtr.flush()?;
    Ok(())
}
