// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDateTime;
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;

use crate::error::{AppError, AppResult};
use crate::filter::ReportFilter;
use crate::models::{FinancialRecord, Ledger, Money, NewRecord, RecordPatch, UpdatedRecord};

const COLUMNS: &str = "id, date, amount, money_type, cheque_no, type, slip_no, position, tag, note";

pub(crate) fn decimal_col(row: &Row, idx: usize) -> rusqlite::Result<Decimal> {
    let s: String = row.get(idx)?;
    s.parse::<Decimal>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

pub(crate) fn money_type_col(row: &Row, idx: usize) -> rusqlite::Result<crate::models::MoneyType> {
    let s: String = row.get(idx)?;
    s.parse().map_err(|e: String| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, e.into())
    })
}

/// Nullable `amount, money_type, cheque_no` columns starting at `idx`.
pub(crate) fn optional_money(row: &Row, idx: usize) -> rusqlite::Result<Option<Money>> {
    let amount: Option<String> = row.get(idx)?;
    if amount.is_none() {
        return Ok(None);
    }
    Ok(Some(Money {
        amount: decimal_col(row, idx)?,
        r#type: money_type_col(row, idx + 1)?,
        cheque_no: row.get(idx + 2)?,
    }))
}

fn from_row(r: &Row) -> rusqlite::Result<FinancialRecord> {
    Ok(FinancialRecord {
        id: r.get(0)?,
        date: r.get(1)?,
        money: Money {
            amount: decimal_col(r, 2)?,
            r#type: money_type_col(r, 3)?,
            cheque_no: r.get(4)?,
        },
        r#type: r.get(5)?,
        slip_no: r.get(6)?,
        position: r.get(7)?,
        tag: r.get(8)?,
        note: r.get(9)?,
    })
}

pub fn insert(conn: &Connection, ledger: Ledger, rec: &NewRecord) -> AppResult<FinancialRecord> {
    if rec.r#type.trim().is_empty() {
        return Err(AppError::MissingRequiredInput);
    }
    conn.execute(
        &format!(
            "INSERT INTO {}(date, amount, money_type, cheque_no, type, slip_no, position, tag, note)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            ledger.table()
        ),
        params![
            rec.date,
            rec.money.amount.to_string(),
            rec.money.r#type.as_str(),
            rec.money.cheque_no,
            rec.r#type,
            rec.slip_no,
            rec.position,
            rec.tag,
            rec.note
        ],
    )?;
    let id = conn.last_insert_rowid();
    tracing::info!(%ledger, id, amount = %rec.money.amount, "record created");
    get(conn, ledger, id)
}

pub fn get(conn: &Connection, ledger: Ledger, id: i64) -> AppResult<FinancialRecord> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM {} WHERE id=?1", ledger.table()),
        params![id],
        from_row,
    )
    .optional()?
    .ok_or(AppError::NoRecordWithId)
}

/// Applies `patch` and returns the new record with the amount it replaced.
pub fn update(
    conn: &Connection,
    ledger: Ledger,
    id: i64,
    patch: RecordPatch,
) -> AppResult<UpdatedRecord> {
    let current = get(conn, ledger, id)?;
    let old_amount = current.money.amount;
    let money = patch.money.unwrap_or(current.money);
    let merged = NewRecord {
        date: patch.date.unwrap_or(current.date),
        money,
        r#type: patch.r#type.unwrap_or(current.r#type),
        slip_no: patch.slip_no.or(current.slip_no),
        position: patch.position.or(current.position),
        tag: patch.tag.or(current.tag),
        note: patch.note.or(current.note),
    };
    conn.execute(
        &format!(
            "UPDATE {} SET date=?1, amount=?2, money_type=?3, cheque_no=?4, type=?5,
             slip_no=?6, position=?7, tag=?8, note=?9 WHERE id=?10",
            ledger.table()
        ),
        params![
            merged.date,
            merged.money.amount.to_string(),
            merged.money.r#type.as_str(),
            merged.money.cheque_no,
            merged.r#type,
            merged.slip_no,
            merged.position,
            merged.tag,
            merged.note,
            id
        ],
    )?;
    Ok(UpdatedRecord {
        record: get(conn, ledger, id)?,
        old_amount,
    })
}

pub fn delete(conn: &Connection, ledger: Ledger, id: i64) -> AppResult<FinancialRecord> {
    let existing = get(conn, ledger, id)?;
    conn.execute(
        &format!("DELETE FROM {} WHERE id=?1", ledger.table()),
        params![id],
    )?;
    tracing::info!(%ledger, id, "record deleted");
    Ok(existing)
}

/// Filtered listing, newest insertion first.
pub fn find(conn: &Connection, ledger: Ledger, filter: &ReportFilter) -> AppResult<Vec<FinancialRecord>> {
    let (clause, values) = filter.where_clause();
    let sql = format!(
        "SELECT {COLUMNS} FROM {} WHERE {clause} ORDER BY id DESC",
        ledger.table()
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(rusqlite::params_from_iter(values), from_row)?;
    let mut out = Vec::new();
    for row in rows {
        let rec = row?;
        if filter.admits_amount(Some(rec.money.amount)) {
            out.push(rec);
        }
    }
    Ok(out)
}

/// Records dated in `[from, to)`.
pub fn in_range(
    conn: &Connection,
    ledger: Ledger,
    from: NaiveDateTime,
    to: NaiveDateTime,
) -> AppResult<Vec<FinancialRecord>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM {} WHERE date >= ?1 AND date < ?2 ORDER BY date",
        ledger.table()
    ))?;
    let rows = stmt.query_map(params![from, to], from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}
