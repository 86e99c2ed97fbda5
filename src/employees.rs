// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Employee records and their attached document. A record and its document
//! live and die together.

use rusqlite::{Connection, OptionalExtension, Row, Transaction, params};
use std::io::ErrorKind;

use crate::documents::DocumentStore;
use crate::error::{AppError, AppResult};
use crate::filter::ReportFilter;
use crate::ledger::optional_money;
use crate::models::{Employee, EmployeePatch, NewEmployee};

const COLUMNS: &str =
    "id, name, phone, address, date, type, position, tag, amount, money_type, cheque_no, slip_no";

fn from_row(r: &Row) -> rusqlite::Result<Employee> {
    Ok(Employee {
        id: r.get(0)?,
        name: r.get(1)?,
        phone: r.get(2)?,
        address: r.get(3)?,
        date: r.get(4)?,
        r#type: r.get(5)?,
        position: r.get(6)?,
        tag: r.get(7)?,
        money: optional_money(r, 8)?,
        slip_no: r.get(11)?,
    })
}

fn insert_row(conn: &Connection, e: &NewEmployee) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO employees(name, phone, address, date, type, position, tag, amount, money_type, cheque_no, slip_no)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            e.name,
            e.phone,
            e.address,
            e.date,
            e.r#type,
            e.position,
            e.tag,
            e.money.as_ref().map(|m| m.amount.to_string()),
            e.money.as_ref().map(|m| m.r#type.as_str()),
            e.money.as_ref().and_then(|m| m.cheque_no.clone()),
            e.slip_no
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Inserts the employee and writes `document` in one transaction. If the
/// document cannot be written the row is rolled back; if the commit fails
/// the written document is removed again.
pub fn create(
    conn: &mut Connection,
    docs: &DocumentStore,
    input: &NewEmployee,
    document: &[u8],
) -> AppResult<Employee> {
    if input.name.trim().is_empty() || document.is_empty() {
        return Err(AppError::MissingRequiredInput);
    }
    let tx = conn.transaction()?;
    let id = insert_row(&tx, input)?;
    if let Err(e) = docs.store(id, document) {
        tracing::warn!(id, error = %e, dir = %docs.dir().display(), "employee document write failed");
        return Err(AppError::ImageUploadFailed);
    }
    match commit_created(tx, id) {
        Ok(employee) => {
            tracing::info!(id, "employee created");
            Ok(employee)
        }
        Err(e) => {
            if let Err(io) = docs.delete(id) {
                tracing::error!(id, error = %io, "orphaned employee document left behind");
            }
            Err(e)
        }
    }
}

fn commit_created(tx: Transaction<'_>, id: i64) -> AppResult<Employee> {
    let employee = get(&tx, id)?;
    tx.commit()?;
    Ok(employee)
}

pub fn get(conn: &Connection, id: i64) -> AppResult<Employee> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM employees WHERE id=?1"),
        params![id],
        from_row,
    )
    .optional()?
    .ok_or(AppError::NoRecordWithId)
}

pub fn update(conn: &Connection, id: i64, patch: EmployeePatch) -> AppResult<Employee> {
    let cur = get(conn, id)?;
    let merged = NewEmployee {
        name: patch.name.unwrap_or(cur.name),
        phone: patch.phone.or(cur.phone),
        address: patch.address.or(cur.address),
        date: patch.date.unwrap_or(cur.date),
        r#type: patch.r#type.or(cur.r#type),
        position: patch.position.or(cur.position),
        tag: patch.tag.or(cur.tag),
        money: patch.money.or(cur.money),
        slip_no: patch.slip_no.or(cur.slip_no),
    };
    conn.execute(
        "UPDATE employees SET name=?1, phone=?2, address=?3, date=?4, type=?5, position=?6,
         tag=?7, amount=?8, money_type=?9, cheque_no=?10, slip_no=?11 WHERE id=?12",
        params![
            merged.name,
            merged.phone,
            merged.address,
            merged.date,
            merged.r#type,
            merged.position,
            merged.tag,
            merged.money.as_ref().map(|m| m.amount.to_string()),
            merged.money.as_ref().map(|m| m.r#type.as_str()),
            merged.money.as_ref().and_then(|m| m.cheque_no.clone()),
            merged.slip_no,
            id
        ],
    )?;
    get(conn, id)
}

/// Removes the row and its document. The document is moved aside until the
/// row deletion commits and put back if it does not. A document that is
/// already gone is not an error.
pub fn delete(conn: &mut Connection, docs: &DocumentStore, id: i64) -> AppResult<Employee> {
    let tx = conn.transaction()?;
    let existing = get(&tx, id)?;
    tx.execute("DELETE FROM employees WHERE id=?1", params![id])?;
    let staged = docs.stage_removal(id)?;
    if staged.is_none() {
        tracing::warn!(id, "employee document already missing");
    }
    if let Err(e) = tx.commit() {
        if let Some(path) = &staged {
            if let Err(io) = docs.restore(id, path) {
                tracing::error!(id, error = %io, "could not restore employee document");
            }
        }
        return Err(e.into());
    }
    if let Some(path) = staged {
        if let Err(e) = docs.purge(&path) {
            tracing::warn!(id, error = %e, path = %path.display(), "staged document not removed");
        }
    }
    tracing::info!(id, "employee deleted");
    Ok(existing)
}

pub fn download(conn: &Connection, docs: &DocumentStore, id: i64) -> AppResult<Vec<u8>> {
    get(conn, id)?;
    docs.retrieve(id).map_err(|e| match e.kind() {
        ErrorKind::NotFound => AppError::DocumentNotFound,
        _ => AppError::Io(e),
    })
}

pub fn find(conn: &Connection, filter: &ReportFilter) -> AppResult<Vec<Employee>> {
    let (clause, values) = filter.where_clause();
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM employees WHERE {clause} ORDER BY id DESC"
    ))?;
    let rows = stmt.query_map(rusqlite::params_from_iter(values), from_row)?;
    let mut out = Vec::new();
    for row in rows {
        let e = row?;
        if filter.admits_amount(e.money.as_ref().map(|m| m.amount)) {
            out.push(e);
        }
    }
    Ok(out)
}
