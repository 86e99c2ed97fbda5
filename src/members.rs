// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::error::{AppError, AppResult};
use crate::filter::ReportFilter;
use crate::ledger::optional_money;
use crate::models::{Member, MemberPatch, NewMember};

const COLUMNS: &str = "id, name, phone, address, date, type, position, tag, amount, money_type, cheque_no, slip_no, note";

fn from_row(r: &Row) -> rusqlite::Result<Member> {
    Ok(Member {
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
        note: r.get(12)?,
    })
}

pub fn insert(conn: &Connection, m: &NewMember) -> AppResult<Member> {
    if m.name.trim().is_empty() {
        return Err(AppError::MissingRequiredInput);
    }
    conn.execute(
        "INSERT INTO members(name, phone, address, date, type, position, tag, amount, money_type, cheque_no, slip_no, note)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            m.name.trim(),
            m.phone,
            m.address,
            m.date,
            m.r#type,
            m.position,
            m.tag,
            m.money.as_ref().map(|x| x.amount.to_string()),
            m.money.as_ref().map(|x| x.r#type.as_str()),
            m.money.as_ref().and_then(|x| x.cheque_no.clone()),
            m.slip_no,
            m.note
        ],
    )?;
    let id = conn.last_insert_rowid();
    tracing::info!(id, "member added");
    get(conn, id)
}

pub fn get(conn: &Connection, id: i64) -> AppResult<Member> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM members WHERE id=?1"),
        params![id],
        from_row,
    )
    .optional()?
    .ok_or(AppError::NoRecordWithId)
}

pub fn update(conn: &Connection, id: i64, patch: MemberPatch) -> AppResult<Member> {
    let cur = get(conn, id)?;
    let name = patch.name.unwrap_or(cur.name);
    if name.trim().is_empty() {
        return Err(AppError::MissingRequiredInput);
    }
    let money = patch.money.or(cur.money);
    conn.execute(
        "UPDATE members SET name=?1, phone=?2, address=?3, date=?4, type=?5, position=?6,
         tag=?7, amount=?8, money_type=?9, cheque_no=?10, slip_no=?11, note=?12 WHERE id=?13",
        params![
            name.trim(),
            patch.phone.or(cur.phone),
            patch.address.or(cur.address),
            patch.date.unwrap_or(cur.date),
            patch.r#type.or(cur.r#type),
            patch.position.or(cur.position),
            patch.tag.or(cur.tag),
            money.as_ref().map(|x| x.amount.to_string()),
            money.as_ref().map(|x| x.r#type.as_str()),
            money.as_ref().and_then(|x| x.cheque_no.clone()),
            patch.slip_no.or(cur.slip_no),
            patch.note.or(cur.note),
            id
        ],
    )?;
    get(conn, id)
}

pub fn delete(conn: &Connection, id: i64) -> AppResult<Member> {
    let existing = get(conn, id)?;
    conn.execute("DELETE FROM members WHERE id=?1", params![id])?;
    tracing::info!(id, "member removed");
    Ok(existing)
}

/// Filtered listing, newest first. Members without a contribution drop out
/// as soon as an amount bound is given.
pub fn find(conn: &Connection, filter: &ReportFilter) -> AppResult<Vec<Member>> {
    let (clause, values) = filter.where_clause();
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM members WHERE {clause} ORDER BY id DESC"
    ))?;
    let rows = stmt.query_map(rusqlite::params_from_iter(values), from_row)?;
    let mut out = Vec::new();
    for row in rows {
        let m = row?;
        if filter.admits_amount(m.money.as_ref().map(|x| x.amount)) {
            out.push(m);
        }
    }
    Ok(out)
}
