// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Trustbook", "trustbook"));

pub fn data_dir() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.to_path_buf())
}

pub fn default_db_path() -> Result<PathBuf> {
    Ok(data_dir()?.join("trustbook.sqlite"))
}

/// Opens the database at `path`, creating the schema on first use.
pub fn open_or_init(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Create DB dir {}", parent.display()))?;
        }
    }
    let mut conn =
        Connection::open(path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&mut conn)?;
    Ok(conn)
}

/// Opens an existing database without touching the schema. Used per request.
pub fn open(path: &Path) -> rusqlite::Result<Connection> {
    let conn = Connection::open(path)?;
    conn.busy_timeout(Duration::from_secs(5))?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    Ok(conn)
}

pub fn init_schema(conn: &mut Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS incomes(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        amount TEXT NOT NULL,
        money_type TEXT NOT NULL,
        cheque_no TEXT,
        type TEXT NOT NULL,
        slip_no TEXT,
        position TEXT,
        tag TEXT,
        note TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX IF NOT EXISTS idx_incomes_date ON incomes(date);

    CREATE TABLE IF NOT EXISTS expenses(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        amount TEXT NOT NULL,
        money_type TEXT NOT NULL,
        cheque_no TEXT,
        type TEXT NOT NULL,
        slip_no TEXT,
        position TEXT,
        tag TEXT,
        note TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses(date);

    -- money columns are nullable: not every employee carries a salary entry
    CREATE TABLE IF NOT EXISTS employees(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        phone TEXT,
        address TEXT,
        date TEXT NOT NULL,
        type TEXT,
        position TEXT,
        tag TEXT,
        amount TEXT,
        money_type TEXT,
        cheque_no TEXT,
        slip_no TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS members(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        phone TEXT,
        address TEXT,
        date TEXT NOT NULL,
        type TEXT,
        position TEXT,
        tag TEXT,
        amount TEXT,
        money_type TEXT,
        cheque_no TEXT,
        slip_no TEXT,
        note TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX IF NOT EXISTS idx_members_date ON members(date);

    -- singleton row, id is pinned to 1
    CREATE TABLE IF NOT EXISTS variables(
        id INTEGER PRIMARY KEY CHECK(id = 1),
        name TEXT,
        phone TEXT,
        pin_hash TEXT NOT NULL,
        otp TEXT,
        otp_issued_at TEXT
    );
    "#,
    )?;
    Ok(())
}
