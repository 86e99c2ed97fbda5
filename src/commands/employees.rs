// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::cli::report_query;
use crate::documents::DocumentStore;
use crate::employees;
use crate::filter::ReportFilter;
use crate::utils::{maybe_print_json, pretty_table, write_csv};

const HEADERS: [&str; 7] = ["ID", "Name", "Phone", "Joined", "Position", "Tag", "Salary"];

pub fn handle(conn: &mut Connection, docs: &DocumentStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(conn, sub)?,
        Some(("delete", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let e = employees::delete(conn, docs, id)?;
            println!("Deleted employee #{} ({})", e.id, e.name);
        }
        _ => {}
    }
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let filter = ReportFilter::try_from(report_query(sub))?;
    let found = employees::find(conn, &filter)?;
    let data: Vec<Vec<String>> = found
        .iter()
        .map(|e| {
            vec![
                e.id.to_string(),
                e.name.clone(),
                e.phone.clone().unwrap_or_default(),
                e.date.format("%Y-%m-%d").to_string(),
                e.position.clone().unwrap_or_default(),
                e.tag.clone().unwrap_or_default(),
                e.money
                    .as_ref()
                    .map(|m| format!("{:.2}", m.amount))
                    .unwrap_or_default(),
            ]
        })
        .collect();
    if let Some(path) = sub.get_one::<String>("csv") {
        write_csv(path, &HEADERS, &data)?;
        eprintln!("Wrote {} rows to {}", data.len(), path);
    }
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &found)? {
        println!("{}", pretty_table(&HEADERS, data));
    }
    Ok(())
}
