// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::cli::report_query;
use crate::filter::ReportFilter;
use crate::ledger;
use crate::models::{FinancialRecord, Ledger, Money, MoneyType, NewRecord};
use crate::utils::{maybe_print_json, parse_datetime, parse_decimal, pretty_table, write_csv};

const HEADERS: [&str; 9] = [
    "ID", "Date", "Type", "Amount", "Money", "Cheque", "Slip", "Position", "Tag",
];

pub fn handle(conn: &Connection, kind: Ledger, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, kind, sub)?,
        Some(("list", sub)) => list(conn, kind, sub)?,
        Some(("delete", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let rec = ledger::delete(conn, kind, id)?;
            println!("Deleted {} #{} ({} {})", kind, rec.id, rec.r#type, rec.money.amount);
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, kind: Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let opt = |id: &str| sub.get_one::<String>(id).cloned();
    let money_type: MoneyType = sub
        .get_one::<String>("money-type")
        .unwrap()
        .parse()
        .map_err(anyhow::Error::msg)?;
    let rec = NewRecord {
        date: parse_datetime(sub.get_one::<String>("date").unwrap())?,
        money: Money {
            amount: parse_decimal(sub.get_one::<String>("amount").unwrap())?,
            r#type: money_type,
            cheque_no: opt("cheque-no"),
        },
        r#type: sub.get_one::<String>("type").unwrap().trim().to_string(),
        slip_no: opt("slip-no"),
        position: opt("position"),
        tag: opt("tag"),
        note: opt("note"),
    };
    let saved = ledger::insert(conn, kind, &rec)?;
    println!(
        "Recorded {} #{}: {} {} on {}",
        kind, saved.id, saved.r#type, saved.money.amount, saved.date
    );
    Ok(())
}

pub fn rows(records: &[FinancialRecord]) -> Vec<Vec<String>> {
    records
        .iter()
        .map(|r| {
            vec![
                r.id.to_string(),
                r.date.format("%Y-%m-%d %H:%M").to_string(),
                r.r#type.clone(),
                format!("{:.2}", r.money.amount),
                r.money.r#type.as_str().to_string(),
                r.money.cheque_no.clone().unwrap_or_default(),
                r.slip_no.clone().unwrap_or_default(),
                r.position.clone().unwrap_or_default(),
                r.tag.clone().unwrap_or_default(),
            ]
        })
        .collect()
}

fn list(conn: &Connection, kind: Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let filter = ReportFilter::try_from(report_query(sub))?;
    let records = ledger::find(conn, kind, &filter)?;
    let data = rows(&records);
    if let Some(path) = sub.get_one::<String>("csv") {
        write_csv(path, &HEADERS, &data)?;
        eprintln!("Wrote {} rows to {}", data.len(), path);
    }
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &records)? {
        println!("{}", pretty_table(&HEADERS, data));
    }
    Ok(())
}
