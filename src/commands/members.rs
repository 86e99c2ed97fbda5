// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::cli::report_query;
use crate::filter::ReportFilter;
use crate::members;
use crate::models::{Member, Money, MoneyType, NewMember};
use crate::utils::{maybe_print_json, parse_datetime, parse_decimal, pretty_table, write_csv};

const HEADERS: [&str; 8] = ["ID", "Name", "Phone", "Joined", "Type", "Position", "Tag", "Paid"];

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("delete", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let gone = members::delete(conn, id)?;
            println!("Removed member #{} ({})", gone.id, gone.name);
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let opt = |id: &str| sub.get_one::<String>(id).cloned();
    let money = match sub.get_one::<String>("amount") {
        Some(a) => {
            let money_type: MoneyType = sub
                .get_one::<String>("money-type")
                .unwrap()
                .parse()
                .map_err(anyhow::Error::msg)?;
            Some(Money {
                amount: parse_decimal(a)?,
                r#type: money_type,
                cheque_no: opt("cheque-no"),
            })
        }
        None => None,
    };
    let input = NewMember {
        name: sub.get_one::<String>("name").unwrap().clone(),
        phone: opt("phone"),
        address: opt("address"),
        date: parse_datetime(sub.get_one::<String>("date").unwrap())?,
        r#type: opt("type"),
        position: opt("position"),
        tag: opt("tag"),
        money,
        slip_no: opt("slip-no"),
        note: opt("note"),
    };
    let saved = members::insert(conn, &input)?;
    println!("Added member #{} ({})", saved.id, saved.name);
    Ok(())
}

fn row(m: &Member) -> Vec<String> {
    vec![
        m.id.to_string(),
        m.name.clone(),
        m.phone.clone().unwrap_or_default(),
        m.date.format("%Y-%m-%d").to_string(),
        m.r#type.clone().unwrap_or_default(),
        m.position.clone().unwrap_or_default(),
        m.tag.clone().unwrap_or_default(),
        m.money
            .as_ref()
            .map(|x| format!("{:.2}", x.amount))
            .unwrap_or_default(),
    ]
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let filter = ReportFilter::try_from(report_query(sub))?;
    let found = members::find(conn, &filter)?;
    let data: Vec<Vec<String>> = found.iter().map(row).collect();
    if let Some(path) = sub.get_one::<String>("csv") {
        write_csv(path, &HEADERS, &data)?;
        eprintln!("Wrote {} rows to {}", data.len(), path);
    }
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &found)? {
        println!("{}", pretty_table(&HEADERS, data));
    }
    Ok(())
}
