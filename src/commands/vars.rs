// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use std::time::Duration;

use crate::admin::{AdminService, InitInput, ResetPinInput, UpdateInfoInput};
use crate::models::PublicVariables;
use crate::sms::Notifier;
use crate::utils::{maybe_print_json, pretty_table};

pub fn handle(
    conn: &Connection,
    notifier: &dyn Notifier,
    otp_ttl: Duration,
    m: &clap::ArgMatches,
) -> Result<()> {
    let svc = AdminService::new(conn, notifier, otp_ttl);
    let opt = |sub: &clap::ArgMatches, id: &str| sub.get_one::<String>(id).cloned();
    match m.subcommand() {
        Some(("init", sub)) => {
            let vars = svc.init_variables(InitInput {
                name: opt(sub, "name"),
                pin: opt(sub, "pin"),
                phone: opt(sub, "phone"),
            })?;
            print_vars(&vars, false)?;
        }
        Some(("show", sub)) => print_vars(&svc.get_variables()?, sub.get_flag("json"))?,
        Some(("update", sub)) => {
            let vars = svc.update_trust_info(UpdateInfoInput {
                name: opt(sub, "name"),
                phone: opt(sub, "phone"),
            })?;
            print_vars(&vars, false)?;
        }
        Some(("request-otp", _)) => {
            svc.request_otp()?;
            println!("OTP sent to the configured phone");
        }
        Some(("validate-otp", sub)) => {
            svc.validate_otp(sub.get_one::<String>("otp").unwrap())?;
            println!("OTP is valid");
        }
        Some(("reset-pin", sub)) => {
            svc.reset_pin(ResetPinInput {
                otp: opt(sub, "otp"),
                pin: opt(sub, "pin"),
            })?;
            println!("PIN reset");
        }
        _ => {}
    }
    Ok(())
}

fn print_vars(vars: &PublicVariables, json: bool) -> Result<()> {
    if maybe_print_json(json, false, vars)? {
        return Ok(());
    }
    let rows = vec![
        vec!["name".into(), vars.name.clone().unwrap_or_default()],
        vec!["phone".into(), vars.phone.clone().unwrap_or_default()],
        vec!["otp pending".into(), vars.otp_pending.to_string()],
    ];
    println!("{}", pretty_table(&["Key", "Value"], rows));
    Ok(())
}
