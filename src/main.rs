// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use trustbook::config::Config;
use trustbook::documents::DocumentStore;
use trustbook::models::Ledger;
use trustbook::{api, cli, commands, db, logging, sms};

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    logging::init();

    let cli = cli::build_cli();
    let matches = cli.get_matches();
    let config = Config::from_env()?;

    if let Some(("serve", _)) = matches.subcommand() {
        let rt = tokio::runtime::Runtime::new()?;
        return rt.block_on(api::serve(config));
    }

    let mut conn = db::open_or_init(&config.db_path)?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", config.db_path.display());
        }
        Some(("income", sub)) => commands::ledger::handle(&conn, Ledger::Income, sub)?,
        Some(("expense", sub)) => commands::ledger::handle(&conn, Ledger::Expense, sub)?,
        Some(("employee", sub)) => {
            let docs = DocumentStore::new(config.docs_dir.clone());
            commands::employees::handle(&mut conn, &docs, sub)?
        }
        Some(("member", sub)) => commands::members::handle(&conn, sub)?,
        Some(("report", sub)) => commands::reports::handle(&conn, sub)?,
        Some(("vars", sub)) => {
            let notifier = sms::notifier_from_config(config.sms.clone());
            commands::vars::handle(&conn, notifier.as_ref(), config.otp_ttl, sub)?
        }
        Some(("sms", sub)) => {
            if let Some(("send", send)) = sub.subcommand() {
                let notifier = sms::notifier_from_config(config.sms.clone());
                sms::send_message(
                    notifier.as_ref(),
                    send.get_one::<String>("phone").unwrap(),
                    send.get_one::<String>("message").unwrap(),
                )?;
                println!("SMS sent");
            }
        }
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
