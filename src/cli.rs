// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version};

use crate::filter::ReportQuery;

fn output_args() -> [Arg; 3] {
    [
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
        Arg::new("csv")
            .long("csv")
            .value_name("FILE")
            .help("Also write the rows to a CSV file"),
    ]
}

fn filter_args() -> Vec<Arg> {
    let opt = |id: &'static str, long: &'static str, help: &'static str| {
        Arg::new(id).long(long).value_name("VALUE").help(help)
    };
    vec![
        opt("date-from", "from", "Earliest date, YYYY-MM-DD"),
        opt("date-to", "to", "Latest date (inclusive), YYYY-MM-DD"),
        opt("type", "type", "Category type"),
        opt("money-type", "money-type", "cash | cheque | online"),
        opt("cheque-no", "cheque-no", "Cheque number"),
        opt("slip-no", "slip-no", "Slip number"),
        opt("amount-from", "amount-from", "Minimum amount (inclusive)"),
        opt("amount-to", "amount-to", "Maximum amount (exclusive)"),
        opt("position", "position", "Position"),
        opt("tag", "tag", "Tag"),
    ]
}

pub fn report_query(m: &clap::ArgMatches) -> ReportQuery {
    let get = |id: &str| m.get_one::<String>(id).cloned();
    ReportQuery {
        date_from: get("date-from"),
        date_to: get("date-to"),
        r#type: get("type"),
        money_type: get("money-type"),
        cheque_no: get("cheque-no"),
        slip_no: get("slip-no"),
        amount_from: get("amount-from"),
        amount_to: get("amount-to"),
        position: get("position"),
        tag: get("tag"),
    }
}

fn id_arg() -> Arg {
    Arg::new("id")
        .long("id")
        .required(true)
        .value_parser(clap::value_parser!(i64))
}

fn ledger_cmd(name: &'static str, about: &'static str) -> Command {
    Command::new(name)
        .about(about)
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Record an entry")
                .arg(Arg::new("date").long("date").required(true).help("YYYY-MM-DD[THH:MM:SS]"))
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(Arg::new("type").long("type").required(true).help("Category type"))
                .arg(
                    Arg::new("money-type")
                        .long("money-type")
                        .default_value("cash")
                        .help("cash | cheque | online"),
                )
                .arg(Arg::new("cheque-no").long("cheque-no"))
                .arg(Arg::new("slip-no").long("slip-no"))
                .arg(Arg::new("position").long("position"))
                .arg(Arg::new("tag").long("tag"))
                .arg(Arg::new("note").long("note")),
        )
        .subcommand(
            Command::new("list")
                .about("Filtered listing, newest first")
                .args(filter_args())
                .args(output_args()),
        )
        .subcommand(Command::new("delete").about("Delete an entry").arg(id_arg()))
}

fn year_arg() -> Arg {
    Arg::new("year")
        .long("year")
        .help("Defaults to the current year")
}

pub fn build_cli() -> Command {
    Command::new("trustbook")
        .version(crate_version!())
        .about("Income, expense and employee bookkeeping with fiscal reports")
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(Command::new("serve").about("Run the HTTP API"))
        .subcommand(ledger_cmd("income", "Income entries"))
        .subcommand(ledger_cmd("expense", "Expense entries"))
        .subcommand(
            Command::new("employee")
                .about("Employee records")
                .subcommand_required(true)
                .subcommand(
                    Command::new("list")
                        .args(filter_args())
                        .args(output_args()),
                )
                .subcommand(
                    Command::new("delete")
                        .about("Delete an employee and its document")
                        .arg(id_arg()),
                ),
        )
        .subcommand(
            Command::new("member")
                .about("Trust members")
                .subcommand_required(true)
                .subcommand(
                    Command::new("add")
                        .about("Register a member")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("date").long("date").required(true).help("Joining date, YYYY-MM-DD"))
                        .arg(Arg::new("phone").long("phone"))
                        .arg(Arg::new("address").long("address"))
                        .arg(Arg::new("type").long("type").help("Membership type"))
                        .arg(Arg::new("position").long("position"))
                        .arg(Arg::new("tag").long("tag"))
                        .arg(Arg::new("amount").long("amount").help("Contribution paid on joining"))
                        .arg(
                            Arg::new("money-type")
                                .long("money-type")
                                .default_value("cash")
                                .help("cash | cheque | online"),
                        )
                        .arg(Arg::new("cheque-no").long("cheque-no"))
                        .arg(Arg::new("slip-no").long("slip-no"))
                        .arg(Arg::new("note").long("note")),
                )
                .subcommand(
                    Command::new("list")
                        .about("Filtered listing, newest first")
                        .args(filter_args())
                        .args(output_args()),
                )
                .subcommand(Command::new("delete").about("Remove a member").arg(id_arg())),
        )
        .subcommand(
            Command::new("report")
                .about("Financial reports")
                .subcommand_required(true)
                .subcommand(
                    Command::new("analytics")
                        .about("Monthly income/expense of the current year")
                        .args(output_args()),
                )
                .subcommand(
                    Command::new("money")
                        .about("Fiscal-year report, or per-type report of one month")
                        .arg(year_arg())
                        .arg(Arg::new("month").long("month").help("1-12"))
                        .args(output_args()),
                )
                .subcommand(
                    Command::new("calendar")
                        .about("January..December money report")
                        .arg(year_arg())
                        .args(output_args()),
                ),
        )
        .subcommand(
            Command::new("vars")
                .about("Administrative variables and PIN reset")
                .subcommand_required(true)
                .subcommand(
                    Command::new("init")
                        .arg(Arg::new("name").long("name"))
                        .arg(Arg::new("pin").long("pin"))
                        .arg(Arg::new("phone").long("phone")),
                )
                .subcommand(Command::new("show").arg(output_args()[0].clone()))
                .subcommand(
                    Command::new("update")
                        .arg(Arg::new("name").long("name"))
                        .arg(Arg::new("phone").long("phone")),
                )
                .subcommand(Command::new("request-otp").about("Text a PIN reset OTP"))
                .subcommand(
                    Command::new("validate-otp").arg(Arg::new("otp").long("otp").required(true)),
                )
                .subcommand(
                    Command::new("reset-pin")
                        .arg(Arg::new("otp").long("otp"))
                        .arg(Arg::new("pin").long("pin")),
                ),
        )
        .subcommand(
            Command::new("sms")
                .about("Send an SMS")
                .subcommand_required(true)
                .subcommand(
                    Command::new("send")
                        .arg(Arg::new("phone").long("phone").required(true))
                        .arg(Arg::new("message").long("message").required(true)),
                ),
        )
}
