// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Connection;
use trustbook::error::AppError;
use trustbook::filter::{Predicate, ReportFilter, ReportQuery};
use trustbook::ledger;
use trustbook::models::{FinancialRecord, Ledger, Money, MoneyType, NewRecord};

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    trustbook::db::init_schema(&mut conn).unwrap();
    conn
}

fn at(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
}

fn add(conn: &Connection, date: &str, amount: &str, money_type: MoneyType, kind: &str) -> FinancialRecord {
    let rec = NewRecord {
        date: at(date),
        money: Money {
            amount: amount.parse().unwrap(),
            r#type: money_type,
            cheque_no: None,
        },
        r#type: kind.into(),
        slip_no: None,
        position: None,
        tag: None,
        note: None,
    };
    ledger::insert(conn, Ledger::Income, &rec).unwrap()
}

fn amounts(records: &[FinancialRecord]) -> Vec<String> {
    records.iter().map(|r| r.money.amount.to_string()).collect()
}

#[test]
fn amount_range_includes_lower_and_excludes_upper() {
    let conn = setup();
    for a in ["9", "10", "15", "20"] {
        add(&conn, "2024-05-01 09:00:00", a, MoneyType::Cash, "Donation");
    }
    let filter = ReportFilter {
        amount_from: Some("10".parse().unwrap()),
        amount_to: Some("20".parse().unwrap()),
        ..Default::default()
    };
    let found = ledger::find(&conn, Ledger::Income, &filter).unwrap();
    assert_eq!(amounts(&found), vec!["15", "10"]);
}

#[test]
fn date_to_cuts_off_at_end_of_day() {
    let conn = setup();
    add(&conn, "2024-03-30 12:00:00", "1", MoneyType::Cash, "A");
    add(&conn, "2024-03-31 10:00:00", "2", MoneyType::Cash, "A");
    add(&conn, "2024-03-31 23:59:59", "3", MoneyType::Cash, "A");
    add(&conn, "2024-04-01 00:00:00", "4", MoneyType::Cash, "A");

    let filter = ReportFilter {
        date_from: NaiveDate::from_ymd_opt(2024, 3, 31),
        date_to: NaiveDate::from_ymd_opt(2024, 3, 31),
        ..Default::default()
    };
    let found = ledger::find(&conn, Ledger::Income, &filter).unwrap();
    assert_eq!(amounts(&found), vec!["2"]);
}

#[test]
fn bounds_apply_independently() {
    let conn = setup();
    add(&conn, "2024-01-01 08:00:00", "5", MoneyType::Cash, "A");
    add(&conn, "2024-06-01 08:00:00", "50", MoneyType::Cash, "A");

    let only_from = ReportFilter {
        date_from: NaiveDate::from_ymd_opt(2024, 2, 1),
        ..Default::default()
    };
    assert_eq!(amounts(&ledger::find(&conn, Ledger::Income, &only_from).unwrap()), vec!["50"]);

    let only_to = ReportFilter {
        amount_to: Some("6".parse().unwrap()),
        ..Default::default()
    };
    assert_eq!(amounts(&ledger::find(&conn, Ledger::Income, &only_to).unwrap()), vec!["5"]);
}

#[test]
fn exact_fields_combine_with_and() {
    let conn = setup();
    add(&conn, "2024-05-01 09:00:00", "1", MoneyType::Cash, "Donation");
    add(&conn, "2024-05-01 09:00:00", "2", MoneyType::Online, "Donation");
    add(&conn, "2024-05-01 09:00:00", "3", MoneyType::Online, "Rent");

    let filter = ReportFilter {
        r#type: Some("Donation".into()),
        money_type: Some(MoneyType::Online),
        ..Default::default()
    };
    let found = ledger::find(&conn, Ledger::Income, &filter).unwrap();
    assert_eq!(amounts(&found), vec!["2"]);
}

#[test]
fn empty_filter_lists_everything_newest_first() {
    let conn = setup();
    add(&conn, "2024-05-01 09:00:00", "1", MoneyType::Cash, "A");
    add(&conn, "2023-05-01 09:00:00", "2", MoneyType::Cash, "A");
    add(&conn, "2025-05-01 09:00:00", "3", MoneyType::Cash, "A");

    let filter = ReportFilter::default();
    assert!(filter.predicates().is_empty());
    let found = ledger::find(&conn, Ledger::Income, &filter).unwrap();
    assert_eq!(amounts(&found), vec!["3", "2", "1"]);
    assert!(ledger::find(&conn, Ledger::Expense, &filter).unwrap().is_empty());
}

#[test]
fn blank_query_values_are_ignored() {
    let q = ReportQuery {
        date_from: Some("".into()),
        r#type: Some("   ".into()),
        amount_to: Some("".into()),
        tag: Some("gala".into()),
        ..Default::default()
    };
    let filter = ReportFilter::try_from(q).unwrap();
    assert_eq!(filter.date_from, None);
    assert_eq!(filter.r#type, None);
    assert_eq!(filter.amount_to, None);
    assert_eq!(filter.tag.as_deref(), Some("gala"));
    assert_eq!(filter.predicates().len(), 1);
}

#[test]
fn query_strings_are_parsed() {
    let q = ReportQuery {
        date_from: Some("2024-04-01".into()),
        money_type: Some("cheque".into()),
        amount_from: Some("10.50".into()),
        ..Default::default()
    };
    let filter = ReportFilter::try_from(q).unwrap();
    assert_eq!(filter.date_from, NaiveDate::from_ymd_opt(2024, 4, 1));
    assert_eq!(filter.money_type, Some(MoneyType::Cheque));
    let preds = filter.predicates();
    assert!(matches!(preds[0], Predicate::DateFrom(_)));
    assert!(matches!(preds.last(), Some(Predicate::AmountFrom(_))));
}

#[test]
fn malformed_query_values_are_rejected() {
    let bad_type = ReportQuery {
        money_type: Some("barter".into()),
        ..Default::default()
    };
    assert!(matches!(ReportFilter::try_from(bad_type), Err(AppError::InvalidInput(_))));

    let bad_date = ReportQuery {
        date_to: Some("31/03/2024".into()),
        ..Default::default()
    };
    assert!(matches!(ReportFilter::try_from(bad_date), Err(AppError::InvalidInput(_))));
}

#[test]
fn amount_bounds_compare_exact_decimals() {
    let conn = setup();
    add(&conn, "2024-05-01 09:00:00", "10.0000000000000001", MoneyType::Cash, "A");

    let below = ReportFilter {
        amount_to: Some("10.0000000000000002".parse().unwrap()),
        ..Default::default()
    };
    assert_eq!(
        amounts(&ledger::find(&conn, Ledger::Income, &below).unwrap()),
        vec!["10.0000000000000001"]
    );

    let above = ReportFilter {
        amount_from: Some("10.0000000000000002".parse().unwrap()),
        ..Default::default()
    };
    assert!(ledger::find(&conn, Ledger::Income, &above).unwrap().is_empty());

    let at_lower = ReportFilter {
        amount_from: Some("10.0000000000000001".parse().unwrap()),
        amount_to: Some("10.0000000000000001".parse().unwrap()),
        ..Default::default()
    };
    assert!(ledger::find(&conn, Ledger::Income, &at_lower).unwrap().is_empty());
}

#[test]
fn amount_bounds_stay_out_of_sql() {
    let filter = ReportFilter {
        tag: Some("gala".into()),
        amount_from: Some("1".parse().unwrap()),
        ..Default::default()
    };
    let (clause, params) = filter.where_clause();
    assert_eq!(clause, "tag = ?");
    assert_eq!(params.len(), 1);
    assert!(filter.admits_amount(Some("1".parse().unwrap())));
    assert!(!filter.admits_amount(Some("0.99".parse().unwrap())));
    assert!(!filter.admits_amount(None));
    assert!(ReportFilter::default().admits_amount(None));
}
