// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use trustbook::error::AppError;
use trustbook::filter::{ReportFilter, ReportQuery};
use trustbook::members;
use trustbook::models::{MemberPatch, Money, MoneyType, NewMember};

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    trustbook::db::init_schema(&mut conn).unwrap();
    conn
}

fn member(name: &str, joined: (i32, u32, u32), kind: &str, paid: Option<&str>) -> NewMember {
    NewMember {
        name: name.into(),
        phone: None,
        address: None,
        date: NaiveDate::from_ymd_opt(joined.0, joined.1, joined.2)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap(),
        r#type: Some(kind.into()),
        position: None,
        tag: None,
        money: paid.map(|a| Money {
            amount: a.parse().unwrap(),
            r#type: MoneyType::Cash,
            cheque_no: None,
        }),
        slip_no: None,
        note: None,
    }
}

fn names(found: &[trustbook::models::Member]) -> Vec<&str> {
    found.iter().map(|m| m.name.as_str()).collect()
}

#[test]
fn insert_get_update_delete() {
    let conn = setup();
    let m = members::insert(&conn, &member("Lakshmi", (2023, 1, 5), "life", Some("5001"))).unwrap();
    assert_eq!(members::get(&conn, m.id).unwrap().money.unwrap().amount, Decimal::from(5001));

    let updated = members::update(
        &conn,
        m.id,
        MemberPatch {
            position: Some("treasurer".into()),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(updated.position.as_deref(), Some("treasurer"));
    assert_eq!(updated.r#type.as_deref(), Some("life"));

    let gone = members::delete(&conn, m.id).unwrap();
    assert_eq!(gone.name, "Lakshmi");
    assert!(matches!(members::get(&conn, m.id), Err(AppError::NoRecordWithId)));
    assert!(matches!(members::delete(&conn, m.id), Err(AppError::NoRecordWithId)));
}

#[test]
fn name_is_required() {
    let conn = setup();
    let err = members::insert(&conn, &member("  ", (2023, 1, 5), "life", None)).unwrap_err();
    assert!(matches!(err, AppError::MissingRequiredInput));

    let m = members::insert(&conn, &member("Gopal", (2023, 1, 5), "life", None)).unwrap();
    let blank = members::update(
        &conn,
        m.id,
        MemberPatch {
            name: Some("".into()),
            ..Default::default()
        },
    );
    assert!(matches!(blank, Err(AppError::MissingRequiredInput)));
}

#[test]
fn report_filter_applies_to_members() {
    let conn = setup();
    members::insert(&conn, &member("Gopal", (2022, 3, 31), "life", Some("1000"))).unwrap();
    members::insert(&conn, &member("Meera", (2023, 4, 1), "annual", Some("250"))).unwrap();
    members::insert(&conn, &member("Anand", (2023, 6, 1), "annual", None)).unwrap();

    let all = members::find(&conn, &ReportFilter::default()).unwrap();
    assert_eq!(names(&all), vec!["Anand", "Meera", "Gopal"]);

    let annual = ReportFilter::try_from(ReportQuery {
        r#type: Some("annual".into()),
        ..Default::default()
    })
    .unwrap();
    assert_eq!(names(&members::find(&conn, &annual).unwrap()), vec!["Anand", "Meera"]);

    let paying = ReportFilter::try_from(ReportQuery {
        amount_from: Some("100".into()),
        amount_to: Some("1000".into()),
        ..Default::default()
    })
    .unwrap();
    assert_eq!(names(&members::find(&conn, &paying).unwrap()), vec!["Meera"]);

    let joined_fy = ReportFilter::try_from(ReportQuery {
        date_from: Some("2023-04-01".into()),
        date_to: Some("2024-03-31".into()),
        ..Default::default()
    })
    .unwrap();
    assert_eq!(names(&members::find(&conn, &joined_fy).unwrap()), vec!["Anand", "Meera"]);
}
