// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::Connection;
use tempfile::tempdir;
use trustbook::documents::DocumentStore;
use trustbook::employees;
use trustbook::error::AppError;
use trustbook::filter::ReportFilter;
use trustbook::models::{EmployeePatch, Money, MoneyType, NewEmployee};

const DOC: &[u8] = b"\x89PNG\r\n\x1a\nfake-image";

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    trustbook::db::init_schema(&mut conn).unwrap();
    conn
}

fn employee(name: &str, position: &str) -> NewEmployee {
    NewEmployee {
        name: name.into(),
        phone: Some("9876543210".into()),
        address: Some("Temple Road".into()),
        date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap().and_hms_opt(0, 0, 0).unwrap(),
        r#type: Some("staff".into()),
        position: Some(position.into()),
        tag: None,
        money: Some(Money {
            amount: "15000".parse().unwrap(),
            r#type: MoneyType::Online,
            cheque_no: None,
        }),
        slip_no: None,
    }
}

fn count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM employees", [], |r| r.get(0)).unwrap()
}

#[test]
fn create_stores_row_and_document() {
    let mut conn = setup();
    let dir = tempdir().unwrap();
    let docs = DocumentStore::new(dir.path().join("docs"));

    let e = employees::create(&mut conn, &docs, &employee("Asha", "priest"), DOC).unwrap();
    assert_eq!(e.name, "Asha");
    assert_eq!(e.money.as_ref().unwrap().amount, "15000".parse::<rust_decimal::Decimal>().unwrap());
    assert!(docs.path_for(e.id).exists());
    assert_eq!(employees::download(&conn, &docs, e.id).unwrap(), DOC);
}

#[test]
fn create_requires_name_and_document() {
    let mut conn = setup();
    let dir = tempdir().unwrap();
    let docs = DocumentStore::new(dir.path());

    let no_doc = employees::create(&mut conn, &docs, &employee("Asha", "priest"), &[]);
    assert!(matches!(no_doc, Err(AppError::MissingRequiredInput)));
    let no_name = employees::create(&mut conn, &docs, &employee(" ", "priest"), DOC);
    assert!(matches!(no_name, Err(AppError::MissingRequiredInput)));
    assert_eq!(count(&conn), 0);
}

#[test]
fn failed_document_write_rolls_back_row() {
    let mut conn = setup();
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"file").unwrap();
    let docs = DocumentStore::new(blocker.join("docs"));

    let err = employees::create(&mut conn, &docs, &employee("Asha", "priest"), DOC).unwrap_err();
    assert!(matches!(err, AppError::ImageUploadFailed));
    assert_eq!(count(&conn), 0);
}

#[test]
fn delete_removes_document_and_tolerates_missing_one() {
    let mut conn = setup();
    let dir = tempdir().unwrap();
    let docs = DocumentStore::new(dir.path());

    let a = employees::create(&mut conn, &docs, &employee("Asha", "priest"), DOC).unwrap();
    let b = employees::create(&mut conn, &docs, &employee("Ravi", "cook"), DOC).unwrap();

    employees::delete(&mut conn, &docs, a.id).unwrap();
    assert!(!docs.path_for(a.id).exists());
    assert!(matches!(employees::get(&conn, a.id), Err(AppError::NoRecordWithId)));

    std::fs::remove_file(docs.path_for(b.id)).unwrap();
    let removed = employees::delete(&mut conn, &docs, b.id).unwrap();
    assert_eq!(removed.name, "Ravi");
    assert_eq!(count(&conn), 0);

    assert!(matches!(employees::delete(&mut conn, &docs, b.id), Err(AppError::NoRecordWithId)));
}

#[test]
fn download_reports_missing_document() {
    let mut conn = setup();
    let dir = tempdir().unwrap();
    let docs = DocumentStore::new(dir.path());

    let e = employees::create(&mut conn, &docs, &employee("Asha", "priest"), DOC).unwrap();
    std::fs::remove_file(docs.path_for(e.id)).unwrap();
    assert!(matches!(employees::download(&conn, &docs, e.id), Err(AppError::DocumentNotFound)));
    assert!(matches!(employees::download(&conn, &docs, 99), Err(AppError::NoRecordWithId)));
}

#[test]
fn update_and_filter() {
    let mut conn = setup();
    let dir = tempdir().unwrap();
    let docs = DocumentStore::new(dir.path());

    let a = employees::create(&mut conn, &docs, &employee("Asha", "priest"), DOC).unwrap();
    employees::create(&mut conn, &docs, &employee("Ravi", "cook"), DOC).unwrap();

    let updated = employees::update(
        &conn,
        a.id,
        EmployeePatch {
            tag: Some("senior".into()),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(updated.tag.as_deref(), Some("senior"));
    assert_eq!(updated.position.as_deref(), Some("priest"));

    let cooks = employees::find(
        &conn,
        &ReportFilter {
            position: Some("cook".into()),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(cooks.len(), 1);
    assert_eq!(cooks[0].name, "Ravi");

    let well_paid = employees::find(
        &conn,
        &ReportFilter {
            amount_from: Some("10000".parse().unwrap()),
            money_type: Some(MoneyType::Online),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(well_paid.len(), 2);
    assert_eq!(well_paid[0].name, "Ravi");
}

#[test]
fn delete_leaves_no_staged_files_behind() {
    let mut conn = setup();
    let dir = tempdir().unwrap();
    let docs = DocumentStore::new(dir.path());

    let a = employees::create(&mut conn, &docs, &employee("Asha", "priest"), DOC).unwrap();
    let b = employees::create(&mut conn, &docs, &employee("Ravi", "cook"), DOC).unwrap();
    employees::delete(&mut conn, &docs, a.id).unwrap();

    let left: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(left, vec![docs.path_for(b.id).file_name().unwrap().to_owned()]);
}

#[test]
fn staged_removal_can_be_undone() {
    let dir = tempdir().unwrap();
    let docs = DocumentStore::new(dir.path());
    docs.store(7, DOC).unwrap();

    let staged = docs.stage_removal(7).unwrap().unwrap();
    assert!(!docs.path_for(7).exists());
    assert!(staged.exists());

    docs.restore(7, &staged).unwrap();
    assert_eq!(docs.retrieve(7).unwrap(), DOC);

    let staged = docs.stage_removal(7).unwrap().unwrap();
    docs.purge(&staged).unwrap();
    assert!(!staged.exists());
    assert!(docs.stage_removal(7).unwrap().is_none());
}
