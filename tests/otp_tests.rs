// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Duration as ChronoDuration, Utc};
use rusqlite::Connection;
use std::sync::Mutex;
use std::time::Duration;
use trustbook::admin::{AdminService, InitInput, ResetPinInput, UpdateInfoInput, VariablesRepository};
use trustbook::error::AppError;
use trustbook::models::IssuedOtp;
use trustbook::sms::{ContentType, Delivery, Notifier};

#[derive(Clone, Copy)]
enum Outcome {
    Deliver,
    NoCredit,
    Fail,
}

struct FakeNotifier {
    outcome: Outcome,
    sent: Mutex<Vec<(String, String, ContentType)>>,
}

impl FakeNotifier {
    fn new(outcome: Outcome) -> Self {
        Self {
            outcome,
            sent: Mutex::new(Vec::new()),
        }
    }

    fn last_otp(&self) -> String {
        let sent = self.sent.lock().unwrap();
        let (_, message, _) = sent.last().expect("no message sent");
        message.rsplit(' ').next().unwrap().to_string()
    }
}

impl Notifier for FakeNotifier {
    fn send(&self, phone: &str, message: &str, content: ContentType) -> Delivery {
        self.sent
            .lock()
            .unwrap()
            .push((phone.to_string(), message.to_string(), content));
        match self.outcome {
            Outcome::Deliver => Delivery::Delivered,
            Outcome::NoCredit => Delivery::InsufficientCredit,
            Outcome::Fail => Delivery::TransportError("gateway unreachable".into()),
        }
    }
}

const TTL: Duration = Duration::from_secs(600);

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    trustbook::db::init_schema(&mut conn).unwrap();
    conn
}

fn init(svc: &AdminService) {
    svc.init_variables(InitInput {
        name: Some("Village Trust".into()),
        pin: Some("1234".into()),
        phone: Some("+91 98765-43210".into()),
    })
    .unwrap();
}

#[test]
fn init_validates_and_runs_once() {
    let conn = setup();
    let fake = FakeNotifier::new(Outcome::Deliver);
    let svc = AdminService::new(&conn, &fake, TTL);

    let no_pin = svc.init_variables(InitInput {
        phone: Some("9876543210".into()),
        ..Default::default()
    });
    assert!(matches!(no_pin, Err(AppError::MissingPin)));
    let no_phone = svc.init_variables(InitInput {
        pin: Some("1234".into()),
        ..Default::default()
    });
    assert!(matches!(no_phone, Err(AppError::MissingRequiredInput)));
    assert!(matches!(svc.get_variables(), Err(AppError::NotInitialized)));

    init(&svc);
    let vars = svc.get_variables().unwrap();
    assert!(vars.initialized);
    assert_eq!(vars.phone.as_deref(), Some("+919876543210"));
    assert!(!vars.otp_pending);

    let again = svc.init_variables(InitInput {
        pin: Some("9999".into()),
        phone: Some("9876543210".into()),
        ..Default::default()
    });
    assert!(matches!(again, Err(AppError::AlreadyInitialized)));
    svc.verify_pin(Some("1234")).unwrap();
}

#[test]
fn request_without_phone_is_refused() {
    let conn = setup();
    let fake = FakeNotifier::new(Outcome::Deliver);
    let svc = AdminService::new(&conn, &fake, TTL);
    assert!(matches!(svc.request_otp(), Err(AppError::PhoneNotConfigured)));
    assert!(fake.sent.lock().unwrap().is_empty());
}

#[test]
fn otp_flow_resets_pin_and_consumes_otp() {
    let conn = setup();
    let fake = FakeNotifier::new(Outcome::Deliver);
    let svc = AdminService::new(&conn, &fake, TTL);
    init(&svc);

    svc.request_otp().unwrap();
    {
        let sent = fake.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "+919876543210");
        assert!(sent[0].1.starts_with("Your software PIN reset OTP is "));
        assert_eq!(sent[0].2, ContentType::English);
    }
    let otp = fake.last_otp();
    assert_eq!(otp.len(), 6);
    assert!(svc.get_variables().unwrap().otp_pending);

    svc.validate_otp(&otp).unwrap();
    svc.validate_otp(&otp).unwrap();

    svc.reset_pin(ResetPinInput {
        otp: Some(otp.clone()),
        pin: Some("4321".into()),
    })
    .unwrap();

    assert!(matches!(svc.validate_otp(&otp), Err(AppError::NoPendingOtpRequest)));
    svc.verify_pin(Some("4321")).unwrap();
    assert!(matches!(svc.verify_pin(Some("1234")), Err(AppError::PinMismatch)));
    assert!(matches!(svc.verify_pin(None), Err(AppError::MissingPin)));
}

#[test]
fn newer_otp_supersedes_older_one() {
    let conn = setup();
    let fake = FakeNotifier::new(Outcome::Deliver);
    let svc = AdminService::new(&conn, &fake, TTL);
    init(&svc);

    VariablesRepository::new(&conn)
        .store_otp(&IssuedOtp {
            value: "111111".into(),
            issued_at: Utc::now(),
        })
        .unwrap();
    svc.validate_otp("111111").unwrap();

    svc.request_otp().unwrap();
    let fresh = fake.last_otp();
    if fresh != "111111" {
        assert!(matches!(svc.validate_otp("111111"), Err(AppError::OtpMismatch)));
    }
    svc.validate_otp(&fresh).unwrap();
}

#[test]
fn reset_needs_an_outstanding_matching_otp() {
    let conn = setup();
    let fake = FakeNotifier::new(Outcome::Deliver);
    let svc = AdminService::new(&conn, &fake, TTL);

    let before_init = svc.reset_pin(ResetPinInput {
        otp: Some("123456".into()),
        pin: Some("0000".into()),
    });
    assert!(matches!(before_init, Err(AppError::NoPendingOtpRequest)));

    init(&svc);
    let missing = svc.reset_pin(ResetPinInput {
        otp: None,
        pin: Some("0000".into()),
    });
    assert!(matches!(missing, Err(AppError::MissingRequiredInput)));

    let none_pending = svc.reset_pin(ResetPinInput {
        otp: Some("123456".into()),
        pin: Some("0000".into()),
    });
    assert!(matches!(none_pending, Err(AppError::NoPendingOtpRequest)));

    VariablesRepository::new(&conn)
        .store_otp(&IssuedOtp {
            value: "222222".into(),
            issued_at: Utc::now(),
        })
        .unwrap();
    let wrong = svc.reset_pin(ResetPinInput {
        otp: Some("333333".into()),
        pin: Some("0000".into()),
    });
    assert!(matches!(wrong, Err(AppError::OtpMismatch)));
    assert!(svc.get_variables().unwrap().otp_pending);
    svc.verify_pin(Some("1234")).unwrap();
}

#[test]
fn insufficient_credit_leaves_no_otp_outstanding() {
    let conn = setup();
    let fake = FakeNotifier::new(Outcome::NoCredit);
    let svc = AdminService::new(&conn, &fake, TTL);
    init(&svc);

    assert!(matches!(svc.request_otp(), Err(AppError::InsufficientNotificationCredit)));
    let sent_otp = fake.last_otp();
    assert!(!svc.get_variables().unwrap().otp_pending);
    assert!(matches!(svc.validate_otp(&sent_otp), Err(AppError::NoPendingOtpRequest)));
}

#[test]
fn transport_failure_propagates() {
    let conn = setup();
    let fake = FakeNotifier::new(Outcome::Fail);
    let svc = AdminService::new(&conn, &fake, TTL);
    init(&svc);

    let err = svc.request_otp().unwrap_err();
    assert!(matches!(err, AppError::Transport(_)));
    assert!(VariablesRepository::new(&conn)
        .load()
        .unwrap()
        .unwrap()
        .current_otp
        .is_none());
}

#[test]
fn expired_otp_is_discarded() {
    let conn = setup();
    let fake = FakeNotifier::new(Outcome::Deliver);
    let svc = AdminService::new(&conn, &fake, Duration::from_secs(60));
    init(&svc);

    let repo = VariablesRepository::new(&conn);
    repo.store_otp(&IssuedOtp {
        value: "444444".into(),
        issued_at: Utc::now() - ChronoDuration::minutes(5),
    })
    .unwrap();
    assert!(!svc.get_variables().unwrap().otp_pending);
    assert!(matches!(svc.validate_otp("444444"), Err(AppError::NoPendingOtpRequest)));
    assert!(repo.load().unwrap().unwrap().current_otp.is_none());
}

#[test]
fn trust_info_update_needs_a_field() {
    let conn = setup();
    let fake = FakeNotifier::new(Outcome::Deliver);
    let svc = AdminService::new(&conn, &fake, TTL);

    let nothing = svc.update_trust_info(UpdateInfoInput::default());
    assert!(matches!(nothing, Err(AppError::MissingRequiredInput)));
    let uninitialized = svc.update_trust_info(UpdateInfoInput {
        name: Some("New name".into()),
        phone: None,
    });
    assert!(matches!(uninitialized, Err(AppError::NotInitialized)));

    init(&svc);
    let vars = svc
        .update_trust_info(UpdateInfoInput {
            name: Some("Renamed Trust".into()),
            phone: None,
        })
        .unwrap();
    assert_eq!(vars.name.as_deref(), Some("Renamed Trust"));
    assert_eq!(vars.phone.as_deref(), Some("+919876543210"));

    let bad_phone = svc.update_trust_info(UpdateInfoInput {
        name: None,
        phone: Some("12ab".into()),
    });
    assert!(matches!(bad_phone, Err(AppError::InvalidInput(_))));
}
