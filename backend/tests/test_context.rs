//! Tests for the payment context builder
//!
//! Next-cycle derivation, passthrough fields, determinism and the
//! serialized shape consumed by scheduling UIs.

use payout_cycle_core_rs::{
    build_context, build_context_at, build_context_json, parse_records, CalendarConfig,
    CalendarDate, ConfigError, ContextError, DateValue, PaymentFrequency, PayoutRecord,
    PayoutRecords, StartRule,
};
use serde_json::json;

// ============================================================================
// Test Helpers
// ============================================================================

fn date(y: i32, m: u32, d: u32) -> CalendarDate {
    CalendarDate::from_ymd(y, m, d).unwrap()
}

fn records(entries: Vec<(&str, PayoutRecord)>) -> PayoutRecords {
    entries
        .into_iter()
        .map(|(key, record)| (key.to_string(), record))
        .collect()
}

fn monthly() -> CalendarConfig {
    CalendarConfig::new(PaymentFrequency::Monthly)
}

fn pending_march() -> PayoutRecord {
    PayoutRecord::pending()
        .with_cycle_start("2024-03-10")
        .with_scheduled_payment_date("2024-03-20")
}

// ============================================================================
// Defaults
// ============================================================================

#[test]
fn test_daily_without_records() {
    let config = CalendarConfig::new(PaymentFrequency::Daily);
    let context = build_context(&config, &PayoutRecords::new(), date(2024, 6, 1), true);

    assert_eq!(context.current_period.start(), date(2024, 6, 1));
    assert_eq!(context.current_period.end(), date(2024, 6, 1));
    assert_eq!(context.interval_days, 1);
    assert_eq!(context.next_cycle_start, date(2024, 6, 2));
    assert_eq!(context.next_cycle_end, date(2024, 6, 2));
    assert_eq!(context.next_period.period_key(), "2024-06-02");
}

#[test]
fn test_default_config_passthrough() {
    let context = build_context(
        &CalendarConfig::default(),
        &PayoutRecords::new(),
        date(2024, 3, 15),
        true,
    );

    assert_eq!(context.frequency, PaymentFrequency::Monthly);
    assert_eq!(context.anchor_day, None);
    assert_eq!(context.preferred_method, "transfer");
    assert_eq!(context.current_period.start(), date(2024, 3, 1));
    assert!(context.all_records.is_empty());
}

#[test]
fn test_configured_fields_passthrough() {
    let config = CalendarConfig::new(PaymentFrequency::Weekly)
        .with_payment_day(2)
        .with_payment_method("cash");
    let records = records(vec![("2024-03-01", PayoutRecord::paid())]);

    let context = build_context(&config, &records, date(2024, 3, 15), true);

    assert_eq!(context.anchor_day, Some(2));
    assert_eq!(context.preferred_method, "cash");
    assert_eq!(context.all_records, records);
}

// ============================================================================
// Next cycle derivation
// ============================================================================

#[test]
fn test_next_cycle_follows_current_end() {
    let records = records(vec![("2024-03-10", pending_march())]);

    let context = build_context(&monthly(), &records, date(2024, 3, 15), true);

    assert_eq!(context.current_period.start(), date(2024, 3, 10));
    assert_eq!(context.current_period.end(), date(2024, 3, 20));
    assert_eq!(context.interval_days, 11);
    assert_eq!(context.next_cycle_start, date(2024, 3, 21));
    assert_eq!(context.next_cycle_end, date(2024, 3, 31));
    assert_eq!(context.start_rule, Some(StartRule::PendingRecord));
}

#[test]
fn test_governing_next_cycle_fields_win() {
    let records = records(vec![(
        "2024-03-10",
        pending_march()
            .with_next_cycle_start("2024-03-22")
            .with_next_cycle_end("2024-04-30"),
    )]);

    let context = build_context(&monthly(), &records, date(2024, 3, 15), true);

    assert_eq!(context.next_cycle_start, date(2024, 3, 22));
    assert_eq!(context.next_cycle_end, date(2024, 4, 30));
    assert_eq!(context.next_period.label(), "Mar 22 - Apr 30, 2024");
}

#[test]
fn test_governing_next_cycle_end_before_start_is_ignored() {
    let records = records(vec![(
        "2024-03-10",
        pending_march()
            .with_next_cycle_start("2024-03-21")
            .with_next_cycle_end("2024-03-01"),
    )]);

    let context = build_context(&monthly(), &records, date(2024, 3, 15), true);

    assert_eq!(context.next_cycle_start, date(2024, 3, 21));
    assert_eq!(context.next_cycle_end, date(2024, 3, 31));
}

#[test]
fn test_paid_governing_cycle_end_sets_next_start() {
    let records = records(vec![(
        "2024-03-01",
        PayoutRecord::paid()
            .with_cycle_start("2024-03-01")
            .with_cycle_end("2024-03-25"),
    )]);

    let context = build_context(&monthly(), &records, date(2024, 3, 20), false);

    assert_eq!(context.current_period.end(), date(2024, 3, 25));
    assert_eq!(context.interval_days, 25);
    assert_eq!(context.next_cycle_start, date(2024, 3, 26));
    assert_eq!(context.next_cycle_end, date(2024, 4, 19));
    assert_eq!(context.governing_record.as_ref().unwrap().key, "2024-03-01");
}

#[test]
fn test_paid_roll_forward() {
    let records = records(vec![(
        "2024-02-01",
        PayoutRecord::paid()
            .with_cycle_start("2024-02-01")
            .with_cycle_end("2024-02-29")
            .with_next_cycle_start("2024-03-01"),
    )]);

    let context = build_context(&monthly(), &records, date(2024, 3, 5), true);

    assert_eq!(context.current_period.start(), date(2024, 3, 1));
    assert_eq!(context.current_period.end(), date(2024, 3, 30));
    assert_eq!(context.record_key, "2024-03-01");
    assert!(context.governing_record.is_none());
    assert_eq!(context.latest_paid_record.as_ref().unwrap().key, "2024-02-01");
    assert_eq!(context.next_cycle_start, date(2024, 3, 31));
    assert_eq!(context.next_cycle_end, date(2024, 4, 29));
}

#[test]
fn test_days_until_next_cycle() {
    let records = records(vec![("2024-03-10", pending_march())]);
    let context = build_context(&monthly(), &records, date(2024, 3, 15), true);

    assert_eq!(context.days_until_next_cycle(date(2024, 3, 15)), 6);
    assert_eq!(context.days_until_next_cycle(date(2024, 3, 25)), -4);
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn test_identical_inputs_give_identical_contexts() {
    let records = records(vec![
        ("2024-02-01", PayoutRecord::paid().with_cycle_end("2024-02-29")),
        ("2024-03-10", pending_march()),
    ]);

    let first = build_context(&monthly(), &records, date(2024, 3, 15), true);
    let second = build_context(&monthly(), &records, date(2024, 3, 15), true);

    assert_eq!(first, second);
    assert_eq!(first.fingerprint().unwrap(), second.fingerprint().unwrap());
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_fingerprint_changes_with_today() {
    let first = build_context(&monthly(), &PayoutRecords::new(), date(2024, 3, 15), true);
    let second = build_context(&monthly(), &PayoutRecords::new(), date(2024, 4, 15), true);

    assert_ne!(first.fingerprint().unwrap(), second.fingerprint().unwrap());
}

// ============================================================================
// Date-like today and serialization
// ============================================================================

#[test]
fn test_build_context_at_normalizes_today() {
    let today = DateValue::from("2024-03-15T22:10:00+02:00");
    let context = build_context_at(&monthly(), &PayoutRecords::new(), &today, true).unwrap();
    assert_eq!(context.current_period.start(), date(2024, 3, 1));

    let bad = DateValue::from("tomorrow-ish");
    assert!(build_context_at(&monthly(), &PayoutRecords::new(), &bad, true).is_none());
}

#[test]
fn test_context_json_shape() {
    let records = records(vec![(
        "2024-03-10",
        pending_march().with_extra("amount", json!(4200)),
    )]);
    let context = build_context(&monthly(), &records, date(2024, 3, 15), true);

    let value = serde_json::to_value(&context).unwrap();
    assert_eq!(value["frequency"], json!("monthly"));
    assert_eq!(value["preferredMethod"], json!("transfer"));
    assert_eq!(value["currentPeriod"]["start"], json!("2024-03-10"));
    assert_eq!(value["currentPeriod"]["end"], json!("2024-03-20"));
    assert_eq!(value["currentPeriod"]["periodKey"], json!("2024-03-10"));
    assert_eq!(value["nextCycleStart"], json!("2024-03-21"));
    assert_eq!(value["intervalDays"], json!(11));
    assert_eq!(value["startRule"], json!("pending_record"));
    assert_eq!(value["governingRecord"]["key"], json!("2024-03-10"));
    assert_eq!(value["governingRecord"]["record"]["status"], json!("pending"));
    assert_eq!(value["allRecords"]["2024-03-10"]["amount"], json!(4200));
}

// ============================================================================
// JSON entry point
// ============================================================================

#[test]
fn test_build_context_json_round_trip() {
    let json = build_context_json(r#"{"paymentType": "weekly", "paymentDay": 5}"#, "", "2024-03-13", true)
        .unwrap();

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["currentPeriod"]["periodKey"], json!("2024-03-08"));
    assert_eq!(value["nextCycleStart"], json!("2024-03-15"));
    assert_eq!(value["allRecords"], json!({}));
}

#[test]
fn test_build_context_json_matches_typed_build() {
    let records_json = r#"{"2024-03-10": {"status": "pending", "cycleStart": "2024-03-10", "scheduledPaymentDate": "2024-03-20"}}"#;
    let json = build_context_json("{}", records_json, "2024-03-15", true).unwrap();

    let typed = build_context(
        &CalendarConfig::default(),
        &parse_records(records_json).unwrap(),
        date(2024, 3, 15),
        true,
    );
    assert_eq!(json, typed.to_json().unwrap());
}

#[test]
fn test_build_context_json_reports_bad_input() {
    let err = build_context_json("{}", "", "someday", true).unwrap_err();
    assert!(matches!(err, ContextError::Config(ConfigError::InvalidToday(_))));
    assert_eq!(err.to_string(), "Invalid date for today: 'someday'");

    let err = build_context_json(r#"{"paymentType": "yearly"}"#, "", "2024-03-13", true).unwrap_err();
    assert!(matches!(err, ContextError::Config(ConfigError::Json(_))));

    let err = build_context_json("{}", "[1, 2]", "2024-03-13", true).unwrap_err();
    assert!(matches!(err, ContextError::Config(ConfigError::Json(_))));
}
