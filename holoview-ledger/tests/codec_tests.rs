use chrono::NaiveDate;
use holoview_catalog::FeatureId;
use holoview_ledger::codec::{decode, encode, HEADER};
use holoview_ledger::{Ledger, LicenseRecord, LicenseStatus};
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn record(
    serial: &str,
    status: LicenseStatus,
    dates: Option<(NaiveDate, NaiveDate)>,
    features: &[FeatureId],
) -> LicenseRecord {
    LicenseRecord {
        serial: serial.to_string(),
        status,
        activation_date: dates.map(|(a, _)| a),
        expiration_date: dates.map(|(_, e)| e),
        active_features: features.iter().copied().collect(),
    }
}

fn ledger_of(records: Vec<LicenseRecord>) -> Ledger {
    records
        .into_iter()
        .map(|r| (r.serial.clone(), r))
        .collect()
}

// ── encode ──────────────────────────────────────────────────────

#[test]
fn encode_empty_ledger_is_just_the_header() {
    let text = encode(&Ledger::new());
    assert_eq!(text, format!("{}\n", HEADER.join(",")));
}

#[test]
fn encode_emits_fixed_columns_and_tokens() {
    let ledger = ledger_of(vec![record(
        "XZ77",
        LicenseStatus::Valid,
        Some((date(2024, 3, 1), date(2025, 3, 1))),
        &[FeatureId::ThreeDModels, FeatureId::Ndi],
    )]);

    let text = encode(&ledger);
    let mut lines = text.lines();
    assert_eq!(
        lines.next().unwrap(),
        "serial,status,activation_date,expiration_date,feature_3d_models,feature_parallax,feature_image_addition,feature_ndi"
    );
    assert_eq!(
        lines.next().unwrap(),
        "XZ77,valid,2024-03-01,2025-03-01,True,False,False,True"
    );
    assert_eq!(lines.next(), None);
}

#[test]
fn encode_leaves_absent_dates_empty() {
    let ledger = ledger_of(vec![record("AA11", LicenseStatus::NotActive, None, &[])]);
    let text = encode(&ledger);
    assert!(text.contains("AA11,not_active,,,False,False,False,False"));
}

#[test]
fn encode_orders_rows_by_serial() {
    let ledger = ledger_of(vec![
        record("ZZ99", LicenseStatus::NotActive, None, &[]),
        record("AA11", LicenseStatus::NotActive, None, &[]),
        record("MM55", LicenseStatus::NotActive, None, &[]),
    ]);
    let text = encode(&ledger);
    let serials: Vec<&str> = text
        .lines()
        .skip(1)
        .map(|l| l.split(',').next().unwrap())
        .collect();
    assert_eq!(serials, vec!["AA11", "MM55", "ZZ99"]);
}

#[test]
fn encode_quotes_fields_with_commas() {
    let ledger = ledger_of(vec![record("AB,C", LicenseStatus::Valid, None, &[])]);
    let text = encode(&ledger);
    assert!(text.contains(r#""AB,C""#));
}

// ── decode ──────────────────────────────────────────────────────

#[test]
fn decode_empty_input_is_empty_ledger() {
    assert_eq!(decode(""), Ledger::new());
}

#[test]
fn decode_unusable_header_is_empty_ledger() {
    assert_eq!(decode("not,a,valid,header"), Ledger::new());
}

#[test]
fn decode_header_only_is_empty_ledger() {
    let text = format!("{}\n", HEADER.join(","));
    assert_eq!(decode(&text), Ledger::new());
}

#[test]
fn decode_canonicalizes_serials() {
    let text = "serial,status\n  xz77  ,valid\n";
    let ledger = decode(text);
    let record = &ledger["XZ77"];
    assert_eq!(record.serial, "XZ77");
    assert_eq!(record.status, LicenseStatus::Valid);
}

#[test]
fn decode_skips_rows_with_empty_serial() {
    let text = "serial,status\n,valid\n   ,valid\nXZ77,valid\n";
    let ledger = decode(text);
    assert_eq!(ledger.len(), 1);
    assert!(ledger.contains_key("XZ77"));
}

#[test]
fn decode_tolerates_reordered_columns() {
    let text = "status,feature_ndi,serial\nvalid,True,XZ77\n";
    let ledger = decode(text);
    let record = &ledger["XZ77"];
    assert_eq!(record.status, LicenseStatus::Valid);
    assert!(record.has_feature(FeatureId::Ndi));
}

#[test]
fn decode_tolerates_extra_columns() {
    let text = "serial,status,comment,feature_parallax\nXZ77,valid,legacy import,True\n";
    let ledger = decode(text);
    assert!(ledger["XZ77"].has_feature(FeatureId::Parallax));
}

#[test]
fn decode_defaults_missing_status_to_not_active() {
    let text = "serial,feature_ndi\nXZ77,True\n";
    assert_eq!(decode(text)["XZ77"].status, LicenseStatus::NotActive);
}

#[test]
fn decode_defaults_blank_and_unknown_status_to_not_active() {
    let text = "serial,status\nAA11,\nBB22,cancelled\n";
    let ledger = decode(text);
    assert_eq!(ledger["AA11"].status, LicenseStatus::NotActive);
    assert_eq!(ledger["BB22"].status, LicenseStatus::NotActive);
}

#[test]
fn decode_requires_exact_true_token() {
    let text = "serial,feature_ndi,feature_parallax,feature_3d_models,feature_image_addition\n\
                XZ77,True,true,TRUE,1\n";
    let record = &decode(text)["XZ77"];
    assert!(record.has_feature(FeatureId::Ndi));
    assert!(!record.has_feature(FeatureId::Parallax));
    assert!(!record.has_feature(FeatureId::ThreeDModels));
    assert!(!record.has_feature(FeatureId::ImageAddition));
}

#[test]
fn decode_treats_blank_and_malformed_dates_as_absent() {
    let text = "serial,activation_date,expiration_date\nXZ77,,03/01/2024\n";
    let record = &decode(text)["XZ77"];
    assert_eq!(record.activation_date, None);
    assert_eq!(record.expiration_date, None);
}

#[test]
fn decode_parses_dates() {
    let text = "serial,activation_date,expiration_date\nXZ77,2024-02-29,2025-02-28\n";
    let record = &decode(text)["XZ77"];
    assert_eq!(record.activation_date, Some(date(2024, 2, 29)));
    assert_eq!(record.expiration_date, Some(date(2025, 2, 28)));
}

#[test]
fn decode_keeps_each_serial_once() {
    let text = "serial,status\nXZ77,valid\nxz77,expired\n";
    let ledger = decode(text);
    assert_eq!(ledger.len(), 1);
    // later row wins, matching map-insert semantics
    assert_eq!(ledger["XZ77"].status, LicenseStatus::Expired);
}

// ── round trip ──────────────────────────────────────────────────

#[test]
fn round_trips_a_mixed_ledger() {
    let ledger = ledger_of(vec![
        record(
            "HX-0042",
            LicenseStatus::Valid,
            Some((date(2024, 6, 15), date(2025, 6, 15))),
            &[FeatureId::ThreeDModels, FeatureId::Parallax],
        ),
        record("AA11", LicenseStatus::NotActive, None, &[]),
        record(
            "EXP-9",
            LicenseStatus::Expired,
            Some((date(2022, 1, 2), date(2023, 1, 2))),
            &[FeatureId::Ndi],
        ),
    ]);

    assert_eq!(decode(&encode(&ledger)), ledger);
}

#[test]
fn round_trips_serials_with_quoting() {
    let ledger = ledger_of(vec![
        record("AB,C", LicenseStatus::Valid, None, &[FeatureId::Ndi]),
        record(r#"QT"X"#, LicenseStatus::NotActive, None, &[]),
    ]);

    assert_eq!(decode(&encode(&ledger)), ledger);
}
