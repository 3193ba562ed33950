//! Fixed-column CSV codec for the ledger.
//!
//! The persisted object is UTF-8 text: one header line, one row per serial.
//! Feature columns carry the literal tokens `True`/`False`; dates are
//! `YYYY-MM-DD` or empty. Decoding is deliberately fail-soft — malformed
//! input yields an empty (or partial) ledger rather than an error, so a
//! corrupted remote object can never take the service down.

use crate::record::{canonical_serial, Ledger, LicenseRecord, LicenseStatus};
use chrono::NaiveDate;
use holoview_catalog::FeatureId;
use std::collections::{BTreeSet, HashMap};
use tracing::warn;

/// Column names, in emission order.
pub const HEADER: [&str; 8] = [
    "serial",
    "status",
    "activation_date",
    "expiration_date",
    "feature_3d_models",
    "feature_parallax",
    "feature_image_addition",
    "feature_ndi",
];

const TRUE_TOKEN: &str = "True";
const FALSE_TOKEN: &str = "False";
const DATE_FORMAT: &str = "%Y-%m-%d";

fn feature_column(feature: FeatureId) -> &'static str {
    match feature {
        FeatureId::ThreeDModels => "feature_3d_models",
        FeatureId::Parallax => "feature_parallax",
        FeatureId::ImageAddition => "feature_image_addition",
        FeatureId::Ndi => "feature_ndi",
    }
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

fn parse_date(field: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(field.trim(), DATE_FORMAT).ok()
}

/// Looks up a row field by column name, empty when the column or field is
/// missing.
fn field<'r>(
    columns: &HashMap<&str, usize>,
    row: &'r csv::StringRecord,
    name: &str,
) -> &'r str {
    columns
        .get(name)
        .and_then(|&index| row.get(index))
        .unwrap_or("")
}

/// Encodes the full ledger as CSV text.
///
/// Rows are emitted in sorted-serial order so successive revisions of the
/// remote object diff cleanly. Fields containing a comma, double quote, or
/// newline are quoted with embedded quotes doubled.
#[must_use]
pub fn encode(ledger: &Ledger) -> String {
    try_encode(ledger).expect("CSV encoding into memory cannot fail")
}

fn try_encode(ledger: &Ledger) -> csv::Result<String> {
    let mut buffer = Vec::new();
    {
        let mut writer = csv::Writer::from_writer(&mut buffer);
        writer.write_record(HEADER)?;

        let mut serials: Vec<&String> = ledger.keys().collect();
        serials.sort();

        for serial in serials {
            let record = &ledger[serial];
            let mut row = vec![
                record.serial.clone(),
                record.status.as_str().to_string(),
                format_date(record.activation_date),
                format_date(record.expiration_date),
            ];
            for feature in FeatureId::ALL {
                let token = if record.has_feature(feature) {
                    TRUE_TOKEN
                } else {
                    FALSE_TOKEN
                };
                row.push(token.to_string());
            }
            writer.write_record(&row)?;
        }
        writer.flush()?;
    }
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Decodes CSV text into a ledger.
///
/// The first non-empty line is the header; columns are located by name, so
/// reordered or extra columns are tolerated. Rows with an empty serial are
/// skipped, blank or unrecognized statuses default to `NotActive`, and a
/// feature is unlocked only on an exact `True` token. Input with no usable
/// header decodes to an empty ledger.
#[must_use]
pub fn decode(text: &str) -> Ledger {
    let mut ledger = Ledger::new();

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = match reader.headers() {
        Ok(headers) => headers.clone(),
        Err(e) => {
            warn!("ledger text has an unreadable header, treating as empty: {e}");
            return ledger;
        }
    };
    let columns: HashMap<&str, usize> = headers
        .iter()
        .enumerate()
        .map(|(index, name)| (name.trim(), index))
        .collect();
    let Some(&serial_index) = columns.get("serial") else {
        warn!("ledger text has no serial column, treating as empty");
        return ledger;
    };

    for result in reader.records() {
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                warn!("skipping unparseable ledger row: {e}");
                continue;
            }
        };

        let serial = canonical_serial(row.get(serial_index).unwrap_or(""));
        if serial.is_empty() {
            continue;
        }

        let status = LicenseStatus::parse(field(&columns, &row, "status").trim())
            .unwrap_or(LicenseStatus::NotActive);
        let activation_date = parse_date(field(&columns, &row, "activation_date"));
        let expiration_date = parse_date(field(&columns, &row, "expiration_date"));

        let mut active_features = BTreeSet::new();
        for feature in FeatureId::ALL {
            if field(&columns, &row, feature_column(feature)) == TRUE_TOKEN {
                active_features.insert(feature);
            }
        }

        ledger.insert(
            serial.clone(),
            LicenseRecord {
                serial,
                status,
                activation_date,
                expiration_date,
                active_features,
            },
        );
    }

    ledger
}
