//! The purchase-completion transition.
//!
//! A pure function of the event and the current record; persistence is the
//! store's concern. Re-applying the same purchase is idempotent for feature
//! membership, while the dates refresh on every call — reactivation is
//! expected to extend the validity window.

use crate::record::{canonical_serial, LicenseRecord, LicenseStatus};
use chrono::{Months, NaiveDate};
use holoview_catalog::FeatureId;
use std::collections::BTreeSet;

/// Applies a completed purchase to a serial's record.
///
/// Canonicalizes the serial (returning `None` for an empty one — the event
/// is unrecoverable and dropped silently), starts from the existing record
/// or a fresh default, marks it `Valid`, stamps the activation date with
/// `today` and the expiration one calendar year later, and unions the
/// purchased features into the active set.
#[must_use]
pub fn apply_purchase(
    existing: Option<&LicenseRecord>,
    serial: &str,
    purchased: &BTreeSet<FeatureId>,
    today: NaiveDate,
) -> Option<LicenseRecord> {
    let serial = canonical_serial(serial);
    if serial.is_empty() {
        return None;
    }

    let mut record = existing
        .cloned()
        .unwrap_or_else(|| LicenseRecord::new(serial.clone()));
    record.serial = serial;
    record.status = LicenseStatus::Valid;
    record.activation_date = Some(today);
    record.expiration_date = Some(one_year_after(today));
    record.active_features.extend(purchased.iter().copied());

    Some(record)
}

/// Adds one calendar year, preserving month and day. A Feb 29 start clamps
/// to Feb 28 in the non-leap target year.
#[must_use]
pub fn one_year_after(date: NaiveDate) -> NaiveDate {
    date.checked_add_months(Months::new(12))
        .unwrap_or(NaiveDate::MAX)
}
