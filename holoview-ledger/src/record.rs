//! License record model.

use chrono::NaiveDate;
use holoview_catalog::FeatureId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Activation status of a serial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LicenseStatus {
    /// Never activated.
    NotActive,
    /// Activated and inside its validity window.
    Valid,
    /// Activated but past its expiration date.
    Expired,
}

impl LicenseStatus {
    /// Returns the persisted token for this status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotActive => "not_active",
            Self::Valid => "valid",
            Self::Expired => "expired",
        }
    }

    /// Parses a persisted token. Returns `None` for anything unrecognized.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "not_active" => Some(Self::NotActive),
            "valid" => Some(Self::Valid),
            "expired" => Some(Self::Expired),
            _ => None,
        }
    }
}

/// Activation state of a single serial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseRecord {
    /// Canonical serial: uppercase, trimmed, non-empty. The ledger key.
    pub serial: String,
    /// Current activation status.
    pub status: LicenseStatus,
    /// Calendar date of the most recent activation.
    pub activation_date: Option<NaiveDate>,
    /// Calendar date the unlock expires.
    pub expiration_date: Option<NaiveDate>,
    /// Features unlocked on this serial. A true set: re-adding a member is
    /// a no-op.
    pub active_features: BTreeSet<FeatureId>,
}

impl LicenseRecord {
    /// Creates the default record for a serial: not active, no dates, no
    /// features.
    #[must_use]
    pub fn new(serial: impl Into<String>) -> Self {
        Self {
            serial: serial.into(),
            status: LicenseStatus::NotActive,
            activation_date: None,
            expiration_date: None,
            active_features: BTreeSet::new(),
        }
    }

    /// Returns true if the given feature is unlocked.
    #[must_use]
    pub fn has_feature(&self, feature: FeatureId) -> bool {
        self.active_features.contains(&feature)
    }
}

/// The complete serial → record mapping. Iteration order is unspecified.
pub type Ledger = HashMap<String, LicenseRecord>;

/// Canonical form of a serial: uppercase, trimmed. Lookups and storage both
/// go through this, making the ledger case-insensitive on serials.
#[must_use]
pub fn canonical_serial(raw: &str) -> String {
    raw.trim().to_uppercase()
}
