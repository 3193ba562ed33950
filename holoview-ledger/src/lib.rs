//! In-memory license ledger with remote-backed persistence.
//!
//! Tracks activation state for Holoview serial numbers: which features are
//! unlocked, when a unit was activated, when the unlock expires. The ledger
//! lives in memory and answers every read; a CSV rendition of it is mirrored
//! to a versioned remote object so state survives restarts.
//!
//! # Architecture
//!
//! - **Record model** ([`record`]): `LicenseRecord` keyed by canonical serial
//! - **Codec** ([`codec`]): fixed-column CSV encoding of the whole ledger
//! - **Activation** ([`activation`]): the pure purchase-completion transition
//! - **Store** ([`store`]): the process-wide cache orchestrating
//!   load-at-startup and commit-after-mutation against a
//!   [`RemoteStore`](holoview_remote::RemoteStore)
//!
//! # Consistency model
//!
//! The in-memory ledger is authoritative. Mutations are serialized through
//! one write lock; the remote commit happens after the lock is released,
//! conditioned on the last observed version token. A losing racer's commit
//! is logged and dropped — every commit re-encodes the entire ledger, so the
//! mirror self-heals on the next successful write.

pub mod activation;
pub mod codec;
pub mod record;
mod store;

pub use activation::{apply_purchase, one_year_after};
pub use record::{canonical_serial, Ledger, LicenseRecord, LicenseStatus};
pub use store::LedgerStore;
