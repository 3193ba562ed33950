//! Versioned remote object store clients for the Holoview ledger.
//!
//! The ledger's durable mirror is a single text object held in an external
//! store that supports nothing fancier than "read with a version" and "write
//! conditioned on a version". This crate defines that capability as the
//! [`RemoteStore`] trait and ships two implementations:
//!
//! - [`GitHubStore`] — the production backend: a file in a GitHub repository,
//!   read and written through the contents API. The blob SHA is the version
//!   token; a conditional write with a stale SHA is rejected by GitHub.
//! - [`FileStore`] — a local-directory backend for development and tests,
//!   with the same compare-and-swap contract enforced process-locally.
//!
//! No implementation retries anything. Callers decide what a transient
//! failure means for them.

mod error;
mod github;
mod local;
mod store;

pub use error::{RemoteError, RemoteResult};
pub use github::{GitHubConfig, GitHubStore};
pub use local::FileStore;
pub use store::{RemoteBlob, RemoteLocator, RemoteStore, VersionToken};
