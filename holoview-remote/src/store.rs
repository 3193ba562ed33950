//! Remote object store abstraction.
//!
//! Defines the common interface every ledger backend implements.

use crate::error::RemoteResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a specific revision of a remote object.
///
/// Tokens are compared for equality only, never parsed for meaning. For the
/// GitHub backend this is the blob SHA; the file backend uses a content
/// digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionToken(String);

impl VersionToken {
    /// Wraps a raw token value.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Coordinates of the remote object holding the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteLocator {
    /// Repository owner (user or organization).
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Path to the object within the repository.
    pub path: String,
    /// Branch (or equivalent ref) the object lives on.
    pub branch: String,
}

impl RemoteLocator {
    /// Creates a locator from its four coordinates.
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        path: impl Into<String>,
        branch: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            path: path.into(),
            branch: branch.into(),
        }
    }
}

impl fmt::Display for RemoteLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}@{}",
            self.owner, self.repo, self.path, self.branch
        )
    }
}

/// A fetched object: its content plus the version it was read at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteBlob {
    /// Raw object content.
    pub content: Vec<u8>,
    /// Version the content was read at.
    pub version: VersionToken,
}

/// A store holding versioned objects addressed by [`RemoteLocator`].
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Returns the name of the backing store.
    fn provider_name(&self) -> &'static str;

    /// Fetches the object, or `None` if it does not exist. Absence is not an
    /// error.
    async fn fetch(&self, locator: &RemoteLocator) -> RemoteResult<Option<RemoteBlob>>;

    /// Writes a new revision of the object and returns its version token.
    ///
    /// With `expected` supplied this is a conditional write: the store must
    /// reject it with [`RemoteError::Conflict`] when the object's current
    /// version differs, so a revision newer than the one the caller observed
    /// is never silently overwritten. Without `expected` the write is an
    /// unconditional create-or-replace, intended only for the first write of
    /// a process lifetime that found nothing on fetch.
    ///
    /// [`RemoteError::Conflict`]: crate::RemoteError::Conflict
    async fn commit(
        &self,
        locator: &RemoteLocator,
        content: &[u8],
        message: &str,
        expected: Option<&VersionToken>,
    ) -> RemoteResult<VersionToken>;
}
