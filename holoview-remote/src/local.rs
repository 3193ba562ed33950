//! Local-directory store implementation.
//!
//! Mirrors the remote object into a plain directory tree, for development
//! runs and tests. The version token is the SHA-256 of the content, and the
//! conditional-write check is enforced under a process-local mutex — so the
//! compare-and-swap contract only holds for writers within one process.

use crate::error::{RemoteError, RemoteResult};
use crate::store::{RemoteBlob, RemoteLocator, RemoteStore, VersionToken};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Local filesystem store.
pub struct FileStore {
    root: PathBuf,
    /// Serializes the read-compare-write of `commit`.
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Creates a store rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Returns the store's root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, locator: &RemoteLocator) -> PathBuf {
        self.root
            .join(&locator.owner)
            .join(&locator.repo)
            .join(&locator.branch)
            .join(&locator.path)
    }

    fn digest(content: &[u8]) -> VersionToken {
        VersionToken::new(hex::encode(Sha256::digest(content)))
    }

    async fn read_current(&self, path: &Path) -> RemoteResult<Option<Vec<u8>>> {
        match fs::read(path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(RemoteError::Transport(format!(
                "failed to read {}: {e}",
                path.display()
            ))),
        }
    }
}

#[async_trait]
impl RemoteStore for FileStore {
    fn provider_name(&self) -> &'static str {
        "local directory"
    }

    async fn fetch(&self, locator: &RemoteLocator) -> RemoteResult<Option<RemoteBlob>> {
        let path = self.object_path(locator);
        debug!("Fetching {locator} from {}", path.display());

        let Some(content) = self.read_current(&path).await? else {
            return Ok(None);
        };
        let version = Self::digest(&content);
        Ok(Some(RemoteBlob { content, version }))
    }

    async fn commit(
        &self,
        locator: &RemoteLocator,
        content: &[u8],
        message: &str,
        expected: Option<&VersionToken>,
    ) -> RemoteResult<VersionToken> {
        let path = self.object_path(locator);
        let _guard = self.write_lock.lock().await;

        if let Some(expected) = expected {
            let current = self
                .read_current(&path)
                .await?
                .map(|content| Self::digest(&content));
            if current.as_ref() != Some(expected) {
                return Err(RemoteError::Conflict(format!(
                    "{locator}: expected version {expected}, found {}",
                    current.map_or_else(|| "none".to_string(), |v| v.to_string())
                )));
            }
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                RemoteError::Transport(format!("failed to create {}: {e}", parent.display()))
            })?;
        }
        fs::write(&path, content).await.map_err(|e| {
            RemoteError::Transport(format!("failed to write {}: {e}", path.display()))
        })?;

        info!(
            "Committed {} bytes to {} ({message})",
            content.len(),
            path.display()
        );
        Ok(Self::digest(content))
    }
}
