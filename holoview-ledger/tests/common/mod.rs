//! Shared in-memory remote store for ledger tests.

#![allow(dead_code)]

use async_trait::async_trait;
use holoview_remote::{
    RemoteBlob, RemoteError, RemoteLocator, RemoteResult, RemoteStore, VersionToken,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Mutex;

/// In-memory [`RemoteStore`] with real compare-and-swap semantics plus
/// failure injection, so store tests can exercise conflict and transport
/// paths deterministically.
#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<String, (Vec<u8>, u64)>>,
    fail_fetches: AtomicBool,
    fail_commits: AtomicBool,
    conflict_commits: AtomicBool,
    commits: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent fetch fail with a transport error.
    pub fn set_fail_fetches(&self, fail: bool) {
        self.fail_fetches.store(fail, Ordering::SeqCst);
    }

    /// Makes every subsequent commit fail with a transport error.
    pub fn set_fail_commits(&self, fail: bool) {
        self.fail_commits.store(fail, Ordering::SeqCst);
    }

    /// Makes every subsequent commit fail with a version conflict.
    pub fn set_conflict_commits(&self, conflict: bool) {
        self.conflict_commits.store(conflict, Ordering::SeqCst);
    }

    /// Number of commit attempts seen (including failed ones).
    pub fn commit_attempts(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    /// Preloads an object, as if another process had committed it.
    pub async fn seed(&self, locator: &RemoteLocator, content: &[u8]) {
        let mut objects = self.objects.lock().await;
        let rev = objects.get(&locator.to_string()).map_or(1, |(_, r)| r + 1);
        objects.insert(locator.to_string(), (content.to_vec(), rev));
    }

    /// Returns the last committed content of an object.
    pub async fn content(&self, locator: &RemoteLocator) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .await
            .get(&locator.to_string())
            .map(|(content, _)| content.clone())
    }

    fn token(rev: u64) -> VersionToken {
        VersionToken::new(format!("rev-{rev}"))
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    fn provider_name(&self) -> &'static str {
        "memory"
    }

    async fn fetch(&self, locator: &RemoteLocator) -> RemoteResult<Option<RemoteBlob>> {
        if self.fail_fetches.load(Ordering::SeqCst) {
            return Err(RemoteError::Transport("injected fetch failure".to_string()));
        }

        Ok(self
            .objects
            .lock()
            .await
            .get(&locator.to_string())
            .map(|(content, rev)| RemoteBlob {
                content: content.clone(),
                version: Self::token(*rev),
            }))
    }

    async fn commit(
        &self,
        locator: &RemoteLocator,
        content: &[u8],
        _message: &str,
        expected: Option<&VersionToken>,
    ) -> RemoteResult<VersionToken> {
        self.commits.fetch_add(1, Ordering::SeqCst);

        if self.fail_commits.load(Ordering::SeqCst) {
            return Err(RemoteError::Transport(
                "injected commit failure".to_string(),
            ));
        }
        if self.conflict_commits.load(Ordering::SeqCst) {
            return Err(RemoteError::Conflict("injected conflict".to_string()));
        }

        let mut objects = self.objects.lock().await;
        let current = objects.get(&locator.to_string());

        if let Some(expected) = expected {
            let current_token = current.map(|(_, rev)| Self::token(*rev));
            if current_token.as_ref() != Some(expected) {
                return Err(RemoteError::Conflict(format!(
                    "expected {expected}, found {current_token:?}"
                )));
            }
        }

        let rev = current.map_or(1, |(_, rev)| rev + 1);
        objects.insert(locator.to_string(), (content.to_vec(), rev));
        Ok(Self::token(rev))
    }
}

/// A locator pointing at the conventional test object.
pub fn test_locator() -> RemoteLocator {
    RemoteLocator::new("holoview", "licenses", "licenses.csv", "main")
}
