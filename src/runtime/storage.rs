//! In-memory session store

use super::session::{ArchivedCall, SessionHandle};
use super::traits::SessionStore;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;

/// Process-lifetime store. The map lock is only held for map operations;
/// per-session work happens under each session's own mutex.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    active: HashMap<String, SessionHandle>,
    archive: Vec<ArchivedCall>,
    /// Every id ever issued, so retired ids are never reused
    issued: HashSet<String>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemoryStorage {
    async fn put(&self, handle: SessionHandle) -> Result<(), String> {
        let mut inner = self.inner.write().await;
        if !inner.issued.insert(handle.id.clone()) {
            return Err(format!("Session id already issued: {}", handle.id));
        }
        inner.active.insert(handle.id.clone(), handle);
        Ok(())
    }

    async fn get(&self, id: &str) -> Option<SessionHandle> {
        self.inner.read().await.active.get(id).cloned()
    }

    async fn remove(&self, id: &str) -> Option<SessionHandle> {
        self.inner.write().await.active.remove(id)
    }

    async fn list(&self) -> Vec<SessionHandle> {
        self.inner.read().await.active.values().cloned().collect()
    }

    async fn retire(&self, record: ArchivedCall) {
        let mut inner = self.inner.write().await;
        inner.active.remove(&record.id);
        inner.archive.push(record);
    }

    async fn history(&self) -> Vec<ArchivedCall> {
        self.inner.read().await.archive.clone()
    }

    async fn counts(&self) -> (usize, usize) {
        let inner = self.inner.read().await;
        (inner.active.len(), inner.archive.len())
    }
}
