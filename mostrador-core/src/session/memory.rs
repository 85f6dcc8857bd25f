//! In-memory session persistence
//!
//! Keeps the entry in process memory. Used by tests and by embedders that
//! do not want anything written to disk.

use super::state::PersistedSession;
use super::store::SessionPersistence;
use anyhow::Result;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

/// In-memory session persistence
///
/// Clones share the same entry.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionPersistence {
    entry: Arc<RwLock<Option<PersistedSession>>>,
    erasures: Arc<AtomicUsize>,
}

impl MemorySessionPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an entry already stored
    pub fn with_entry(session: PersistedSession) -> Self {
        let store = Self::new();
        *store.entry.write().expect("session entry lock poisoned") = Some(session);
        store
    }

    /// Current entry
    pub fn entry(&self) -> Option<PersistedSession> {
        self.entry.read().expect("session entry lock poisoned").clone()
    }

    /// Number of times the entry was erased
    pub fn erase_count(&self) -> usize {
        self.erasures.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl SessionPersistence for MemorySessionPersistence {
    async fn load(&self) -> Result<Option<PersistedSession>> {
        Ok(self.entry())
    }

    async fn save(&self, session: &PersistedSession) -> Result<()> {
        let mut entry = self.entry.write().expect("session entry lock poisoned");
        *entry = Some(session.clone());
        Ok(())
    }

    async fn erase(&self) -> Result<()> {
        let mut entry = self.entry.write().expect("session entry lock poisoned");
        *entry = None;
        self.erasures.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
