//! Session persistence trait

use super::state::PersistedSession;
use anyhow::Result;

/// Storage for the persisted session entry
///
/// Implement this trait to keep the session somewhere other than memory
/// or a local file.
#[async_trait::async_trait]
pub trait SessionPersistence: Send + Sync {
    /// Read the stored entry, `None` when nothing is stored
    async fn load(&self) -> Result<Option<PersistedSession>>;

    /// Replace the stored entry
    async fn save(&self, session: &PersistedSession) -> Result<()>;

    /// Remove the stored entry; erasing an empty store is not an error
    async fn erase(&self) -> Result<()>;
}

#[async_trait::async_trait]
impl<S: SessionPersistence + ?Sized> SessionPersistence for std::sync::Arc<S> {
    async fn load(&self) -> Result<Option<PersistedSession>> {
        (**self).load().await
    }

    async fn save(&self, session: &PersistedSession) -> Result<()> {
        (**self).save(session).await
    }

    async fn erase(&self) -> Result<()> {
        (**self).erase().await
    }
}
