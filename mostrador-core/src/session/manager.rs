//! Session store: the single owner of the authenticated identity
//!
//! The store is an explicit context object. Clones share the same state,
//! which lives in a `watch` channel so every update is a whole-state
//! replacement and observers can re-render on change.
//!
//! Writes to the persisted entry are serialized and each one stores the
//! state current at the time it runs, so a slow erase from a cleared
//! session cannot remove the entry of a login that followed it.

use super::identity::Identity;
use super::state::{PersistedSession, SessionState};
use super::store::SessionPersistence;
use super::MemorySessionPersistence;
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};

/// Shared session store
///
/// # Example
///
/// ```no_run
/// use mostrador_core::session::{Identity, SessionStore};
///
/// # async fn example() -> anyhow::Result<()> {
/// let store = SessionStore::in_memory();
/// store.rehydrate().await?;
///
/// store.begin_authentication();
/// store.complete_login(Identity::new(1, "ana", ["ventas"].into_iter().collect())).await;
/// assert!(store.snapshot().is_authenticated());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SessionStore {
    state: Arc<watch::Sender<SessionState>>,
    persistence: Arc<dyn SessionPersistence>,
    writes: Arc<Mutex<()>>,
}

impl SessionStore {
    /// Create an empty store backed by `persistence`
    pub fn new(persistence: impl SessionPersistence + 'static) -> Self {
        Self::with_persistence(Arc::new(persistence))
    }

    pub fn with_persistence(persistence: Arc<dyn SessionPersistence>) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self { state: Arc::new(state), persistence, writes: Arc::new(Mutex::new(())) }
    }

    /// Store that persists nothing outside the process
    pub fn in_memory() -> Self {
        Self::new(MemorySessionPersistence::new())
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn epoch(&self) -> u64 {
        self.state.borrow().epoch
    }

    /// Receiver notified after every state replacement
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Restore the persisted `{identity, authenticated}` pair
    ///
    /// Must run before the first guard evaluation. Marks the store
    /// initialized even when nothing was stored.
    pub async fn rehydrate(&self) -> Result<()> {
        let persisted = self.persistence.load().await?.unwrap_or_default();
        let restored = persisted.identity.is_some();

        self.state.send_modify(|state| {
            let epoch = if restored { state.epoch + 1 } else { state.epoch };
            *state = SessionState {
                authenticated: persisted.authenticated && persisted.identity.is_some(),
                identity: persisted.identity,
                loading: false,
                initialized: true,
                last_error: None,
                epoch,
            };
        });

        if restored {
            log::info!("Restored session for '{}'", self.username().unwrap_or_default());
        } else {
            log::debug!("No persisted session to restore");
        }
        Ok(())
    }

    /// Mark an authentication attempt as in flight
    pub fn begin_authentication(&self) {
        self.state.send_modify(|state| {
            *state = SessionState { loading: true, last_error: None, ..state.clone() };
        });
    }

    /// Install a freshly authenticated identity and persist it
    ///
    /// Returns the new epoch.
    pub async fn complete_login(&self, identity: Identity) -> u64 {
        log::info!("Session started for '{}' with roles {}", identity.username, identity.roles);
        let mut epoch = 0;
        self.state.send_modify(|state| {
            epoch = state.epoch + 1;
            *state = SessionState {
                identity: Some(identity),
                authenticated: true,
                loading: false,
                initialized: true,
                last_error: None,
                epoch,
            };
        });
        self.sync_persisted().await;
        epoch
    }

    /// Replace the identity of the same account without starting a new
    /// session (e.g. roles refreshed by the session check)
    ///
    /// A different account is treated as a new login.
    pub async fn refresh_identity(&self, identity: Identity) -> u64 {
        let same_account = self.state.borrow().identity.as_ref().map(|current| current.id) == Some(identity.id);
        if !same_account {
            return self.complete_login(identity).await;
        }

        self.state.send_modify(|state| {
            *state = SessionState { identity: Some(identity), authenticated: true, ..state.clone() };
        });
        self.sync_persisted().await;
        self.epoch()
    }

    /// Record a failed authentication attempt
    pub fn fail_authentication(&self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("Authentication failed: {}", message);
        self.state.send_modify(|state| {
            *state = SessionState { loading: false, last_error: Some(message), ..state.clone() };
        });
    }

    /// Explicit logout: drop the identity and erase the persisted entry
    pub async fn logout(&self) {
        if let Some(username) = self.username() {
            log::info!("Session ended for '{}'", username);
        }
        self.state.send_modify(|state| {
            *state = Self::cleared(state.epoch + 1);
        });
        self.sync_persisted().await;
    }

    /// Clear the session after the server rejected it
    ///
    /// Acts only when a session is present and `observed_epoch` is still
    /// current, so concurrent or late rejections of the same session are
    /// no-ops. Returns whether this call cleared the session; the caller
    /// issues the login redirect only then.
    pub async fn force_clear(&self, observed_epoch: u64) -> bool {
        let cleared = self.state.send_if_modified(|state| {
            if state.epoch != observed_epoch || state.identity.is_none() {
                return false;
            }
            *state = Self::cleared(state.epoch + 1);
            true
        });

        if cleared {
            log::warn!("Session rejected by server, cleared local session (epoch {})", observed_epoch);
            self.sync_persisted().await;
        } else {
            log::debug!("Ignoring stale session rejection (epoch {})", observed_epoch);
        }
        cleared
    }

    /// Return the store to its uninitialized state, keeping persisted data
    pub fn teardown(&self) {
        self.state.send_modify(|state| {
            *state = SessionState { epoch: state.epoch + 1, ..SessionState::default() };
        });
    }

    fn username(&self) -> Option<String> {
        self.state.borrow().identity.as_ref().map(|identity| identity.username.clone())
    }

    fn cleared(epoch: u64) -> SessionState {
        SessionState { initialized: true, epoch, ..SessionState::default() }
    }

    /// Write the current state to persistence, erasing the entry when
    /// there is no identity
    async fn sync_persisted(&self) {
        let _guard = self.writes.lock().await;
        let entry: PersistedSession = self.state.borrow().persisted();
        if entry.identity.is_none() {
            if let Err(e) = self.persistence.erase().await {
                log::error!("Failed to erase persisted session: {:#}", e);
            }
        } else if let Err(e) = self.persistence.save(&entry).await {
            log::error!("Failed to persist session: {:#}", e);
        }
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").field("state", &*self.state.borrow()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySessionPersistence;
    use std::time::Duration;

    /// Memory persistence whose erase takes a while to land
    #[derive(Clone, Default)]
    struct SlowErase {
        inner: MemorySessionPersistence,
    }

    #[async_trait::async_trait]
    impl SessionPersistence for SlowErase {
        async fn load(&self) -> Result<Option<PersistedSession>> {
            self.inner.load().await
        }

        async fn save(&self, session: &PersistedSession) -> Result<()> {
            self.inner.save(session).await
        }

        async fn erase(&self) -> Result<()> {
            tokio::time::sleep(Duration::from_millis(50)).await;
            self.inner.erase().await
        }
    }

    fn identity(id: i64, roles: &[&str]) -> Identity {
        Identity::new(id, format!("user{}", id), roles.iter().copied().collect())
    }

    fn store_with(persistence: &MemorySessionPersistence) -> SessionStore {
        SessionStore::new(persistence.clone())
    }

    #[tokio::test]
    async fn test_new_store_is_empty() {
        let store = SessionStore::in_memory();
        let state = store.snapshot();
        assert!(state.identity.is_none());
        assert!(!state.authenticated);
        assert!(!state.initialized);
    }

    #[tokio::test]
    async fn test_login_lifecycle() {
        let persistence = MemorySessionPersistence::new();
        let store = store_with(&persistence);
        store.rehydrate().await.unwrap();

        store.begin_authentication();
        assert!(store.snapshot().loading);

        let epoch = store.complete_login(identity(1, &["ventas"])).await;
        let state = store.snapshot();
        assert!(state.is_authenticated());
        assert!(!state.loading);
        assert_eq!(state.epoch, epoch);
        assert!(persistence.entry().unwrap().authenticated);

        store.logout().await;
        let state = store.snapshot();
        assert!(state.identity.is_none());
        assert!(state.initialized);
        assert!(persistence.entry().is_none());
    }

    #[tokio::test]
    async fn test_failed_login_records_error() {
        let store = SessionStore::in_memory();
        store.begin_authentication();
        store.fail_authentication("credenciales inválidas");

        let state = store.snapshot();
        assert!(!state.loading);
        assert_eq!(state.last_error.as_deref(), Some("credenciales inválidas"));

        store.begin_authentication();
        assert!(store.snapshot().last_error.is_none());
    }

    #[tokio::test]
    async fn test_rehydrate_restores_persisted_pair() {
        let persistence = MemorySessionPersistence::with_entry(PersistedSession {
            identity: Some(identity(3, &["cajero"])),
            authenticated: true,
        });
        let store = store_with(&persistence);
        store.rehydrate().await.unwrap();

        let state = store.snapshot();
        assert!(state.is_authenticated());
        assert!(state.initialized);
        assert!(state.roles().unwrap().contains("cajero"));
    }

    #[tokio::test]
    async fn test_force_clear_is_idempotent() {
        let persistence = MemorySessionPersistence::new();
        let store = store_with(&persistence);
        let epoch = store.complete_login(identity(1, &["ventas"])).await;

        assert!(store.force_clear(epoch).await);
        assert!(!store.force_clear(epoch).await);
        assert!(!store.force_clear(epoch).await);

        assert!(store.snapshot().identity.is_none());
        assert_eq!(persistence.erase_count(), 1);
    }

    #[tokio::test]
    async fn test_stale_rejection_keeps_new_session() {
        let store = SessionStore::in_memory();
        let old_epoch = store.complete_login(identity(1, &["ventas"])).await;
        store.logout().await;
        store.complete_login(identity(2, &["cajero"])).await;

        assert!(!store.force_clear(old_epoch).await);
        assert_eq!(store.snapshot().identity.unwrap().id, 2);
    }

    #[tokio::test]
    async fn test_force_clear_without_session_is_noop() {
        let store = SessionStore::in_memory();
        store.rehydrate().await.unwrap();
        assert!(!store.force_clear(store.epoch()).await);
    }

    #[tokio::test]
    async fn test_refresh_identity_keeps_epoch_for_same_account() {
        let store = SessionStore::in_memory();
        let epoch = store.complete_login(identity(1, &["ventas"])).await;

        assert_eq!(store.refresh_identity(identity(1, &["ventas", "cajero"])).await, epoch);
        assert!(store.snapshot().roles().unwrap().contains("cajero"));

        assert!(store.refresh_identity(identity(9, &["admin"])).await > epoch);
    }

    #[tokio::test]
    async fn test_subscribers_see_updates() {
        let store = SessionStore::in_memory();
        let mut rx = store.subscribe();

        store.complete_login(identity(1, &["ventas"])).await;
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_authenticated());
    }

    #[tokio::test]
    async fn test_clear_in_flight_keeps_entry_of_next_login() {
        let persistence = SlowErase::default();
        let store = SessionStore::new(persistence.clone());
        let epoch = store.complete_login(identity(1, &["ventas"])).await;

        let clearing = tokio::spawn({
            let store = store.clone();
            async move { store.force_clear(epoch).await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        store.complete_login(identity(2, &["cajero"])).await;

        assert!(clearing.await.unwrap());
        assert_eq!(store.snapshot().identity.unwrap().id, 2);
        assert_eq!(persistence.inner.entry().unwrap().identity.unwrap().id, 2);
        assert_eq!(persistence.inner.erase_count(), 1);
    }

    #[tokio::test]
    async fn test_logout_in_flight_keeps_entry_of_next_login() {
        let persistence = SlowErase::default();
        let store = SessionStore::new(persistence.clone());
        store.complete_login(identity(1, &["ventas"])).await;

        let logging_out = tokio::spawn({
            let store = store.clone();
            async move { store.logout().await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        store.complete_login(identity(3, &["supervisor"])).await;
        logging_out.await.unwrap();

        assert_eq!(persistence.inner.entry().unwrap().identity.unwrap().id, 3);
    }
}
