//! Session management for Mostrador
//!
//! - [`SessionStore`]: the shared context object holding the current
//!   [`SessionState`]
//! - [`SessionPersistence`]: where the `{identity, authenticated}` pair
//!   survives reloads (memory or a local JSON file)
//!
//! # Example
//!
//! ```no_run
//! use mostrador_core::session::{FileSessionPersistence, SessionStore};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let store = SessionStore::new(FileSessionPersistence::new("./.mostrador", "mostrador-session"));
//! store.rehydrate().await?;
//! # Ok(())
//! # }
//! ```

mod file;
mod identity;
mod manager;
mod memory;
mod state;
mod store;

pub use file::FileSessionPersistence;
pub use identity::Identity;
pub use manager::SessionStore;
pub use memory::MemorySessionPersistence;
pub use state::{PersistedSession, SessionState};
pub use store::SessionPersistence;
