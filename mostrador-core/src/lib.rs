//! Mostrador - Core
//!
//! Access control for a point-of-sale back office: who is signed in, which
//! modules their roles unlock, which menu entries they see and which pages
//! they may open.
//!
//! # Architecture
//!
//! - [`rbac`] - Module paths, role grants and the permission check
//! - [`navigation`] - The back-office menu tree and its per-role filter
//! - [`session`] - Session store with persistence and rehydration
//! - [`guard`] - Route guards and the route table
//! - [`api`] - Authenticated HTTP client and authentication flows
//! - [`backoffice`] - Everything above wired from one configuration
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use mostrador_core::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = MostradorConfig::load()?;
//!     let backoffice = BackOffice::from_config(config, Arc::new(LogNavigator))?;
//!     backoffice.init().await?;
//!
//!     backoffice.auth().login(&Credentials::new("ana", "secreto")).await?;
//!     for node in backoffice.visible_navigation().iter() {
//!         println!("{}", node.title);
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod backoffice;
pub mod config; // Configuration system with TOML support
pub mod guard;
pub mod logging;
pub mod navigation;
pub mod navigator;
pub mod rbac; // Role-Based Access Control system
pub mod session;

// Prelude module for convenient imports
pub mod prelude;

pub use backoffice::BackOffice;
pub use guard::{GuardDecision, GuardState, RouteGuard, RouteTable};
pub use navigation::{filter_navigation, NavigationTree};
pub use rbac::{ModulePath, PermissionChecker, PermissionMap, RoleSet};
pub use session::{Identity, SessionState, SessionStore};

// Main result type for the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced to callers of guards and the API client
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No identity is present
    #[error("Not authenticated")]
    Unauthenticated,

    /// An identity is present but none of its roles grant the module
    #[error("Not authorized to access '{module}'")]
    Unauthorized { module: String },

    /// The server rejected the session; it has been cleared locally
    #[error("Session expired")]
    SessionExpired,

    /// The request never produced a response
    #[error("Network failure: {0}")]
    NetworkFailure(String),

    /// Non-success response, payload passed through as sent by the server
    #[error("Request failed with status {status}")]
    ApplicationError { status: u16, payload: serde_json::Value },

    /// Successful response whose body did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Request body could not be encoded
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Session persistence failure
    #[error("Session storage error: {0}")]
    Storage(String),
}

impl Error {
    /// Whether the login redirect for this error has already been issued
    pub fn is_redirect_handled(&self) -> bool {
        matches!(self, Error::SessionExpired)
    }

    /// HTTP status of an application error
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::ApplicationError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message suitable for showing to the user
    ///
    /// Application errors use the `message` or `error` field of the payload
    /// when the server sent one.
    pub fn user_message(&self) -> String {
        if let Error::ApplicationError { payload, .. } = self {
            let message = ["message", "error"]
                .iter()
                .find_map(|key| payload.get(*key).and_then(|v| v.as_str()))
                .or_else(|| payload.as_str());
            if let Some(message) = message {
                return message.to_string();
            }
        }
        self.to_string()
    }
}
