//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use mostrador_core::prelude::*;
//! ```

// === Back office ===
pub use crate::backoffice::BackOffice;

// === Configuration ===
pub use crate::config::MostradorConfig;
pub use crate::logging::{init_logging, LoggingConfig};

// === Permissions ===
pub use crate::rbac::{ModuleGrant, ModulePath, PermissionChecker, PermissionMap, RbacPolicy, RoleSet};

// === Navigation ===
pub use crate::navigation::{filter_navigation, Icon, NavKind, NavNode, NavigationTree};
pub use crate::navigator::{LogNavigator, Navigator, RecordingNavigator};

// === Sessions ===
pub use crate::session::{
    FileSessionPersistence, Identity, MemorySessionPersistence, SessionPersistence, SessionState,
    SessionStore,
};

// === Guards ===
pub use crate::guard::{GuardDecision, GuardState, Location, Redirect, RouteGuard, RouteTable};

// === API ===
pub use crate::api::{ApiClient, AuthService, CookieJar, Credentials};

// === Errors ===
pub use crate::{Error, Result};

// === Common std types ===
pub use std::sync::Arc;
