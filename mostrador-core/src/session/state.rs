//! Session state snapshots

use super::identity::Identity;
use crate::rbac::RoleSet;
use serde::{Deserialize, Serialize};

/// Whole session state, replaced atomically on every update
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub identity: Option<Identity>,
    pub authenticated: bool,
    /// An authentication attempt is in flight
    pub loading: bool,
    /// Persisted state has been read
    pub initialized: bool,
    pub last_error: Option<String>,
    /// Bumped on every identity replacement; never persisted
    pub epoch: u64,
}

impl SessionState {
    /// Roles of the current identity, if any
    pub fn roles(&self) -> Option<&RoleSet> {
        self.identity.as_ref().map(|identity| &identity.roles)
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated && self.identity.is_some()
    }

    /// Subset written to persistent storage
    pub fn persisted(&self) -> PersistedSession {
        PersistedSession { identity: self.identity.clone(), authenticated: self.authenticated }
    }
}

/// Persisted session entry: `{identity, authenticated}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSession {
    pub identity: Option<Identity>,
    pub authenticated: bool,
}

impl PersistedSession {
    pub fn is_empty(&self) -> bool {
        self.identity.is_none() && !self.authenticated
    }
}
