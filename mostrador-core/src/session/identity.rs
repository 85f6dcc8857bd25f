//! Authenticated identity

use crate::rbac::RoleSet;
use serde::{Deserialize, Serialize};

fn default_active() -> bool {
    true
}

/// Signed-in user as reported by the back-office API
///
/// Immutable snapshot: the session store replaces it wholesale on login
/// and logout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: i64,
    /// Person record this account belongs to
    #[serde(default)]
    pub persona_id: Option<i64>,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Owning account for sub-accounts
    #[serde(default)]
    pub parent_id: Option<i64>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub roles: RoleSet,
}

impl Identity {
    pub fn new(id: i64, username: impl Into<String>, roles: RoleSet) -> Self {
        Self {
            id,
            persona_id: None,
            username: username.into(),
            email: None,
            parent_id: None,
            active: true,
            roles,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_parent(mut self, parent_id: i64) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn is_sub_account(&self) -> bool {
        self.parent_id.is_some()
    }

    pub fn has_roles(&self) -> bool {
        !self.roles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_identity() {
        let identity: Identity = serde_json::from_str(r#"{"id":7,"username":"ana"}"#).unwrap();
        assert!(identity.active);
        assert!(!identity.has_roles());
        assert!(!identity.is_sub_account());
    }

    #[test]
    fn test_deserialize_full_identity() {
        let json = r#"{
            "id": 12, "persona_id": 40, "username": "caja1", "email": "caja1@tienda.mx",
            "parent_id": 3, "active": false, "roles": ["cajero", "cajero"]
        }"#;
        let identity: Identity = serde_json::from_str(json).unwrap();
        assert_eq!(identity.persona_id, Some(40));
        assert!(identity.is_sub_account());
        assert!(!identity.active);
        assert_eq!(identity.roles.len(), 1);
    }
}
