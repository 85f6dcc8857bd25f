//! Declarative RBAC policy for Mostrador
//!
//! Roles are declared as `role -> [grant, ...]` using the grant text form
//! (`dashboards.ventas`, `=dashboards.home`, `*`) and compiled into a
//! [`PermissionMap`].

use super::{PermissionChecker, PermissionMap};
use anyhow::{Context, Result};
use std::sync::Arc;

/// Role declarations for the back office
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RbacPolicy {
    /// Role definitions: role_name -> grants
    pub roles: Vec<(String, Vec<String>)>,
}

impl Default for RbacPolicy {
    fn default() -> Self {
        let role = |name: &str, grants: &[&str]| {
            (name.to_string(), grants.iter().map(|g| g.to_string()).collect())
        };
        Self {
            roles: vec![
                role("admin", &["*"]),
                role(
                    "supervisor",
                    &[
                        "dashboards.home",
                        "dashboards.ventas",
                        "dashboards.cajas",
                        "dashboards.configuraciones",
                    ],
                ),
                role("ventas", &["dashboards.home", "dashboards.ventas"]),
                role("cajero", &["dashboards.home", "dashboards.cajas"]),
            ],
        }
    }
}

impl RbacPolicy {
    /// Policy with no roles at all (everything denied)
    pub fn empty() -> Self {
        Self { roles: vec![] }
    }

    /// Add a role with grants
    pub fn with_role<S: Into<String>>(mut self, role: impl Into<String>, grants: Vec<S>) -> Self {
        self.roles.push((role.into(), grants.into_iter().map(Into::into).collect()));
        self
    }

    /// Replace every role definition
    pub fn with_roles(mut self, roles: Vec<(String, Vec<String>)>) -> Self {
        self.roles = roles;
        self
    }

    /// Compile the declarations into a permission map
    ///
    /// Declaring the same role twice merges its grants.
    pub fn create_permission_map(&self) -> Result<PermissionMap> {
        let mut builder = PermissionMap::builder();
        for (role, grants) in &self.roles {
            builder = builder
                .role(role.clone(), grants)
                .with_context(|| format!("Invalid grant for role '{}'", role))?;
        }
        let map = builder.build();
        log::debug!("Compiled permission map with {} roles", map.len());
        Ok(map)
    }

    /// Create a shared permission checker from the declarations
    pub fn create_permission_checker(&self) -> Result<Arc<dyn PermissionChecker>> {
        Ok(Arc::new(self.create_permission_map()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rbac::{ModulePath, RoleSet};

    #[test]
    fn test_default_policy() {
        let map = RbacPolicy::default().create_permission_map().unwrap();
        let ventas: RoleSet = ["ventas"].into_iter().collect();
        let cajero: RoleSet = ["cajero"].into_iter().collect();
        let cajas = ModulePath::parse("dashboards.cajas").unwrap();

        assert!(map.has_module_access(&cajero, &cajas));
        assert!(!map.has_module_access(&ventas, &cajas));
    }

    #[test]
    fn test_duplicate_roles_merge() {
        let policy = RbacPolicy::empty()
            .with_role("ventas", vec!["dashboards.home"])
            .with_role("ventas", vec!["dashboards.ventas"]);
        let checker = policy.create_permission_checker().unwrap();

        assert!(checker.has_permission("ventas", &ModulePath::parse("dashboards.home").unwrap()));
        assert!(checker.has_permission("ventas", &ModulePath::parse("dashboards.ventas").unwrap()));
    }

    #[test]
    fn test_invalid_grant_is_reported() {
        let policy = RbacPolicy::empty().with_role("broken", vec!["dashboards..ventas"]);
        let err = policy.create_permission_map().unwrap_err();
        assert!(err.to_string().contains("broken"));
    }
}
