//! Mostrador RBAC (Role-Based Access Control) Module
//!
//! Decides whether a set of roles may reach a back-office module.
//!
//! # Model
//! - A [`ModulePath`] names a section with a dot-separated path
//!   (`dashboards.configuraciones.usuarios`).
//! - A [`PermissionMap`] maps each role to module grants. A grant on a
//!   module covers its descendants unless it is declared exact.
//! - Decisions fail closed: unknown roles, unknown modules and empty role
//!   sets are denied.
//!
//! # Example
//! ```rust
//! use mostrador_core::rbac::{ModulePath, PermissionChecker, RbacPolicy, RoleSet};
//!
//! let map = RbacPolicy::default().create_permission_map().unwrap();
//! let roles: RoleSet = ["supervisor"].into_iter().collect();
//! let usuarios = ModulePath::parse("dashboards.configuraciones.usuarios").unwrap();
//! assert!(map.has_module_access(&roles, &usuarios));
//! ```

mod config;
mod module;
mod permissions;
mod roles;

pub use config::RbacPolicy;
pub use module::{ModulePath, ModulePathError};
pub use permissions::{GrantScope, GrantTrie, ModuleGrant, PermissionMap, PermissionMapBuilder};
pub use roles::{Role, RoleSet};

/// Trait for checking if a role may access a module
///
/// [`PermissionMap`] is the production implementation; tests and
/// embedders can supply their own.
pub trait PermissionChecker: Send + Sync {
    /// Check if a single role grants the module
    fn has_permission(&self, role: &str, module: &ModulePath) -> bool;

    /// Check if any role in the set grants the module
    fn has_module_access(&self, roles: &RoleSet, module: &ModulePath) -> bool {
        roles.iter().any(|role| self.has_permission(role.name(), module))
    }
}

impl<T: PermissionChecker + ?Sized> PermissionChecker for std::sync::Arc<T> {
    fn has_permission(&self, role: &str, module: &ModulePath) -> bool {
        (**self).has_permission(role, module)
    }

    fn has_module_access(&self, roles: &RoleSet, module: &ModulePath) -> bool {
        (**self).has_module_access(roles, module)
    }
}
