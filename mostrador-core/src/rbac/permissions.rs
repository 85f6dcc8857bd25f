//! Permission map: role -> module grants
//!
//! Grants for each role are stored in a trie keyed by module path
//! segments. A lookup walks the requested path once and succeeds as soon
//! as it crosses a subtree grant.

use super::module::{ModulePath, ModulePathError};
use super::PermissionChecker;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

/// How far a grant reaches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantScope {
    /// The module and all of its descendants
    Subtree,
    /// Only the module itself
    Exact,
}

/// Single grant of a role on a module
///
/// Text form: `dashboards.ventas` (subtree), `=dashboards.home` (exact)
/// and `*` (every module).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleGrant {
    All,
    Module { path: ModulePath, scope: GrantScope },
}

impl ModuleGrant {
    pub fn subtree(path: ModulePath) -> Self {
        Self::Module { path, scope: GrantScope::Subtree }
    }

    pub fn exact(path: ModulePath) -> Self {
        Self::Module { path, scope: GrantScope::Exact }
    }
}

impl FromStr for ModuleGrant {
    type Err = ModulePathError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        if raw == "*" {
            return Ok(Self::All);
        }
        match raw.strip_prefix('=') {
            Some(exact) => Ok(Self::exact(ModulePath::parse(exact)?)),
            None => Ok(Self::subtree(ModulePath::parse(raw)?)),
        }
    }
}

impl fmt::Display for ModuleGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("*"),
            Self::Module { path, scope: GrantScope::Subtree } => write!(f, "{}", path),
            Self::Module { path, scope: GrantScope::Exact } => write!(f, "={}", path),
        }
    }
}

#[derive(Debug, Clone, Default)]
struct GrantNode {
    exact: bool,
    subtree: bool,
    children: BTreeMap<String, GrantNode>,
}

/// Segment trie holding every grant of one role
#[derive(Debug, Clone, Default)]
pub struct GrantTrie {
    root: GrantNode,
    grants: Vec<ModuleGrant>,
}

impl GrantTrie {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, grant: ModuleGrant) {
        match &grant {
            ModuleGrant::All => self.root.subtree = true,
            ModuleGrant::Module { path, scope } => {
                let mut node = &mut self.root;
                for segment in path.segments() {
                    node = node.children.entry(segment.to_string()).or_default();
                }
                match scope {
                    GrantScope::Subtree => node.subtree = true,
                    GrantScope::Exact => node.exact = true,
                }
            }
        }
        if !self.grants.contains(&grant) {
            self.grants.push(grant);
        }
    }

    /// Whether the trie grants `module`
    pub fn grants(&self, module: &ModulePath) -> bool {
        let mut node = &self.root;
        if node.subtree {
            return true;
        }
        for segment in module.segments() {
            node = match node.children.get(segment) {
                Some(child) => child,
                None => return false,
            };
            if node.subtree {
                return true;
            }
        }
        node.exact
    }

    /// Grants in insertion order
    pub fn entries(&self) -> &[ModuleGrant] {
        &self.grants
    }

    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }
}

/// Static role -> module grant table
///
/// Built once at startup (see [`PermissionMapBuilder`]) and read-only
/// afterwards.
#[derive(Debug, Clone, Default)]
pub struct PermissionMap {
    roles: HashMap<String, GrantTrie>,
}

impl PermissionMap {
    pub fn builder() -> PermissionMapBuilder {
        PermissionMapBuilder::default()
    }

    pub fn role_names(&self) -> impl Iterator<Item = &str> {
        self.roles.keys().map(String::as_str)
    }

    pub fn grants_for(&self, role: &str) -> Option<&[ModuleGrant]> {
        self.roles.get(role).map(GrantTrie::entries)
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

impl PermissionChecker for PermissionMap {
    fn has_permission(&self, role: &str, module: &ModulePath) -> bool {
        match self.roles.get(role) {
            Some(trie) => trie.grants(module),
            None => false,
        }
    }
}

/// Builder for [`PermissionMap`]
#[derive(Debug, Default)]
pub struct PermissionMapBuilder {
    roles: HashMap<String, GrantTrie>,
}

impl PermissionMapBuilder {
    /// Add one grant to a role, creating the role if needed
    pub fn grant(mut self, role: impl Into<String>, grant: ModuleGrant) -> Self {
        self.roles.entry(role.into()).or_default().insert(grant);
        self
    }

    /// Add grants to a role from their text form
    pub fn role<I, S>(mut self, role: impl Into<String>, grants: I) -> Result<Self, ModulePathError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let trie = self.roles.entry(role.into()).or_default();
        for raw in grants {
            trie.insert(raw.as_ref().parse()?);
        }
        Ok(self)
    }

    pub fn build(self) -> PermissionMap {
        PermissionMap { roles: self.roles }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rbac::RoleSet;

    fn module(raw: &str) -> ModulePath {
        ModulePath::parse(raw).unwrap()
    }

    fn roles(names: &[&str]) -> RoleSet {
        names.iter().copied().collect()
    }

    fn sample_map() -> PermissionMap {
        PermissionMap::builder()
            .role("admin", ["*"])
            .unwrap()
            .role("ventas", ["=dashboards.home", "dashboards.ventas"])
            .unwrap()
            .role("supervisor", ["dashboards.configuraciones"])
            .unwrap()
            .role("venta", ["dashboards.venta"])
            .unwrap()
            .build()
    }

    #[test]
    fn test_grant_parsing() {
        assert_eq!("*".parse::<ModuleGrant>().unwrap(), ModuleGrant::All);
        assert_eq!(
            "=dashboards.home".parse::<ModuleGrant>().unwrap(),
            ModuleGrant::exact(module("dashboards.home"))
        );
        assert_eq!(
            "dashboards.ventas".parse::<ModuleGrant>().unwrap(),
            ModuleGrant::subtree(module("dashboards.ventas"))
        );
        assert!("=".parse::<ModuleGrant>().is_err());
        assert_eq!("=dashboards.home".parse::<ModuleGrant>().unwrap().to_string(), "=dashboards.home");
    }

    #[test]
    fn test_empty_role_set_is_denied() {
        let map = sample_map();
        assert!(!map.has_module_access(&RoleSet::new(), &module("dashboards.home")));
    }

    #[test]
    fn test_unknown_role_and_module_are_denied() {
        let map = sample_map();
        assert!(!map.has_module_access(&roles(&["ghost"]), &module("dashboards.home")));
        assert!(!map.has_module_access(&roles(&["ventas"]), &module("inventario.stock")));
    }

    #[test]
    fn test_subtree_grant_covers_descendants() {
        let map = sample_map();
        let supervisor = roles(&["supervisor"]);
        assert!(map.has_module_access(&supervisor, &module("dashboards.configuraciones")));
        assert!(map.has_module_access(&supervisor, &module("dashboards.configuraciones.usuarios")));
        assert!(map.has_module_access(&supervisor, &module("dashboards.configuraciones.sucursales")));
        assert!(!map.has_module_access(&supervisor, &module("dashboards")));
    }

    #[test]
    fn test_exact_grant_does_not_cover_descendants() {
        let map = sample_map();
        let ventas = roles(&["ventas"]);
        assert!(map.has_module_access(&ventas, &module("dashboards.home")));
        assert!(!map.has_module_access(&ventas, &module("dashboards.home.widgets")));
    }

    #[test]
    fn test_no_partial_segment_match() {
        let map = sample_map();
        let venta = roles(&["venta"]);
        assert!(map.has_module_access(&venta, &module("dashboards.venta")));
        assert!(!map.has_module_access(&venta, &module("dashboards.ventas2")));
        assert!(!map.has_module_access(&venta, &module("dashboards.ventas")));
    }

    #[test]
    fn test_wildcard_grants_everything() {
        let map = sample_map();
        assert!(map.has_module_access(&roles(&["admin"]), &module("anything.at.all")));
    }

    #[test]
    fn test_union_of_roles() {
        let map = sample_map();
        let both = roles(&["ventas", "supervisor"]);
        assert!(map.has_module_access(&both, &module("dashboards.ventas")));
        assert!(map.has_module_access(&both, &module("dashboards.configuraciones.usuarios")));
    }

    #[test]
    fn test_grants_are_listed_once() {
        let map = PermissionMap::builder()
            .role("ventas", ["dashboards.ventas", "dashboards.ventas"])
            .unwrap()
            .build();
        assert_eq!(map.grants_for("ventas").unwrap().len(), 1);
        assert!(map.grants_for("ghost").is_none());
    }
}
