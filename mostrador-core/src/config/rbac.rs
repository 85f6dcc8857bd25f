//! RBAC configuration
//!
//! ```toml
//! [rbac]
//! fallback_route = "/dashboards/home"
//!
//! [rbac.roles]
//! admin = ["*"]
//! ventas = ["=dashboards.home", "dashboards.ventas"]
//! ```
//!
//! An empty `roles` table keeps the built-in policy.

use crate::rbac::{ModuleGrant, RbacPolicy};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RbacConfig {
    /// Where authenticated but unauthorized users are sent
    /// Env: MOSTRADOR_RBAC_FALLBACK_ROUTE
    pub fallback_route: String,
    pub roles: BTreeMap<String, Vec<String>>,
}

impl Default for RbacConfig {
    fn default() -> Self {
        Self { fallback_route: "/dashboards/home".to_string(), roles: BTreeMap::new() }
    }
}

impl RbacConfig {
    pub fn merge(&mut self, other: Self) {
        *self = other;
    }

    pub fn apply_env_vars(&mut self) {
        if let Ok(route) = env::var("MOSTRADOR_RBAC_FALLBACK_ROUTE") {
            self.fallback_route = route;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.fallback_route.starts_with('/') {
            bail!("Invalid fallback_route '{}': must start with '/'", self.fallback_route);
        }
        for (role, grants) in &self.roles {
            for grant in grants {
                grant
                    .parse::<ModuleGrant>()
                    .with_context(|| format!("Invalid grant '{}' for role '{}'", grant, role))?;
            }
        }
        Ok(())
    }

    /// Policy described by this section
    pub fn policy(&self) -> RbacPolicy {
        if self.roles.is_empty() {
            return RbacPolicy::default();
        }
        RbacPolicy::empty().with_roles(
            self.roles.iter().map(|(role, grants)| (role.clone(), grants.clone())).collect(),
        )
    }
}
