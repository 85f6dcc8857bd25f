//! Route table: which module each route path requires
//!
//! Patterns are exact paths or `/prefix/*`. A prefix pattern matches the
//! prefix itself and anything below it on a `/` boundary, so
//! `/dashboards/ventas/*` does not match `/dashboards/ventas2`.

use super::route_guard::{RouteGuard, DEFAULT_FALLBACK_PATH, DEFAULT_LOGIN_PATH, DEFAULT_RETURN_PARAM};
use crate::navigation::NavigationTree;
use crate::rbac::ModulePath;

/// Pattern -> required module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRule {
    pub pattern: String,
    pub module: ModulePath,
}

impl RouteRule {
    pub fn matches(&self, path: &str) -> bool {
        matches_pattern(&self.pattern, path)
    }
}

fn matches_pattern(pattern: &str, path: &str) -> bool {
    match pattern.strip_suffix("/*") {
        Some(prefix) => {
            path == prefix
                || path.strip_prefix(prefix).is_some_and(|rest| rest.starts_with('/'))
        }
        None => path == pattern,
    }
}

/// Ordered set of route rules; the first matching rule wins
#[derive(Debug, Clone)]
pub struct RouteTable {
    rules: Vec<RouteRule>,
    /// Public paths never guarded (e.g. the login page)
    exclude: Vec<String>,
    login_path: String,
    fallback: String,
    return_param: String,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self {
            rules: vec![],
            exclude: vec![DEFAULT_LOGIN_PATH.to_string()],
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            fallback: DEFAULT_FALLBACK_PATH.to_string(),
            return_param: DEFAULT_RETURN_PARAM.to_string(),
        }
    }
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// One `/path/*` rule per navigation entry that has a path
    ///
    /// Sub-paths of an entry require the entry's module. Longer prefixes
    /// come first so a nested entry wins over an enclosing one.
    pub fn from_navigation(tree: &NavigationTree) -> Self {
        let mut rules: Vec<RouteRule> = tree
            .iter()
            .filter_map(|node| {
                let path = node.path.as_deref()?.trim_end_matches('/');
                Some(RouteRule { pattern: format!("{}/*", path), module: node.id.clone() })
            })
            .collect();
        rules.sort_by(|a, b| b.pattern.len().cmp(&a.pattern.len()));
        Self { rules, ..Self::new() }
    }

    pub fn with_rule(mut self, pattern: impl Into<String>, module: ModulePath) -> Self {
        self.rules.push(RouteRule { pattern: pattern.into(), module });
        self
    }

    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude.push(pattern.into());
        self
    }

    /// Login route; it is excluded from guarding as well
    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        self.exclude.retain(|p| p != &self.login_path);
        self.exclude.push(path.clone());
        self.login_path = path;
        self
    }

    pub fn with_fallback(mut self, path: impl Into<String>) -> Self {
        self.fallback = path.into();
        self
    }

    pub fn with_return_param(mut self, param: impl Into<String>) -> Self {
        self.return_param = param.into();
        self
    }

    pub fn rules(&self) -> &[RouteRule] {
        &self.rules
    }

    /// Guard for `path`, `None` when the path is public
    pub fn guard_for(&self, path: &str) -> Option<RouteGuard> {
        if self.exclude.iter().any(|pattern| matches_pattern(pattern, path)) {
            return None;
        }
        self.rules.iter().find(|rule| rule.matches(path)).map(|rule| {
            RouteGuard::new(rule.module.clone())
                .with_login_path(self.login_path.clone())
                .with_fallback(self.fallback.clone())
                .with_return_param(self.return_param.clone())
        })
    }
}
