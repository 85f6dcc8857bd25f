//! Route Guard - module-level protection for views
//!
//! A guard sits in front of one protected view. It is evaluated
//! synchronously on every navigation, before the view mounts, and decides
//! between rendering, waiting for the session to load, or redirecting:
//!
//! | session                         | decision                              |
//! |---------------------------------|---------------------------------------|
//! | not initialized / loading       | `Pending` (render nothing)            |
//! | no identity                     | redirect to login with `returnTo`     |
//! | identity without roles          | redirect to login with `returnTo`     |
//! | roles lack the required module  | redirect to the fallback (home)       |
//! | ... on the fallback route       | `Forbidden` (no redirect)             |
//! | roles grant the module          | `Render`                              |
//!
//! Example:
//! ```
//! use mostrador_core::guard::{GuardDecision, Location, RouteGuard};
//! use mostrador_core::rbac::{ModulePath, RbacPolicy};
//! use mostrador_core::session::SessionState;
//!
//! let map = RbacPolicy::default().create_permission_map().unwrap();
//! let guard = RouteGuard::new(ModulePath::parse("dashboards.ventas").unwrap());
//! let state = SessionState { initialized: true, ..Default::default() };
//!
//! match guard.evaluate(&state, &Location::parse("/dashboards/ventas"), &map) {
//!     GuardDecision::Redirect(redirect) => {
//!         assert_eq!(redirect.href, "/login?returnTo=%2Fdashboards%2Fventas")
//!     }
//!     other => panic!("unexpected {:?}", other),
//! }
//! ```

use crate::navigator::Navigator;
use crate::rbac::{ModulePath, PermissionChecker};
use crate::session::SessionState;
use std::fmt;

pub const DEFAULT_LOGIN_PATH: &str = "/login";
pub const DEFAULT_FALLBACK_PATH: &str = "/dashboards/home";
pub const DEFAULT_RETURN_PARAM: &str = "returnTo";

/// Requested location: path plus optional query string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub query: Option<String>,
}

impl Location {
    /// Split `href` into path and query
    ///
    /// The fragment is dropped and trailing slashes are trimmed, so
    /// `/dashboards/cajas/` and `/dashboards/cajas` are the same route.
    pub fn parse(href: &str) -> Self {
        let href = href.split('#').next().unwrap_or_default();
        let (path, query) = match href.split_once('?') {
            Some((path, query)) => (path, Some(query).filter(|q| !q.is_empty())),
            None => (href, None),
        };
        Self { path: normalize_path(path), query: query.map(str::to_string) }
    }

    pub fn href(&self) -> String {
        match &self.query {
            Some(query) => format!("{}?{}", self.path, query),
            None => self.path.clone(),
        }
    }
}

fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() && path.starts_with('/') {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.href())
    }
}

/// Which of the guard states a session is in for one route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Pending,
    NoIdentity,
    IdentityNoRoles,
    IdentityDenied,
    IdentityGranted,
}

impl GuardState {
    /// Error kind represented by this state, if any
    pub fn error(&self, module: &ModulePath) -> Option<crate::Error> {
        match self {
            GuardState::NoIdentity | GuardState::IdentityNoRoles => {
                Some(crate::Error::Unauthenticated)
            }
            GuardState::IdentityDenied => {
                Some(crate::Error::Unauthorized { module: module.to_string() })
            }
            GuardState::Pending | GuardState::IdentityGranted => None,
        }
    }
}

/// Where a denied render is sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    /// Target route
    pub to: String,
    /// Originally requested location, for the login flow to return to
    pub return_to: Option<Location>,
    /// Full href including the return parameter
    pub href: String,
}

/// Outcome of evaluating a guard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session not ready yet; render nothing and do not redirect
    Pending,
    Render,
    Redirect(Redirect),
    /// Signed in but denied on the fallback route itself. There is nowhere
    /// left to send the user, so the host shows a "no access" view in place
    /// of the page.
    Forbidden { module: ModulePath },
}

impl GuardDecision {
    pub fn should_render(&self) -> bool {
        matches!(self, GuardDecision::Render)
    }
}

/// Guard for one protected view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteGuard {
    required: ModulePath,
    login_path: String,
    fallback: String,
    return_param: String,
}

impl RouteGuard {
    /// Guard requiring `module`, with default login and fallback routes
    pub fn new(required: ModulePath) -> Self {
        Self {
            required,
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            fallback: DEFAULT_FALLBACK_PATH.to_string(),
            return_param: DEFAULT_RETURN_PARAM.to_string(),
        }
    }

    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
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

    pub fn required_module(&self) -> &ModulePath {
        &self.required
    }

    /// Classify the session against this route
    pub fn classify(&self, state: &SessionState, checker: &dyn PermissionChecker) -> GuardState {
        if !state.initialized || state.loading {
            return GuardState::Pending;
        }
        let identity = match &state.identity {
            Some(identity) => identity,
            None => return GuardState::NoIdentity,
        };
        if !identity.has_roles() {
            return GuardState::IdentityNoRoles;
        }
        if checker.has_module_access(&identity.roles, &self.required) {
            GuardState::IdentityGranted
        } else {
            GuardState::IdentityDenied
        }
    }

    /// Decide what to do with a render attempt at `location`
    pub fn evaluate(
        &self,
        state: &SessionState,
        location: &Location,
        checker: &dyn PermissionChecker,
    ) -> GuardDecision {
        match self.classify(state, checker) {
            GuardState::Pending => GuardDecision::Pending,
            GuardState::IdentityGranted => GuardDecision::Render,
            GuardState::NoIdentity | GuardState::IdentityNoRoles => {
                GuardDecision::Redirect(self.login_redirect(Some(location.clone())))
            }
            GuardState::IdentityDenied if location.path == normalize_path(&self.fallback) => {
                // Redirecting to the fallback again would loop.
                log::warn!("Fallback {} denied for module {}", self.fallback, self.required);
                GuardDecision::Forbidden { module: self.required.clone() }
            }
            GuardState::IdentityDenied => GuardDecision::Redirect(Redirect {
                to: self.fallback.clone(),
                return_to: None,
                href: self.fallback.clone(),
            }),
        }
    }

    /// Evaluate and perform the redirect, if any, through `navigator`
    pub fn enforce(
        &self,
        state: &SessionState,
        location: &Location,
        checker: &dyn PermissionChecker,
        navigator: &dyn Navigator,
    ) -> GuardDecision {
        let decision = self.evaluate(state, location, checker);
        if let GuardDecision::Redirect(redirect) = &decision {
            log::debug!("Guard on {} redirects {} to {}", self.required, location, redirect.href);
            navigator.navigate(&redirect.href);
        }
        decision
    }

    fn login_redirect(&self, return_to: Option<Location>) -> Redirect {
        let href = match &return_to {
            Some(location) => format!(
                "{}?{}={}",
                self.login_path,
                self.return_param,
                urlencoding::encode(&location.href())
            ),
            None => self.login_path.clone(),
        };
        Redirect { to: self.login_path.clone(), return_to, href }
    }
}
