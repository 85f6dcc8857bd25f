//! Route guarding
//!
//! - [`RouteGuard`]: decision and enforcement for one protected view
//! - [`RouteTable`]: maps route paths to the module they require

mod route_guard;
mod table;

pub use route_guard::{
    GuardDecision, GuardState, Location, Redirect, RouteGuard, DEFAULT_FALLBACK_PATH,
    DEFAULT_LOGIN_PATH, DEFAULT_RETURN_PARAM,
};
pub use table::{RouteRule, RouteTable};
