//! Navigation tree and role-based filtering
//!
//! The back-office menu is static data (see `assets/navigation.json`).
//! [`filter_navigation`] derives the menu a given role set may see.

mod filter;
mod icon;
mod tree;

pub use filter::filter_navigation;
pub use icon::{Icon, UnknownIcon};
pub use tree::{NavKind, NavNode, NavigationError, NavigationTree};
