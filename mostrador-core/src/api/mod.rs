//! Back-office API access

mod auth;
mod client;
mod cookies;

pub use auth::{AuthService, Credentials};
pub use client::ApiClient;
pub use cookies::CookieJar;
