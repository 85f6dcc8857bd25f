//! Back-office API client configuration

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL every request path is joined to
    /// Env: MOSTRADOR_API_BASE_URL
    /// Default: "http://127.0.0.1:8080"
    pub base_url: String,

    /// Login endpoint; a 401 here never clears the session
    /// Env: MOSTRADOR_API_LOGIN_PATH
    /// Default: "/api/login"
    pub login_path: String,

    /// Logout endpoint
    /// Default: "/api/logout"
    pub logout_path: String,

    /// Session check endpoint (returns the current identity)
    /// Env: MOSTRADOR_API_SESSION_PATH
    /// Default: "/api/session"
    pub session_path: String,

    /// Request timeout in seconds
    /// Env: MOSTRADOR_API_TIMEOUT
    /// Default: 30
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            login_path: "/api/login".to_string(),
            logout_path: "/api/logout".to_string(),
            session_path: "/api/session".to_string(),
            timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    pub fn merge(&mut self, other: Self) {
        *self = other;
    }

    pub fn apply_env_vars(&mut self) {
        if let Ok(url) = env::var("MOSTRADOR_API_BASE_URL") {
            self.base_url = url;
        }
        if let Ok(path) = env::var("MOSTRADOR_API_LOGIN_PATH") {
            self.login_path = path;
        }
        if let Ok(path) = env::var("MOSTRADOR_API_SESSION_PATH") {
            self.session_path = path;
        }
        if let Ok(timeout) = env::var("MOSTRADOR_API_TIMEOUT") {
            if let Ok(t) = timeout.parse() {
                self.timeout_secs = t;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            bail!("Invalid base_url '{}': must start with http:// or https://", self.base_url);
        }
        for (name, path) in [
            ("login_path", &self.login_path),
            ("logout_path", &self.logout_path),
            ("session_path", &self.session_path),
        ] {
            if !path.starts_with('/') {
                bail!("Invalid {} '{}': must start with '/'", name, path);
            }
        }
        if self.timeout_secs == 0 {
            bail!("Invalid timeout_secs: must be greater than 0");
        }
        Ok(())
    }
}
