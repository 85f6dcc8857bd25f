//! Sessions configuration

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Sessions configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionsConfig {
    /// Persist the session across restarts
    /// Env: MOSTRADOR_SESSION_PERSIST
    /// Default: true
    pub persist: bool,

    /// Directory holding the persisted entry
    /// Env: MOSTRADOR_SESSION_STATE_DIR
    /// Default: "./.mostrador"
    pub state_dir: PathBuf,

    /// Name of the persisted entry
    /// Env: MOSTRADOR_SESSION_STORAGE_KEY
    /// Default: "mostrador-session"
    pub storage_key: String,

    /// Login entry point of the front end
    /// Default: "/login"
    pub login_route: String,

    /// Query parameter carrying the originally requested location
    /// Default: "returnTo"
    pub return_param: String,
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            persist: true,
            state_dir: PathBuf::from("./.mostrador"),
            storage_key: "mostrador-session".to_string(),
            login_route: "/login".to_string(),
            return_param: "returnTo".to_string(),
        }
    }
}

impl SessionsConfig {
    /// `<state_dir>/<storage_key>.json`
    pub fn session_file(&self) -> PathBuf {
        self.state_dir.join(format!("{}.json", self.storage_key))
    }

    /// Cookie jar kept next to the session entry
    pub fn cookie_file(&self) -> PathBuf {
        self.state_dir.join(format!("{}.cookies.json", self.storage_key))
    }

    pub fn merge(&mut self, other: Self) {
        self.persist = other.persist;
        self.state_dir = other.state_dir;
        self.storage_key = other.storage_key;
        self.login_route = other.login_route;
        self.return_param = other.return_param;
    }

    pub fn apply_env_vars(&mut self) {
        if let Ok(persist) = env::var("MOSTRADOR_SESSION_PERSIST") {
            self.persist = persist.parse().unwrap_or(true);
        }
        if let Ok(dir) = env::var("MOSTRADOR_SESSION_STATE_DIR") {
            self.state_dir = PathBuf::from(dir);
        }
        if let Ok(key) = env::var("MOSTRADOR_SESSION_STORAGE_KEY") {
            self.storage_key = key;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.storage_key.is_empty()
            || !self.storage_key.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            bail!("Invalid storage_key '{}': use letters, digits, '-' or '_'", self.storage_key);
        }
        if !self.login_route.starts_with('/') {
            bail!("Invalid login_route '{}': must start with '/'", self.login_route);
        }
        if self.return_param.is_empty() {
            bail!("Invalid return_param: must not be empty");
        }
        Ok(())
    }
}
