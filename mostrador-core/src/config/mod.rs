//! Configuration system for Mostrador
//!
//! Values are resolved in the following order (highest priority wins):
//!
//! 1. **Code** (builder methods on the back-office context)
//! 2. **Environment Variables** (`MOSTRADOR_*`)
//! 3. **Config File** (`mostrador.toml`)
//! 4. **Defaults**
//!
//! # Example
//!
//! ```no_run
//! use mostrador_core::config::MostradorConfig;
//!
//! let config = MostradorConfig::load()?;
//! config.validate()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod api;
pub mod logging;
pub mod navigation;
pub mod rbac;
pub mod sessions;

pub use api::ApiConfig;
pub use logging::LoggingConfig;
pub use navigation::NavigationConfig;
pub use rbac::RbacConfig;
pub use sessions::SessionsConfig;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "mostrador.toml";

/// Complete Mostrador configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MostradorConfig {
    pub api: ApiConfig,
    pub sessions: SessionsConfig,
    pub rbac: RbacConfig,
    pub navigation: NavigationConfig,
    pub logging: LoggingConfig,
}

impl MostradorConfig {
    /// Load `mostrador.toml` (if present) and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load configuration from a specific file, then environment variables
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = Self::default();

        if path.exists() {
            let file_config = Self::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            config.merge(file_config);
        } else {
            log::debug!("No config file at {}, using defaults", path.display());
        }

        config.apply_env_vars();
        Ok(config)
    }

    /// Load configuration from a TOML file only
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse TOML config: {}", path.as_ref().display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Merge another config into this one (other takes priority)
    pub fn merge(&mut self, other: Self) {
        self.api.merge(other.api);
        self.sessions.merge(other.sessions);
        self.rbac.merge(other.rbac);
        self.navigation.merge(other.navigation);
        self.logging.merge(other.logging);
    }

    /// Apply environment variables to configuration
    pub fn apply_env_vars(&mut self) {
        self.api.apply_env_vars();
        self.sessions.apply_env_vars();
        self.rbac.apply_env_vars();
        self.navigation.apply_env_vars();
        self.logging.apply_env_vars();
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.api.validate().context("Invalid [api] section")?;
        self.sessions.validate().context("Invalid [sessions] section")?;
        self.rbac.validate().context("Invalid [rbac] section")?;
        self.navigation.validate().context("Invalid [navigation] section")?;
        self.logging.validate().context("Invalid [logging] section")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rbac::{ModulePath, PermissionChecker, RoleSet};
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = MostradorConfig::default();
        assert_eq!(config.api.login_path, "/api/login");
        assert_eq!(config.rbac.fallback_route, "/dashboards/home");
        assert_eq!(config.sessions.storage_key, "mostrador-session");
        assert!(config.sessions.persist);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = MostradorConfig::from_toml(
            r#"
            [api]
            base_url = "https://pos.example.mx"

            [rbac.roles]
            ventas = ["=dashboards.home", "dashboards.ventas"]
            "#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "https://pos.example.mx");
        assert_eq!(config.api.login_path, "/api/login");
        assert_eq!(config.rbac.fallback_route, "/dashboards/home");

        let map = config.rbac.policy().create_permission_map().unwrap();
        let ventas: RoleSet = ["ventas"].into_iter().collect();
        assert!(map.has_module_access(&ventas, &ModulePath::parse("dashboards.ventas.hoy").unwrap()));
        assert!(!map.has_module_access(&ventas, &ModulePath::parse("dashboards.home.x").unwrap()));
        assert!(map.grants_for("admin").is_none());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[sessions]\nstorage_key = \"caja-3\"\n[logging]\nlevel = \"debug\"").unwrap();

        let config = MostradorConfig::load_from(file.path()).unwrap();
        assert_eq!(config.sessions.storage_key, "caja-3");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = MostradorConfig::load_from(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.api, ApiConfig::default());
    }

    #[test]
    fn test_validation_errors() {
        let mut config = MostradorConfig::default();
        config.api.base_url = "pos.example.mx".to_string();
        assert!(config.validate().is_err());

        let mut config = MostradorConfig::default();
        config.rbac.roles.insert("roto".to_string(), vec!["a..b".to_string()]);
        let err = config.validate().unwrap_err();
        assert!(format!("{:#}", err).contains("roto"));

        let mut config = MostradorConfig::default();
        config.logging.format = "xml".to_string();
        assert!(config.validate().is_err());

        let mut config = MostradorConfig::default();
        config.sessions.storage_key = "../etc".to_string();
        assert!(config.validate().is_err());
    }
}
