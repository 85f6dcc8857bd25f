//! Navigation configuration

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// JSON navigation definition; the built-in menu when unset
    /// Env: MOSTRADOR_NAVIGATION_FILE
    pub file: Option<PathBuf>,
}

impl NavigationConfig {
    pub fn merge(&mut self, other: Self) {
        *self = other;
    }

    pub fn apply_env_vars(&mut self) {
        if let Ok(file) = env::var("MOSTRADOR_NAVIGATION_FILE") {
            self.file = Some(PathBuf::from(file));
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(file) = &self.file {
            if !file.exists() {
                bail!("Navigation file {} does not exist", file.display());
            }
        }
        Ok(())
    }
}
