//! Logging configuration

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// "human", "json" or "logfmt"
    pub format: String,
    /// "stdout" or "stderr"
    pub target: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "human".to_string(), target: "stderr".to_string() }
    }
}

impl LoggingConfig {
    pub fn merge(&mut self, other: Self) {
        *self = other;
    }

    pub fn apply_env_vars(&mut self) {
        if let Ok(level) = env::var("MOSTRADOR_LOG_LEVEL") {
            self.level = level;
        }
        if let Ok(format) = env::var("MOSTRADOR_LOG_FORMAT") {
            self.format = format;
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.to_logging().map(|_| ())
    }

    /// Convert to the runtime logging configuration
    pub fn to_logging(&self) -> Result<crate::logging::LoggingConfig> {
        use crate::logging::{LogFormat, LogLevel, LogOutput};

        let level = match self.level.to_ascii_lowercase().as_str() {
            "error" => LogLevel::Error,
            "warn" => LogLevel::Warn,
            "info" => LogLevel::Info,
            "debug" => LogLevel::Debug,
            "trace" => LogLevel::Trace,
            other => bail!("Invalid log level '{}'", other),
        };
        let format = match self.format.to_ascii_lowercase().as_str() {
            "human" => LogFormat::Human,
            "json" => LogFormat::Json,
            "logfmt" => LogFormat::Logfmt,
            other => bail!("Invalid log format '{}'", other),
        };
        let output = match self.target.to_ascii_lowercase().as_str() {
            "stdout" => LogOutput::Stdout,
            "stderr" => LogOutput::Stderr,
            other => bail!("Invalid log target '{}'", other),
        };

        Ok(crate::logging::LoggingConfig { level, format, output, ..Default::default() })
    }
}
